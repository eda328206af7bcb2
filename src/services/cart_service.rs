use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::cart::{AddToCartRequest, CartItemDto, CartList},
    entity::{
        cart_items::{ActiveModel, Column, Entity as CartItems},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CartItem, Product},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartList>> {
    let rows = CartItems::find()
        .filter(Column::UserId.eq(user.user_id))
        .order_by_desc(Column::CreatedAt)
        .find_also_related(Products)
        .all(&state.orm)
        .await?;

    let items = rows
        .into_iter()
        .filter_map(|(item, product)| {
            product.map(|product| CartItemDto {
                id: item.id,
                product: Product::from(product),
                quantity: item.quantity,
            })
        })
        .collect::<Vec<_>>();

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        CartList { items },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".into(),
        ));
    }

    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?;
    if product.is_none() {
        return Err(AppError::BadRequest("product not found".into()));
    }

    let existing = CartItems::find()
        .filter(
            Condition::all()
                .add(Column::UserId.eq(user.user_id))
                .add(Column::ProductId.eq(payload.product_id)),
        )
        .one(&state.orm)
        .await?;

    let cart_item = if let Some(item) = existing {
        let mut active: ActiveModel = item.into();
        active.quantity = Set(payload.quantity);
        active.update(&state.orm).await?
    } else {
        ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.user_id),
            product_id: Set(payload.product_id),
            quantity: Set(payload.quantity),
            created_at: NotSet,
        }
        .insert(&state.orm)
        .await?
    };

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_update",
        Some("cart_items"),
        Some(serde_json::json!({
            "product_id": payload.product_id,
            "quantity": payload.quantity
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(CartItem::from(cart_item), None))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = CartItems::delete_many()
        .filter(
            Condition::all()
                .add(Column::UserId.eq(user.user_id))
                .add(Column::ProductId.eq(product_id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
