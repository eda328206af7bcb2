use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    dto::wishlist::{AddToWishlistRequest, WishlistList},
    entity::{
        products::Entity as Products,
        wishlist_items::{ActiveModel, Column, Entity as WishlistItems},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Product, WishlistItem},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_wishlist(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<WishlistList>> {
    let rows = WishlistItems::find()
        .filter(Column::UserId.eq(user.user_id))
        .order_by_desc(Column::CreatedAt)
        .find_also_related(Products)
        .all(&state.orm)
        .await?;

    let items = rows
        .into_iter()
        .filter_map(|(_, product)| product.map(Product::from))
        .collect();

    Ok(ApiResponse::success(
        WishlistList { items },
        Some(Meta::empty()),
    ))
}

pub async fn add_to_wishlist(
    state: &AppState,
    user: &AuthUser,
    payload: AddToWishlistRequest,
) -> AppResult<ApiResponse<WishlistItem>> {
    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?;
    if product.is_none() {
        return Err(AppError::BadRequest("product not found".into()));
    }

    let existing = WishlistItems::find()
        .filter(
            Condition::all()
                .add(Column::UserId.eq(user.user_id))
                .add(Column::ProductId.eq(payload.product_id)),
        )
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Product already in wishlist".into()));
    }

    let item = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        product_id: Set(payload.product_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(WishlistItem::from(item), None))
}

pub async fn remove_from_wishlist(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = WishlistItems::delete_many()
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
