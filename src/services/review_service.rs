use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    dto::{
        ensure_required,
        reviews::{CreateReviewRequest, ReviewList},
    },
    entity::{
        products::Entity as Products,
        reviews::{ActiveModel, Column, Entity as Reviews},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Review,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Reviews for a product. Zero matches is a 404 here, not an empty list;
/// the storefront treats "no reviews yet" as absence of the panel.
pub async fn list_for_product(
    state: &AppState,
    product_id: Uuid,
) -> AppResult<ApiResponse<ReviewList>> {
    let items: Vec<Review> = Reviews::find()
        .filter(Column::ProductId.eq(product_id))
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Review::from)
        .collect();

    if items.is_empty() {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        ReviewList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_review(
    state: &AppState,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    let mut missing = Vec::new();
    if payload.reviewer_name.trim().is_empty() {
        missing.push("reviewer_name");
    }
    if payload.comment.trim().is_empty() {
        missing.push("comment");
    }
    ensure_required(missing)?;

    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest("Rating must be between 1 and 5".into()));
    }

    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?;
    if product.is_none() {
        return Err(AppError::BadRequest("product not found".into()));
    }

    let review = ActiveModel {
        id: Set(Uuid::new_v4()),
        product_id: Set(payload.product_id),
        reviewer_name: Set(payload.reviewer_name),
        rating: Set(payload.rating),
        comment: Set(payload.comment),
        image: Set(payload.image),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        Review::from(review),
        Some(Meta::empty()),
    ))
}

pub async fn delete_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = Reviews::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
