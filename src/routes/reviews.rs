use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::reviews::{CreateReviewRequest, ReviewList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Review,
    response::ApiResponse,
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews))
        .route("/", post(create_review))
        .route("/{id}", delete(delete_review))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewQuery {
    pub product_id: Uuid,
}

#[utoipa::path(
    get,
    path = "/api/reviews",
    params(("product_id" = Uuid, Query, description = "Product the reviews belong to")),
    responses(
        (status = 200, description = "Reviews for the product", body = ApiResponse<ReviewList>),
        (status = 404, description = "No reviews for this product"),
    ),
    tag = "Reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::list_for_product(&state, query.product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 200, description = "Review created", body = ApiResponse<Review>),
        (status = 400, description = "Missing fields or unknown product"),
    ),
    tag = "Reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    let resp = review_service::create_review(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = review_service::delete_review(&state, &user, id).await?;
    Ok(Json(resp))
}
