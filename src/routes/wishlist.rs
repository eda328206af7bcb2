use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::wishlist::{AddToWishlistRequest, WishlistList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::WishlistItem,
    response::ApiResponse,
    services::wishlist_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_wishlist))
        .route("/", post(add_to_wishlist))
        .route("/{product_id}", delete(remove_from_wishlist))
}

#[utoipa::path(
    get,
    path = "/api/wishlist",
    responses((status = 200, description = "Wishlist products", body = ApiResponse<WishlistList>)),
    tag = "Wishlist"
)]
pub async fn list_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<WishlistList>>> {
    let resp = wishlist_service::list_wishlist(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/wishlist",
    request_body = AddToWishlistRequest,
    responses(
        (status = 200, description = "Added to wishlist", body = ApiResponse<WishlistItem>),
        (status = 409, description = "Already in wishlist"),
    ),
    tag = "Wishlist"
)]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddToWishlistRequest>,
) -> AppResult<Json<ApiResponse<WishlistItem>>> {
    let resp = wishlist_service::add_to_wishlist(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/wishlist/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Removed from wishlist"),
        (status = 404, description = "Not in wishlist"),
    ),
    tag = "Wishlist"
)]
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = wishlist_service::remove_from_wishlist(&state, &user, product_id).await?;
    Ok(Json(resp))
}
