use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::addresses::{AddressList, CreateAddressRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Address,
    response::ApiResponse,
    services::address_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_addresses))
        .route("/", post(create_address))
        .route("/{id}", delete(delete_address))
}

#[utoipa::path(
    get,
    path = "/api/addresses",
    responses((status = 200, description = "The caller's addresses", body = ApiResponse<AddressList>)),
    tag = "Addresses"
)]
pub async fn list_addresses(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AddressList>>> {
    let resp = address_service::list_addresses(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/addresses",
    request_body = CreateAddressRequest,
    responses(
        (status = 200, description = "Address created", body = ApiResponse<Address>),
        (status = 400, description = "Missing required fields"),
    ),
    tag = "Addresses"
)]
pub async fn create_address(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateAddressRequest>,
) -> AppResult<Json<ApiResponse<Address>>> {
    let resp = address_service::create_address(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/addresses/{id}",
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Address removed"),
        (status = 403, description = "Not the caller's address"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Addresses"
)]
pub async fn delete_address(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = address_service::delete_address(&state, &user, id).await?;
    Ok(Json(resp))
}
