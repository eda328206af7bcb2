use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::shipping::{CreateShippingRequest, ShippingList, UpdateShippingRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::ShippingPrice,
    response::ApiResponse,
    services::shipping_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rules))
        .route("/", post(create_rule))
        .route("/{id}", put(update_rule))
        .route("/{id}", delete(delete_rule))
}

#[utoipa::path(
    get,
    path = "/api/shipping",
    responses((status = 200, description = "All shipping rules", body = ApiResponse<ShippingList>)),
    tag = "Shipping"
)]
pub async fn list_rules(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ShippingList>>> {
    let resp = shipping_service::list_rules(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/shipping",
    request_body = CreateShippingRequest,
    responses(
        (status = 200, description = "Rule created", body = ApiResponse<ShippingPrice>),
        (status = 409, description = "Range overlaps an existing rule"),
    ),
    tag = "Shipping"
)]
pub async fn create_rule(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateShippingRequest>,
) -> AppResult<Json<ApiResponse<ShippingPrice>>> {
    let resp = shipping_service::create_rule(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/shipping/{id}",
    params(("id" = Uuid, Path, description = "Rule ID")),
    request_body = UpdateShippingRequest,
    responses(
        (status = 200, description = "Rule updated", body = ApiResponse<ShippingPrice>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Shipping"
)]
pub async fn update_rule(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateShippingRequest>,
) -> AppResult<Json<ApiResponse<ShippingPrice>>> {
    let resp = shipping_service::update_rule(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/shipping/{id}",
    params(("id" = Uuid, Path, description = "Rule ID")),
    responses(
        (status = 200, description = "Rule deleted"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Shipping"
)]
pub async fn delete_rule(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = shipping_service::delete_rule(&state, &user, id).await?;
    Ok(Json(resp))
}
