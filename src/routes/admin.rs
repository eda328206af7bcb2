use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::orders::{OrderList, OrderWithItems},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_all_orders))
        .route("/orders/{id}", get(get_order_admin))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/orders/{id}/paid", patch(mark_order_paid))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by order status"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "All orders (admin only)", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
    ),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = admin_service::list_all_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Any order with items (admin only)", body = ApiResponse<OrderWithItems>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Admin"
)]
pub async fn get_order_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = admin_service::get_order_admin(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<Order>),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::update_order_status(&state, &user, id, payload.status).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/paid",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Payment recorded", body = ApiResponse<Order>),
        (status = 400, description = "Already paid"),
        (status = 403, description = "Forbidden"),
    ),
    tag = "Admin"
)]
pub async fn mark_order_paid(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::mark_order_paid(&state, &user, id).await?;
    Ok(Json(resp))
}
