use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutRequest, OrderList, OrderWithItems, PendingOrder},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::order_service::{self, PENDING_ORDER_COOKIE},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/checkout", post(checkout))
        .route("/pending", get(pending_order))
        .route("/{id}", get(get_order))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Order history; empty list when none", body = ApiResponse<OrderList>),
        (status = 401, description = "Missing or invalid session cookie"),
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order placed from the cart", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Empty cart, bad address or payment method"),
    ),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::checkout(&state, &user, payload).await?;
    Ok(Json(resp))
}

// Bare body: convenience state echoed back to the client, no envelope.
#[utoipa::path(
    get,
    path = "/api/orders/pending",
    responses(
        (status = 200, description = "Decoded pending-order cookie", body = PendingOrder),
        (status = 500, description = "Cookie absent or incomplete"),
    ),
    tag = "Orders"
)]
pub async fn pending_order(jar: CookieJar) -> AppResult<Json<PendingOrder>> {
    let cookie = jar
        .get(PENDING_ORDER_COOKIE)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("pending-order cookie is absent")))?;
    let pending = order_service::decode_pending_order(cookie.value())?;
    Ok(Json(pending))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with populated items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::get_order(&state, &user, id).await?;
    Ok(Json(resp))
}
