use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::coupons::{
        CouponList, CouponQuote, CreateCouponRequest, UpdateCouponRequest, ValidateCouponRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Coupon,
    response::ApiResponse,
    services::coupon_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_coupons))
        .route("/", post(create_coupon))
        .route("/validate", post(validate_coupon))
        .route("/{id}", put(update_coupon))
        .route("/{id}", delete(delete_coupon))
}

#[utoipa::path(
    get,
    path = "/api/coupons",
    responses((status = 200, description = "All coupons (admin)", body = ApiResponse<CouponList>)),
    tag = "Coupons"
)]
pub async fn list_coupons(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CouponList>>> {
    let resp = coupon_service::list_coupons(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/coupons",
    request_body = CreateCouponRequest,
    responses(
        (status = 200, description = "Coupon created", body = ApiResponse<Coupon>),
        (status = 409, description = "Duplicate code"),
    ),
    tag = "Coupons"
)]
pub async fn create_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCouponRequest>,
) -> AppResult<Json<ApiResponse<Coupon>>> {
    let resp = coupon_service::create_coupon(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/coupons/validate",
    request_body = ValidateCouponRequest,
    responses(
        (status = 200, description = "Discount quote", body = ApiResponse<CouponQuote>),
        (status = 400, description = "Invalid, expired or exhausted code"),
    ),
    tag = "Coupons"
)]
pub async fn validate_coupon(
    State(state): State<AppState>,
    Json(payload): Json<ValidateCouponRequest>,
) -> AppResult<Json<ApiResponse<CouponQuote>>> {
    let resp = coupon_service::validate_coupon(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/coupons/{id}",
    params(("id" = Uuid, Path, description = "Coupon ID")),
    request_body = UpdateCouponRequest,
    responses(
        (status = 200, description = "Coupon updated", body = ApiResponse<Coupon>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Coupons"
)]
pub async fn update_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCouponRequest>,
) -> AppResult<Json<ApiResponse<Coupon>>> {
    let resp = coupon_service::update_coupon(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/coupons/{id}",
    params(("id" = Uuid, Path, description = "Coupon ID")),
    responses(
        (status = 200, description = "Coupon deleted"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Coupons"
)]
pub async fn delete_coupon(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = coupon_service::delete_coupon(&state, &user, id).await?;
    Ok(Json(resp))
}
