use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::post,
};

use crate::{
    dto::auth::{
        ForgotPasswordRequest, LoginRequest, OAuthSignInRequest, OtpRequest, OtpVerifyRequest,
        RegisterRequest, ResetPasswordRequest, SessionResponse,
    },
    error::AppResult,
    models::User,
    response::ApiResponse,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/otp/request", post(request_otp))
        .route("/otp/verify", post(verify_otp))
        .route("/password/forgot", post(forgot_password))
        .route("/password/reset", post(reset_password))
        .route("/oauth", post(oauth_sign_in))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Register user", body = ApiResponse<User>),
        (status = 400, description = "Missing or malformed fields"),
        (status = 409, description = "Email already taken")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = auth_service::register(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user, sets session cookie", body = ApiResponse<SessionResponse>),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let (cookie, body) = auth_service::login(&state, payload).await?;
    Ok(([(header::SET_COOKIE, cookie)], Json(body)))
}

#[utoipa::path(
    post,
    path = "/api/auth/otp/request",
    request_body = OtpRequest,
    responses(
        (status = 200, description = "OTP generated and mailed"),
        (status = 404, description = "Unknown email")
    ),
    tag = "Auth"
)]
pub async fn request_otp(
    State(state): State<AppState>,
    Json(payload): Json<OtpRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = auth_service::request_otp(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/otp/verify",
    request_body = OtpVerifyRequest,
    responses(
        (status = 200, description = "Session issued, OTP cleared", body = ApiResponse<SessionResponse>),
        (status = 400, description = "Wrong or expired code"),
        (status = 403, description = "Account not eligible")
    ),
    tag = "Auth"
)]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<OtpVerifyRequest>,
) -> AppResult<impl IntoResponse> {
    let (cookie, body) = auth_service::verify_otp(&state, payload).await?;
    Ok(([(header::SET_COOKIE, cookie)], Json(body)))
}

#[utoipa::path(post, path = "/api/auth/password/forgot", request_body = ForgotPasswordRequest, tag = "Auth")]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = auth_service::forgot_password(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(post, path = "/api/auth/password/reset", request_body = ResetPasswordRequest, tag = "Auth")]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = auth_service::reset_password(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/oauth",
    request_body = OAuthSignInRequest,
    responses(
        (status = 200, description = "Provisioned or attached, session issued", body = ApiResponse<SessionResponse>),
        (status = 400, description = "Unknown provider")
    ),
    tag = "Auth"
)]
pub async fn oauth_sign_in(
    State(state): State<AppState>,
    Json(payload): Json<OAuthSignInRequest>,
) -> AppResult<impl IntoResponse> {
    let (cookie, body) = auth_service::oauth_sign_in(&state, payload).await?;
    Ok(([(header::SET_COOKIE, cookie)], Json(body)))
}
