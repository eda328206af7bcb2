use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::engagement::{ContactRequest, NewsletterRequest},
    error::AppResult,
    models::{ContactMessage, NewsletterSubscriber},
    response::ApiResponse,
    services::engagement_service,
    state::AppState,
};

pub fn contact_router() -> Router<AppState> {
    Router::new().route("/", post(submit_contact))
}

pub fn newsletter_router() -> Router<AppState> {
    Router::new().route("/subscribe", post(subscribe_newsletter))
}

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message received, acknowledgment mailed", body = ApiResponse<ContactMessage>),
        (status = 409, description = "Duplicate submission"),
    ),
    tag = "Engagement"
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> AppResult<Json<ApiResponse<ContactMessage>>> {
    let resp = engagement_service::submit_contact(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/newsletter/subscribe",
    request_body = NewsletterRequest,
    responses(
        (status = 200, description = "Subscribed, welcome mailed", body = ApiResponse<NewsletterSubscriber>),
        (status = 409, description = "Already subscribed"),
    ),
    tag = "Engagement"
)]
pub async fn subscribe_newsletter(
    State(state): State<AppState>,
    Json(payload): Json<NewsletterRequest>,
) -> AppResult<Json<ApiResponse<NewsletterSubscriber>>> {
    let resp = engagement_service::subscribe_newsletter(&state, payload).await?;
    Ok(Json(resp))
}
