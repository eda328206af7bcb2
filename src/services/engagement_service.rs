use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    dto::{
        engagement::{ContactRequest, NewsletterRequest},
        ensure_required,
    },
    entity::{
        contact_messages::{
            ActiveModel as ContactActive, Column as ContactCol, Entity as ContactMessages,
        },
        newsletter_subscribers::{
            ActiveModel as SubscriberActive, Column as SubscriberCol,
            Entity as NewsletterSubscribers,
        },
    },
    error::{AppError, AppResult},
    models::{ContactMessage, NewsletterSubscriber},
    response::{ApiResponse, Meta},
    services::auth_service::is_valid_email,
    state::AppState,
};

/// Contact form intake. The acknowledgment mail goes out before the row is
/// written; a mail failure must leave nothing behind.
pub async fn submit_contact(
    state: &AppState,
    payload: ContactRequest,
) -> AppResult<ApiResponse<ContactMessage>> {
    let mut missing = Vec::new();
    if payload.name.trim().is_empty() {
        missing.push("name");
    }
    if payload.email.trim().is_empty() {
        missing.push("email");
    }
    if payload.message.trim().is_empty() {
        missing.push("message");
    }
    ensure_required(missing)?;

    if !is_valid_email(&payload.email) {
        return Err(AppError::BadRequest("Invalid email address".into()));
    }

    let duplicate = ContactMessages::find()
        .filter(
            Condition::all()
                .add(ContactCol::Email.eq(payload.email.as_str()))
                .add(ContactCol::Message.eq(payload.message.as_str())),
        )
        .one(&state.orm)
        .await?;
    if duplicate.is_some() {
        return Err(AppError::Conflict("Message already submitted".into()));
    }

    state
        .mailer
        .send_contact_ack(&payload.email, &payload.name)
        .await
        .map_err(|e| AppError::Mail(e.to_string()))?;

    let message = ContactActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        email: Set(payload.email),
        phone: Set(payload.phone),
        message: Set(payload.message),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        ContactMessage::from(message),
        Some(Meta::empty()),
    ))
}

/// Newsletter opt-in with the same mail-before-write ordering.
pub async fn subscribe_newsletter(
    state: &AppState,
    payload: NewsletterRequest,
) -> AppResult<ApiResponse<NewsletterSubscriber>> {
    if payload.email.trim().is_empty() {
        return Err(AppError::BadRequest("Missing required fields: email".into()));
    }
    if !is_valid_email(&payload.email) {
        return Err(AppError::BadRequest("Invalid email address".into()));
    }

    let duplicate = NewsletterSubscribers::find()
        .filter(SubscriberCol::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?;
    if duplicate.is_some() {
        return Err(AppError::Conflict("Email is already subscribed".into()));
    }

    state
        .mailer
        .send_newsletter_welcome(&payload.email)
        .await
        .map_err(|e| AppError::Mail(e.to_string()))?;

    let subscriber = SubscriberActive {
        id: Set(Uuid::new_v4()),
        email: Set(payload.email),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        NewsletterSubscriber::from(subscriber),
        Some(Meta::empty()),
    ))
}
