use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    Conflict(String),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("Database error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Email delivery failed")]
    Mail(String),

    #[error("Asset host request failed")]
    Asset(String),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

/// Every failure leaves the boundary as `{"msg": ..., "error": ...}`.
#[derive(Serialize)]
struct ErrorBody {
    msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, None),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, None),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, None),
            AppError::Forbidden => (StatusCode::FORBIDDEN, None),
            AppError::Conflict(_) => (StatusCode::CONFLICT, None),
            AppError::DbError(e) => (StatusCode::INTERNAL_SERVER_ERROR, Some(e.to_string())),
            AppError::OrmError(e) => (StatusCode::INTERNAL_SERVER_ERROR, Some(e.to_string())),
            AppError::Mail(e) => (StatusCode::INTERNAL_SERVER_ERROR, Some(e.clone())),
            AppError::Asset(e) => (StatusCode::INTERNAL_SERVER_ERROR, Some(e.clone())),
            AppError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, Some(e.to_string())),
        };

        let body = ErrorBody {
            msg: self.to_string(),
            error: detail,
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
