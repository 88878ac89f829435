//! Diary Error Types
//!
//! Diary-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, fields::FieldErrors, kind::ErrorKind};
use thiserror::Error;

pub type DiaryResult<T> = Result<T, DiaryError>;

#[derive(Debug, Error)]
pub enum DiaryError {
    /// Absent, not the actor's, or not permitted; indistinguishable
    #[error("Not found.")]
    NotFound,

    #[error("Submitted form is invalid: {0}")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DiaryError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        DiaryError::Validation(FieldErrors::new().with(field, message))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            DiaryError::NotFound => StatusCode::NOT_FOUND,
            DiaryError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DiaryError::Database(_) | DiaryError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DiaryError::NotFound => ErrorKind::NotFound,
            DiaryError::Validation(_) => ErrorKind::UnprocessableEntity,
            DiaryError::Database(_) | DiaryError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            DiaryError::NotFound => AppError::not_found("Not found."),
            DiaryError::Validation(fields) => AppError::validation(fields.clone()),
            DiaryError::Database(_) | DiaryError::Internal(_) => {
                AppError::internal("Internal server error")
            }
        }
    }

    fn log(&self) {
        match self {
            DiaryError::Database(e) => {
                tracing::error!(error = %e, "Diary database error");
            }
            DiaryError::Internal(msg) => {
                tracing::error!(message = %msg, "Diary internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Diary error");
            }
        }
    }
}

impl IntoResponse for DiaryError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<DiaryError> for AppError {
    fn from(err: DiaryError) -> Self {
        err.to_app_error()
    }
}

impl From<FieldErrors> for DiaryError {
    fn from(fields: FieldErrors) -> Self {
        DiaryError::Validation(fields)
    }
}
