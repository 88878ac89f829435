//! Accounts Error Types
//!
//! Accounts-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, fields::FieldErrors, kind::ErrorKind};
use platform::mail::MailError;
use platform::password::PasswordHashError;
use thiserror::Error;

pub type AccountsResult<T> = Result<T, AccountsError>;

#[derive(Debug, Error)]
pub enum AccountsError {
    /// Submitted form failed validation
    #[error("Submitted form is invalid: {0}")]
    Validation(FieldErrors),

    #[error("Please enter a correct username and password. Note that both fields may be case-sensitive.")]
    InvalidCredentials,

    #[error("This account is inactive.")]
    AccountDisabled,

    #[error("Session not found or expired")]
    SessionInvalid,

    #[error("Session fingerprint mismatch")]
    SessionFingerprintMismatch,

    /// The notification could not be delivered; nothing was stored
    #[error("Could not send the notification email: {0}")]
    Mail(#[from] MailError),

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] PasswordHashError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountsError {
    /// Single-field validation failure
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        AccountsError::Validation(FieldErrors::new().with(field, message))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountsError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AccountsError::InvalidCredentials
            | AccountsError::SessionInvalid
            | AccountsError::SessionFingerprintMismatch => StatusCode::UNAUTHORIZED,
            AccountsError::AccountDisabled => StatusCode::FORBIDDEN,
            AccountsError::Mail(_) => StatusCode::BAD_GATEWAY,
            AccountsError::PasswordHash(_)
            | AccountsError::Database(_)
            | AccountsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountsError::Validation(_) => ErrorKind::UnprocessableEntity,
            AccountsError::InvalidCredentials
            | AccountsError::SessionInvalid
            | AccountsError::SessionFingerprintMismatch => ErrorKind::Unauthorized,
            AccountsError::AccountDisabled => ErrorKind::Forbidden,
            AccountsError::Mail(_) => ErrorKind::BadGateway,
            AccountsError::PasswordHash(_)
            | AccountsError::Database(_)
            | AccountsError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures keep their detail out of the response body.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AccountsError::Validation(fields) => AppError::validation(fields.clone()),
            AccountsError::Mail(_) => AppError::bad_gateway("Could not send the notification email")
                .with_action("Try again later"),
            AccountsError::PasswordHash(_)
            | AccountsError::Database(_)
            | AccountsError::Internal(_) => AppError::internal("Internal server error"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            AccountsError::Database(e) => {
                tracing::error!(error = %e, "Accounts database error");
            }
            AccountsError::PasswordHash(e) => {
                tracing::error!(error = %e, "Password hashing error");
            }
            AccountsError::Internal(msg) => {
                tracing::error!(message = %msg, "Accounts internal error");
            }
            AccountsError::Mail(e) => {
                tracing::error!(error = %e, "Notification email not sent");
            }
            AccountsError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AccountsError::SessionFingerprintMismatch => {
                tracing::warn!("Session fingerprint mismatch detected");
            }
            _ => {
                tracing::debug!(error = %self, "Accounts error");
            }
        }
    }
}

impl IntoResponse for AccountsError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AccountsError> for AppError {
    fn from(err: AccountsError) -> Self {
        err.to_app_error()
    }
}

impl From<FieldErrors> for AccountsError {
    fn from(fields: FieldErrors) -> Self {
        AccountsError::Validation(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AccountsError::field("email", "bad").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AccountsError::Mail(MailError::Transport("down".into())).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AccountsError::InvalidCredentials.kind(),
            ErrorKind::Unauthorized
        );
    }

    #[test]
    fn test_internal_detail_hidden() {
        let app = AccountsError::Internal("pool poisoned".into()).to_app_error();
        assert_eq!(app.status_code(), 500);
        assert!(!app.message().contains("pool"));
    }

    #[test]
    fn test_validation_keeps_fields() {
        let app: AppError = AccountsError::field("username", "taken").into();
        assert_eq!(app.fields().unwrap().get("username"), ["taken".to_string()]);
    }
}
