//! Rejected form submissions
//!
//! A form that fails validation is answered with 422, the per-field
//! messages and the values the client submitted, so it can redisplay
//! the form without losing input.

use serde::Serialize;

use super::fields::FieldErrors;

pub const INVALID_FORM_MESSAGE: &str = "Submitted form is invalid";

#[derive(Debug, Clone, Serialize)]
pub struct InvalidForm<T> {
    pub detail: &'static str,
    pub errors: FieldErrors,
    pub values: T,
}

impl<T: Serialize> InvalidForm<T> {
    pub fn new(errors: FieldErrors, values: T) -> Self {
        Self {
            detail: INVALID_FORM_MESSAGE,
            errors,
            values,
        }
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for InvalidForm<T> {
    fn into_response(self) -> axum::response::Response {
        (axum::http::StatusCode::UNPROCESSABLE_ENTITY, axum::Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Form {
        date: String,
    }

    #[test]
    fn test_serializes_errors_and_values() {
        let form = InvalidForm::new(
            FieldErrors::new().with("date", "This field is required."),
            Form {
                date: String::new(),
            },
        );
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["detail"], INVALID_FORM_MESSAGE);
        assert_eq!(json["errors"]["date"][0], "This field is required.");
        assert_eq!(json["values"]["date"], "");
    }
}
