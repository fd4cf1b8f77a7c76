use std::collections::HashMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use foodgram_shared::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] Error),

    #[error("{0}")]
    BadRequest(String),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        Self::Domain(e.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Domain(e.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// First message per invalid field; nested fields get a generic message.
fn field_errors(errors: &ValidationErrors) -> HashMap<String, String> {
    errors
        .errors()
        .iter()
        .map(|(field, kind)| {
            let message = match kind {
                ValidationErrorsKind::Field(errors) => errors
                    .first()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value ({})", e.code))
                    })
                    .unwrap_or_else(|| "Validation failed".to_string()),
                ValidationErrorsKind::Struct(_) | ValidationErrorsKind::List(_) => {
                    "Invalid value".to_string()
                }
            };
            (field.to_string(), message)
        })
        .collect()
}

fn body(status: StatusCode, error: &str, message: String) -> Response {
    let body = serde_json::json!({
        "error": error,
        "message": message,
    });

    (status, Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error = match self {
            AppError::BadRequest(message) => {
                return body(StatusCode::BAD_REQUEST, "BadRequest", message);
            }
            AppError::Domain(error) => error,
        };

        match error {
            Error::Validate(errors) => {
                let details = field_errors(&errors);
                tracing::debug!(errors = ?details, "validation failed");

                let body = serde_json::json!({
                    "error": "ValidationFailed",
                    "message": "Invalid input provided.",
                    "details": details,
                });

                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Error::User(message) => body(StatusCode::BAD_REQUEST, "BadRequest", message),
            Error::NotFound(_) => body(StatusCode::NOT_FOUND, "NotFound", error.to_string()),
            Error::Conflict(message) => body(StatusCode::CONFLICT, "Conflict", message),
            Error::Forbidden => body(
                StatusCode::FORBIDDEN,
                "Forbidden",
                "You do not have permission to perform this action.".to_string(),
            ),
            Error::Unauthorized => body(
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Authentication credentials were not provided or are invalid.".to_string(),
            ),
            Error::Unknown(e) => {
                tracing::error!(error = ?e, "internal server error");
                body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalServerError",
                    "An unexpected error occurred. Please try again.".to_string(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Input {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(range(min = 1))]
        amount: u32,
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (Error::NotFound("recipe".into()), StatusCode::NOT_FOUND),
            (Error::Conflict("dup".into()), StatusCode::CONFLICT),
            (Error::User("bad".into()), StatusCode::BAD_REQUEST),
            (Error::Forbidden, StatusCode::FORBIDDEN),
            (Error::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                Error::Unknown(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(AppError::from(error).into_response().status(), status);
        }
    }

    #[test]
    fn test_field_errors() {
        let errors = Input {
            name: String::new(),
            amount: 0,
        }
        .validate()
        .unwrap_err();

        let details = field_errors(&errors);
        assert_eq!(details["name"], "Name is required");
        assert_eq!(details["amount"], "Invalid value (range)");
    }
}
