//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every service operation returns `Result<_, AppError>`; the variants follow the
//! error taxonomy of the API (invalid input, conflict, unauthorized, not found,
//! invalid id, internal).
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can return it
//! directly and have it rendered as an HTTP status with a `{"error": "..."}` body.
//! Internal and database errors are logged and replaced with a generic message so
//! store-specific text never reaches the client.
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError` allow use of `?`.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Message returned to clients for any 5xx error.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Malformed or out-of-range request data (HTTP 400).
    InvalidInput(String),
    /// The resource already exists, e.g. a taken username (HTTP 409).
    Conflict(String),
    /// Missing, invalid or expired token, or bad credentials (HTTP 401).
    Unauthorized(String),
    /// The requested resource is absent or not owned by the caller (HTTP 404).
    NotFound(String),
    /// An identifier that is not well-formed for the store (HTTP 400).
    InvalidId(String),
    /// An unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// A failure reported by the datastore (HTTP 500).
    DatabaseError(String),
}

impl AppError {
    /// The message that is safe to show to the caller.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::InvalidInput(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::InvalidId(msg) => msg,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                INTERNAL_ERROR_MESSAGE
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid Input: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InvalidId(msg) => write!(f, "Invalid Id: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::InvalidId(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.public_message()
        }))
    }
}

/// Primary key of the `users` table, the only unique constraint a client can trip.
const USERS_PKEY: &str = "users_pkey";

/// Converts `sqlx::Error` into `AppError`.
///
/// A duplicate username becomes `AppError::Conflict`; everything else, including
/// unique violations on other tables, is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                unique_violation(db_err.constraint(), error.to_string())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

fn unique_violation(constraint: Option<&str>, detail: String) -> AppError {
    match constraint {
        Some(USERS_PKEY) => AppError::Conflict("User already exists".into()),
        _ => AppError::DatabaseError(detail),
    }
}

/// Converts `validator::ValidationErrors` into `AppError::InvalidInput`.
///
/// Field messages are joined in field-name order so the output is stable.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let messages: Vec<String> = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value for {}", field),
                })
            })
            .collect();

        AppError::InvalidInput(messages.join("; "))
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {}", error))
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Title must be between 1 and 200 characters"))]
        title: String,
        #[validate(length(max = 3))]
        description: String,
    }

    #[test]
    fn test_error_responses() {
        let error = AppError::Unauthorized("Invalid token".into());
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::InvalidInput("Invalid input".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::InvalidId("Invalid todo ID".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::Conflict("User already exists".into());
        assert_eq!(error.error_response().status(), 409);

        let error = AppError::NotFound("Todo not found".into());
        assert_eq!(error.error_response().status(), 404);

        let error = AppError::InternalServerError("Server error".into());
        assert_eq!(error.error_response().status(), 500);

        let error = AppError::DatabaseError("connection reset".into());
        assert_eq!(error.error_response().status(), 500);
    }

    #[actix_rt::test]
    async fn test_internal_errors_hide_details() {
        let error = AppError::DatabaseError("relation \"todos\" does not exist".into());
        let body = to_bytes(error.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"], INTERNAL_ERROR_MESSAGE);
    }

    #[actix_rt::test]
    async fn test_client_errors_keep_message() {
        let error = AppError::NotFound("Todo not found".into());
        let body = to_bytes(error.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json, json!({ "error": "Todo not found" }));
    }

    #[test]
    fn test_only_username_collisions_are_conflicts() {
        assert_eq!(
            unique_violation(Some("users_pkey"), "duplicate key".into()),
            AppError::Conflict("User already exists".into())
        );
        assert_eq!(
            unique_violation(Some("todos_pkey"), "duplicate key".into()),
            AppError::DatabaseError("duplicate key".into())
        );
        assert_eq!(
            unique_violation(None, "duplicate key".into()),
            AppError::DatabaseError("duplicate key".into())
        );
    }

    #[test]
    fn test_validation_errors_become_invalid_input() {
        let sample = Sample {
            title: String::new(),
            description: "toolong".into(),
        };
        let error: AppError = sample.validate().unwrap_err().into();

        match error {
            AppError::InvalidInput(msg) => {
                assert_eq!(
                    msg,
                    "Invalid value for description; Title must be between 1 and 200 characters"
                );
            }
            other => panic!("Unexpected error: {:?}", other),
        }
    }
}
