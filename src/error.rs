//! Service error taxonomy and HTTP mapping.
//!
//! Every fallible operation below the HTTP layer returns [`ServiceError`];
//! the `IntoResponse` impl is the single place errors become status codes
//! and `{error, code}` JSON bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::storage::MediaError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or malformed input -> 400
    #[error("{message}")]
    Validation {
        code: &'static str,
        message: String,
    },

    /// Duplicate email/username/wallet -> 409
    #[error("{message}")]
    Conflict {
        code: &'static str,
        message: String,
    },

    /// Bad credentials or bad/expired token -> 401
    #[error("{message}")]
    Auth {
        code: &'static str,
        message: String,
    },

    /// No record for the given key -> 404
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Unexpected persistence failure -> 500, detail logged server-side only
    #[error("storage failure")]
    Store(#[from] sqlx::Error),

    /// Any other unexpected failure -> 500, detail logged server-side only
    #[error("internal error")]
    Internal(String),
}

impl ServiceError {
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn missing_field(field: &str) -> Self {
        ServiceError::Validation {
            code: "MISSING_FIELD",
            message: format!("Field '{}' is required", field),
        }
    }

    pub fn underage() -> Self {
        ServiceError::Validation {
            code: "UNDERAGE",
            message: "You must be at least 18 years old".to_string(),
        }
    }

    pub fn email_taken() -> Self {
        ServiceError::Conflict {
            code: "EMAIL_TAKEN",
            message: "Email already in use".to_string(),
        }
    }

    pub fn username_taken() -> Self {
        ServiceError::Conflict {
            code: "USERNAME_TAKEN",
            message: "Username already in use".to_string(),
        }
    }

    pub fn wallet_taken() -> Self {
        ServiceError::Conflict {
            code: "WALLET_TAKEN",
            message: "Wallet address already in use".to_string(),
        }
    }

    /// Identical for unknown email and wrong password, so responses never
    /// reveal whether an account exists.
    pub fn invalid_credentials() -> Self {
        ServiceError::Auth {
            code: "INVALID_CREDENTIALS",
            message: "Invalid credentials".to_string(),
        }
    }

    pub fn invalid_token() -> Self {
        ServiceError::Auth {
            code: "INVALID_TOKEN",
            message: "Invalid authentication token".to_string(),
        }
    }

    pub fn expired_token() -> Self {
        ServiceError::Auth {
            code: "EXPIRED_TOKEN",
            message: "Authentication token has expired".to_string(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        ServiceError::Internal(detail.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation { .. } => StatusCode::BAD_REQUEST,
            ServiceError::Conflict { .. } => StatusCode::CONFLICT,
            ServiceError::Auth { .. } => StatusCode::UNAUTHORIZED,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Store(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation { code, .. }
            | ServiceError::Conflict { code, .. }
            | ServiceError::Auth { code, .. } => code,
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Store(_) | ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<MediaError> for ServiceError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::EmptyBlob => {
                ServiceError::validation("EMPTY_IMAGE", "Image data is empty")
            }
            MediaError::BlobTooLarge { size, max } => ServiceError::validation(
                "IMAGE_TOO_LARGE",
                format!("Image of {} bytes exceeds the {} byte limit", size, max),
            ),
            MediaError::InvalidReference(_) => {
                ServiceError::validation("INVALID_IMAGE_REF", "Invalid image reference")
            }
            MediaError::NotFound(_) => ServiceError::NotFound("image"),
            MediaError::Io(e) => ServiceError::internal(format!("media storage I/O failure: {}", e)),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        // Persistence detail stays in the server log, never in the body.
        let message = match &self {
            ServiceError::Store(e) => {
                tracing::error!("Store error: {}", e);
                "Internal server error".to_string()
            }
            ServiceError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ServiceError::underage().status(), StatusCode::BAD_REQUEST);
        assert_eq!(ServiceError::email_taken().status(), StatusCode::CONFLICT);
        assert_eq!(
            ServiceError::invalid_credentials().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::expired_token().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::NotFound("profile").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Store(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_login_errors_are_identical() {
        // Unknown email and wrong password must be indistinguishable.
        let a = ServiceError::invalid_credentials();
        let b = ServiceError::invalid_credentials();
        assert_eq!(a.code(), b.code());
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.status(), b.status());
    }

    #[test]
    fn test_store_error_hides_detail() {
        let err = ServiceError::Store(sqlx::Error::PoolClosed);
        assert_eq!(err.code(), "INTERNAL_ERROR");
        // The thiserror display is generic; the sqlx detail is only logged.
        assert_eq!(err.to_string(), "storage failure");
    }
}
