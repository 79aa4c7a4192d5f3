//! Error types for the cash card API
//!
//! Provides unified error handling using thiserror.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Realm advertised in `WWW-Authenticate` challenges.
pub const AUTH_REALM: &str = "cashcards";

// == Api Error Enum ==
/// Unified error type for the cash card API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Credentials missing, malformed, or not matching a known principal
    #[error("Authentication required")]
    Unauthenticated,

    /// Principal is known but lacks the role the path requires
    #[error("Access denied")]
    Forbidden,

    /// No cash card with this id
    #[error("Cash card not found: {0}")]
    NotFound(u64),

    /// Malformed request body or path parameter
    #[error("Invalid request: {0}")]
    Validation(String),

    /// A different card already holds this id
    #[error("Cash card already exists with a different amount: {0}")]
    Conflict(u64),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        if status == StatusCode::UNAUTHORIZED {
            let challenge = format!("Basic realm=\"{}\"", AUTH_REALM);
            return (status, [(header::WWW_AUTHENTICATE, challenge)], body).into_response();
        }

        (status, body).into_response()
    }
}

// == Extractor Rejections ==
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cash card API.
pub type Result<T> = std::result::Result<T, ApiError>;
