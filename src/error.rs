// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::config;

/// HTTP API error with appropriate status codes and client-facing messages.
///
/// Every component-level failure is converted to the nearest entry here at
/// the handler boundary. Upstream collaborator failures surface as 500 with
/// a generic message; the original detail is logged and only echoed to the
/// client outside production.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    Validation(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 429 Too Many Requests
    TooManyRequests(String),

    // 500 Internal Server Error (collaborator or internal failure)
    Upstream { message: String, detail: String },
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream { .. } | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::TooManyRequests(msg)
            | ApiError::Internal(msg) => msg,
            ApiError::Upstream { message, .. } => message,
        }
    }

    /// Response body: `{"error": <message>}` plus `detail` outside production.
    pub fn to_json(&self) -> Value {
        let mut body = json!({ "error": self.message() });
        if !config::config().is_production() {
            if let ApiError::Upstream { detail, .. } = self {
                body["detail"] = json!(detail);
            }
        }
        body
    }
}

// Static constructors, mirroring how handlers read
impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        ApiError::TooManyRequests(message.into())
    }

    pub fn upstream(message: impl Into<String>, detail: impl Into<String>) -> Self {
        ApiError::Upstream {
            message: message.into(),
            detail: detail.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        match err {
            crate::store::StoreError::NotFound(what) => {
                ApiError::not_found(format!("{} not found", what))
            }
            crate::store::StoreError::DuplicateEmail => {
                ApiError::conflict("Email already registered")
            }
            crate::store::StoreError::Database(msg) => {
                tracing::error!("store error: {}", msg);
                ApiError::internal("An error occurred while processing your request")
            }
        }
    }
}

impl From<crate::auth::TokenError> for ApiError {
    fn from(err: crate::auth::TokenError) -> Self {
        ApiError::unauthorized(err.to_string())
    }
}

impl From<crate::services::UpstreamError> for ApiError {
    fn from(err: crate::services::UpstreamError) -> Self {
        tracing::error!("upstream collaborator failed: {}", err);
        ApiError::upstream("Upstream service failed", err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
