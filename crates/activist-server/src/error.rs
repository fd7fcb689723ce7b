//! HTTP error mapping

use activist_core::Error as CoreError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The route does not exist for this host
    #[error("Not found")]
    NotFound,

    #[error("Tenant '{0}' not found")]
    TenantNotFound(String),

    #[error("Tenant slug '{0}' is already in use")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),

    /// Storage failed; the cause is logged, never returned
    #[error("Tenant storage is unavailable, please try again later")]
    Unavailable,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound | ApiError::TenantNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DuplicateSlug(slug) => ApiError::Conflict(slug),
            CoreError::InvalidSlug(msg) | CoreError::InvalidData(msg) => ApiError::Invalid(msg),
            CoreError::TenantNotFound(slug) => ApiError::TenantNotFound(slug),
            CoreError::Persistence(msg) => {
                error!("Tenant storage failure: {}", msg);
                ApiError::Unavailable
            }
            other => {
                error!("Unexpected tenant store error: {}", other);
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": {
                "message": self.to_string(),
                "code": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Metric outcome label for a store mutation result.
pub fn outcome_label<T>(result: &Result<T, CoreError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(CoreError::DuplicateSlug(_)) => "duplicate",
        Err(CoreError::InvalidSlug(_) | CoreError::InvalidData(_)) => "invalid",
        Err(CoreError::Persistence(_)) => "persistence",
        Err(_) => "error",
    }
}
