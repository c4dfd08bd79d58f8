//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use aether_engine::EngineError;
use aether_store::StoreError;
use aether_vision::VisionError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::Unprocessable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Validation(_) => "validation_failed",
            ApiError::Unprocessable(_) => "unprocessable",
            ApiError::Timeout(_) => "timeout",
            ApiError::RateLimited => "rate_limited",
            ApiError::Internal(_) | ApiError::Store(_) => "internal",
        }
    }
}

impl From<VisionError> for ApiError {
    fn from(e: VisionError) -> Self {
        match e {
            VisionError::UnsupportedFormat(_) => Self::BadRequest(e.to_string()),
            VisionError::CollectionNotFound(_) | VisionError::EmptyCollection(_) => {
                Self::NotFound(e.to_string())
            }
            VisionError::UnreadableImage { .. } | VisionError::InsufficientSample => {
                Self::Unprocessable(e.to_string())
            }
            VisionError::Io(_) => Self::Internal(e.to_string()),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Vision(v) => v.into(),
            EngineError::Store(s) => Self::Store(s),
            EngineError::Timeout { .. } => Self::Timeout(e.to_string()),
            EngineError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::Validation(e.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    ok: bool,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = match &self {
            ApiError::Internal(_) | ApiError::Store(_) => {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            ok: false,
            detail,
            code: Some(self.code().to_string()),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_engine_errors_map_to_statuses() {
        let cases: Vec<(EngineError, StatusCode)> = vec![
            (VisionError::unsupported("svg").into(), StatusCode::BAD_REQUEST),
            (VisionError::CollectionNotFound(PathBuf::from("/x")).into(), StatusCode::NOT_FOUND),
            (VisionError::EmptyCollection(PathBuf::from("/x")).into(), StatusCode::NOT_FOUND),
            (VisionError::unreadable("/x/a.png", "truncated").into(), StatusCode::UNPROCESSABLE_ENTITY),
            (VisionError::InsufficientSample.into(), StatusCode::UNPROCESSABLE_ENTITY),
            (EngineError::timeout("/x/a.png", 10), StatusCode::GATEWAY_TIMEOUT),
            (EngineError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
            (
                StoreError::write_failed("/tmp/cache.json", "disk full").into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (engine, expected) in cases {
            let label = engine.to_string();
            assert_eq!(ApiError::from(engine).status_code(), expected, "{label}");
        }
    }
}
