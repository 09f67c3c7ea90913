use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::generate::GenerateError;
use crate::import::ImportError;
use crate::store::StoreError;

/// Every failure the service surfaces is flattened into one of these, each
/// carrying a single human-readable message. Nothing here is fatal; every
/// path returns control to the caller.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unavailable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg).into_response(),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response(),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(value: ImportError) -> Self {
        ApiError::BadRequest(value.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotConfigured => ApiError::Unavailable(value.to_string()),
            StoreError::Http(err) => {
                error!("cloud store HTTP error: {err}");
                ApiError::Internal("Failed to reach cloud store".into())
            }
            StoreError::Status(_) => ApiError::Internal(value.to_string()),
        }
    }
}

impl From<GenerateError> for ApiError {
    fn from(value: GenerateError) -> Self {
        match value {
            GenerateError::Http(err) => {
                error!("generation API HTTP error: {err}");
                ApiError::Internal("Failed to call generation API".into())
            }
            GenerateError::Api(_)
            | GenerateError::EmptyResponse
            | GenerateError::MalformedTimetable(_) => ApiError::Internal(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_store_maps_to_503() {
        let err: ApiError = StoreError::NotConfigured.into();
        assert!(matches!(err, ApiError::Unavailable(_)));
    }

    #[test]
    fn test_upstream_status_text_is_preserved() {
        let err: ApiError = GenerateError::Api("429 Too Many Requests".to_string()).into();
        match err {
            ApiError::Internal(msg) => assert!(msg.contains("429 Too Many Requests")),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
