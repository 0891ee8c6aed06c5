//! Mapping from analysis errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use medscan_core::AnalysisError;
use serde_json::json;

/// Error returned by handlers; renders as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError(pub AnalysisError);

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_rejection() {
            tracing::warn!("Request rejected: {}", self.0);
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!("Analysis failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let rejected = ApiError(AnalysisError::NotMedical {
            caption: "a dog".to_string(),
        })
        .into_response();
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

        let failed = ApiError(AnalysisError::Llm {
            message: "HTTP 502".to_string(),
            status_code: Some(502),
        })
        .into_response();
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
