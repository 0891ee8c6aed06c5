//! Route handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use medscan_core::{AnalysisError, AnalysisRequest, AnalysisResult};
use serde::Serialize;

use super::{ApiError, AppState};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub captioner: String,
    pub llm: String,
}

/// `POST /api/analyze-medical-image`
///
/// Body rejections (bad JSON, missing `image`, over the size limit) are
/// reported through the same error body as pipeline failures.
pub async fn analyze_medical_image(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(request) = payload.map_err(|e| AnalysisError::InvalidRequest(e.body_text()))?;
    let result = state.analyzer.analyze(&request).await?;
    Ok(Json(result))
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: medscan_core::VERSION,
        captioner: state.analyzer.captioner_name().to_string(),
        llm: state.analyzer.llm_name().to_string(),
    })
}
