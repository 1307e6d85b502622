use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::usage::UsageStats;

/// Request body for code generation
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub requirements: String,
}

/// Response from a successful generation run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub run_id: Uuid,
    pub code: String,
    pub tests: String,
    pub code_file: String,
    pub test_file: String,
    pub usage: UsageStats,
}

/// Generate code and tests from free-text requirements
///
/// POST /generate
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    if req.requirements.trim().is_empty() {
        return Err(ApiError::bad_request("Requirements are required"));
    }

    let preview: String = req.requirements.chars().take(100).collect();
    tracing::info!(preview = %preview, "received code generation request");

    let report = state
        .orchestrator
        .process_requirements(&req.requirements)
        .await
        .map_err(|err| ApiError::internal_server_error(err.to_string()))?;

    Ok(Json(GenerateResponse {
        success: true,
        run_id: report.run_id,
        code: report.code,
        tests: report.tests,
        code_file: report.code_file.display().to_string(),
        test_file: report.test_file.display().to_string(),
        usage: state.usage.usage_stats(),
    }))
}
