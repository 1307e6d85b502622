use axum::{extract::State, Json};

use crate::api::AppState;
use crate::usage::UsageStats;

/// Current per-model usage counters
///
/// GET /usage
pub async fn usage_stats(State(state): State<AppState>) -> Json<UsageStats> {
    Json(state.usage.usage_stats())
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
