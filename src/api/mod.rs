pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::orchestrator::Orchestrator;
use crate::usage::UsageTracker;

/// Shared state behind every handler
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub usage: Arc<UsageTracker>,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(handlers::generate::generate))
        .route("/usage", get(handlers::stats::usage_stats))
        .route("/health", get(handlers::stats::health_check))
        .with_state(state)
}
