use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use codeforge_api::api::{router, AppState};
use codeforge_api::llm::AnthropicClient;
use codeforge_api::orchestrator::Orchestrator;
use codeforge_api::usage::UsageTracker;

const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let api_key = match std::env::var("ANTHROPIC_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            tracing::error!("ANTHROPIC_API_KEY not found in environment variables");
            tracing::error!("Please create a .env file with your API key");
            std::process::exit(1);
        }
    };

    let model = std::env::var("GENERATION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    let output_dir =
        std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "generated_code".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let generator = Arc::new(AnthropicClient::new(api_key, model));
    let usage = Arc::new(UsageTracker::new());
    let orchestrator = Arc::new(Orchestrator::new(generator, usage.clone(), output_dir));

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = router(AppState { orchestrator, usage })
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Codeforge - multi-agent code generator");
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .await
        .expect("Server failed");
}
