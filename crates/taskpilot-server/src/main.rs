//! # Taskpilot Server
//!
//! HTTP server for AI-assisted project scheduling: the schedule pipeline
//! endpoint plus a thin project/task surface over the document store.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod api;
mod config;
mod state;

#[cfg(test)]
mod tests;

use config::ServerConfig;
use state::AppState;
use taskpilot_model::{GeminiClient, GeminiConfig};
use taskpilot_store::InMemoryDocumentStore;

/// Run the Taskpilot server.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let model = GeminiClient::new(GeminiConfig {
        api_key: config.gemini_api_key.clone(),
        model: config.gemini_model.clone(),
        ..Default::default()
    })
    .map_err(|e| anyhow::anyhow!("failed to build Gemini client: {}", e))?;

    let state = AppState::new(
        Arc::new(model),
        Arc::new(InMemoryDocumentStore::new()),
        config.call_policy(),
    );

    let app = create_router(state, &config.allowed_origin)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("🚀 Taskpilot server listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router. Cross-origin access is limited to one configured
/// origin, GET/POST only.
fn create_router(state: AppState, allowed_origin: &str) -> anyhow::Result<Router> {
    let origin = allowed_origin
        .parse::<HeaderValue>()
        .map_err(|_| anyhow::anyhow!("ALLOWED_ORIGIN is not a valid origin: {}", allowed_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    Ok(Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Stateless schedule pipeline
        .route("/schedule", post(api::schedule::schedule))
        // Project surface
        .route("/projects", post(api::project::create_project))
        .route("/projects", get(api::project::list_projects))
        .route("/projects/:id/tasks", post(api::project::add_task))
        .route("/projects/:id/tasks", get(api::project::list_tasks))
        .route("/projects/:id/import", post(api::project::import_tasks))
        .route("/projects/:id/schedule", post(api::schedule::schedule_project))
        .route("/schedules", get(api::project::list_schedules))
        .route("/tasks/:id", delete(api::project::delete_task))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Fail fast: without a model credential there is nothing to serve.
    let config = ServerConfig::from_env()?;

    run_server(config).await
}
