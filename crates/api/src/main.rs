//! HTTP API for the Movne sales assistant.
//!
//! Serves the website chat widget and the sales team's lead and
//! conversation endpoints.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use brain_core::Brain;
use claude_brain::ClaudeBrain;
use database::Database;
use orchestrator::{KeywordKnowledge, Orchestrator, OrchestratorConfig, SalesKnowledge};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting Movne API server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Knowledge and model
    let knowledge = SalesKnowledge::load(&config.config_dir);
    let brain: Box<dyn Brain> = Box::new(ClaudeBrain::from_env()?);
    info!(brain = brain.name(), "Model configured");

    let orchestrator = Orchestrator::new(
        brain,
        db.clone(),
        &knowledge,
        OrchestratorConfig::from_env(),
    )
    .with_knowledge_source(Arc::new(KeywordKnowledge::new()));

    // Build application state
    let state = AppState::new(db, orchestrator);

    // Build router
    let app = routes::router()
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Movne API server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
