//! Application state shared across handlers.

use std::sync::Arc;

use brain_core::Brain;
use database::Database;
use orchestrator::Orchestrator;

/// Orchestrator type used by the server.
pub type ChatOrchestrator = Orchestrator<Box<dyn Brain>, Database>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Chat orchestrator.
    pub orchestrator: Arc<ChatOrchestrator>,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, orchestrator: ChatOrchestrator) -> Self {
        Self {
            db,
            orchestrator: Arc::new(orchestrator),
        }
    }
}
