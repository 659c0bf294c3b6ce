//! Error types for orchestrator operations.

use brain_core::BrainError;
use thiserror::Error;

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Model call failed.
    #[error("brain error: {0}")]
    Brain(#[from] BrainError),

    /// Conversation store failed.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// Qualification flow could not be completed.
    #[error("qualification failed: {0}")]
    Qualification(String),
}

impl From<database::DatabaseError> for OrchestratorError {
    fn from(err: database::DatabaseError) -> Self {
        OrchestratorError::Persistence(err.to_string())
    }
}

/// Errors raised while loading knowledge files.
///
/// These never leave the loader; they are logged and the affected section
/// falls back to empty content.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
