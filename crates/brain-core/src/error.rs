//! Error types for brain operations.

use thiserror::Error;

/// Errors that can occur during brain processing.
///
/// From the orchestrator's point of view every variant means the model
/// capability is unavailable for this turn, except [`BrainError::EmptyResponse`]
/// which is answered with a fixed fallback text.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The brain is misconfigured (missing API key, bad URL, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never reached the model provider.
    #[error("network error: {0}")]
    Network(String),

    /// The brain is temporarily unavailable.
    #[error("brain unavailable: {0}")]
    Unavailable(String),

    /// The message could not be processed.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// The model answered without any text segment.
    #[error("model returned no content")]
    EmptyResponse,

    /// The brain has been shut down.
    #[error("brain shut down")]
    ShutDown,

    /// A timeout occurred during processing.
    #[error("processing timed out")]
    Timeout,
}
