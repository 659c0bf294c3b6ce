//! Mock brain implementations for exercising the orchestrator without a model.
//!
//! This crate provides deterministic implementations of the `Brain` trait:
//! - `EchoBrain` - Echoes messages back
//! - `ScriptedBrain` - Returns a fixed reply and records every call
//! - `FailingBrain` - Always fails with a chosen error
//!
//! For production use, see the `claude-brain` crate.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{Brain, InboundMessage, ScriptedBrain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::BrainError> {
//!     let brain = ScriptedBrain::new("Structured products are issued by banks.");
//!
//!     let message = InboundMessage::new("conv-1", "What do you sell?");
//!     let response = brain.process(message).await?;
//!
//!     assert_eq!(response.text, "Structured products are issued by banks.");
//!     assert_eq!(brain.calls().len(), 1);
//!     Ok(())
//! }
//! ```

mod echo;
mod failing;
mod scripted;

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, InboundMessage, OutboundMessage};

pub use echo::EchoBrain;
pub use failing::FailingBrain;
pub use scripted::ScriptedBrain;
