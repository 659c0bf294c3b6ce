//! Anthropic-based brain implementation.
//!
//! This crate provides a brain implementation that sends one request to the
//! Anthropic Messages API per call. The brain is stateless: conversation
//! context reaches the model only through the system instruction carried by
//! each [`InboundMessage`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use claude_brain::{Brain, ClaudeBrain, InboundMessage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let brain = ClaudeBrain::from_env()?;
//!     let message = InboundMessage::new("conv-1", "What does Movne do?")
//!         .with_system_prompt("You are a sales representative.");
//!     let reply = brain.process(message).await?;
//!     println!("{}", reply.text);
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::ClaudeBrain;
pub use config::{ClaudeBrainConfig, ClaudeBrainConfigBuilder};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, InboundMessage, OutboundMessage};
