//! The Brain trait definition.

use async_trait::async_trait;

use crate::error::BrainError;
use crate::message::{InboundMessage, OutboundMessage};

/// A trait for turning a user message plus system instruction into generated text.
///
/// Implementations range from deterministic test doubles to HTTP clients for a
/// hosted model. This trait is object-safe and can be used with `Box<dyn Brain>`.
#[async_trait]
pub trait Brain: Send + Sync {
    /// Process an inbound message and generate a response.
    ///
    /// # Arguments
    ///
    /// * `message` - The incoming message, carrying the system instruction to use.
    ///
    /// # Returns
    ///
    /// An `OutboundMessage` containing the first generated text segment, or an
    /// error if the model could not be reached or returned nothing.
    async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, BrainError>;

    /// Get a human-readable name for this brain implementation.
    fn name(&self) -> &str;

    /// Check if the brain is ready to process messages.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }

    /// Gracefully shut down the brain.
    ///
    /// Default implementation does nothing.
    async fn shutdown(&self) -> Result<(), BrainError> {
        Ok(())
    }
}

#[async_trait]
impl<T: Brain + ?Sized> Brain for Box<T> {
    async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, BrainError> {
        (**self).process(message).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    async fn is_ready(&self) -> bool {
        (**self).is_ready().await
    }

    async fn shutdown(&self) -> Result<(), BrainError> {
        (**self).shutdown().await
    }
}
