//! Failing brain - the model is never reachable.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use brain_core::{Brain, BrainError, InboundMessage, OutboundMessage};

/// A brain that fails every call with [`BrainError::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct FailingBrain {
    attempts: Arc<AtomicUsize>,
}

impl FailingBrain {
    /// Create a new failing brain.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `process` was called.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Brain for FailingBrain {
    async fn process(&self, _message: InboundMessage) -> Result<OutboundMessage, BrainError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(BrainError::Unavailable("mock model offline".to_string()))
    }

    fn name(&self) -> &str {
        "FailingBrain"
    }

    async fn is_ready(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_fails() {
        let brain = FailingBrain::new();
        let result = brain.process(InboundMessage::new("conv-1", "hi")).await;

        assert!(matches!(result, Err(BrainError::Unavailable(_))));
        assert_eq!(brain.attempts(), 1);
        assert!(!brain.is_ready().await);
    }
}
