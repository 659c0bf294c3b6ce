//! Scripted brain - fixed reply, recorded calls.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use brain_core::{Brain, BrainError, InboundMessage, OutboundMessage};

/// A brain that always answers with the same text and remembers what it was asked.
///
/// Clones share the call log, so a test can keep one handle while the
/// orchestrator owns another.
#[derive(Debug, Clone)]
pub struct ScriptedBrain {
    reply: Option<String>,
    calls: Arc<Mutex<Vec<InboundMessage>>>,
}

impl ScriptedBrain {
    /// Create a brain answering with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a brain whose responses carry no text segment.
    pub fn empty() -> Self {
        Self {
            reply: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Messages received so far, oldest first.
    pub fn calls(&self) -> Vec<InboundMessage> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// System instruction of the most recent call.
    pub fn last_system_prompt(&self) -> Option<String> {
        self.calls().last().and_then(|m| m.system_prompt.clone())
    }
}

#[async_trait]
impl Brain for ScriptedBrain {
    async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, BrainError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(message.clone());
        }

        match &self.reply {
            Some(reply) => Ok(OutboundMessage::reply_to(&message, reply.clone())),
            None => Err(BrainError::EmptyResponse),
        }
    }

    fn name(&self) -> &str {
        "ScriptedBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_reply_and_log() {
        let brain = ScriptedBrain::new("fixed");
        let handle = brain.clone();

        let msg = InboundMessage::new("conv-1", "first").with_system_prompt("sys");
        let response = brain.process(msg).await.unwrap();

        assert_eq!(response.text, "fixed");
        assert_eq!(handle.calls().len(), 1);
        assert_eq!(handle.last_system_prompt().as_deref(), Some("sys"));
    }

    #[tokio::test]
    async fn test_empty_brain() {
        let brain = ScriptedBrain::empty();
        let result = brain.process(InboundMessage::new("conv-1", "hi")).await;
        assert!(matches!(result, Err(BrainError::EmptyResponse)));
        assert_eq!(brain.calls().len(), 1);
    }
}
