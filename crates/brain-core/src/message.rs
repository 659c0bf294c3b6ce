//! Message types exchanged with a brain.

use serde::{Deserialize, Serialize};

/// A user message on its way to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Conversation the message belongs to.
    pub conversation_id: String,
    /// The user's text.
    pub text: String,
    /// System instruction for this single call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl InboundMessage {
    /// Create a message without a system instruction.
    pub fn new(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            text: text.into(),
            system_prompt: None,
        }
    }

    /// Attach a system instruction.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// Text generated by a brain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Conversation the reply belongs to.
    pub conversation_id: String,
    /// Generated text.
    pub text: String,
}

impl OutboundMessage {
    /// Build a reply to the given inbound message.
    pub fn reply_to(message: &InboundMessage, text: impl Into<String>) -> Self {
        Self {
            conversation_id: message.conversation_id.clone(),
            text: text.into(),
        }
    }
}
