//! Lead capture from a conversation's user messages.

use database::Role;
use tracing::{debug, info};

use crate::contact::{ContactCandidate, ContactExtractor};
use crate::error::OrchestratorError;
use crate::store::ConversationStore;

/// Runs contact extraction over a conversation and stores the results.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadTracker {
    extractor: ContactExtractor,
}

impl LeadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract from every user message and save each `(bucket, value)` pair.
    ///
    /// Returns what was found. The conversation is marked lead-captured when
    /// anything was found.
    pub async fn capture<S: ConversationStore + ?Sized>(
        &self,
        store: &S,
        conversation_id: &str,
    ) -> Result<ContactCandidate, OrchestratorError> {
        let history = store.get_history(conversation_id).await?;
        let candidate = self.extractor.extract_all(
            history
                .iter()
                .filter(|e| e.role == Role::User)
                .map(|e| e.content.as_str()),
        );

        if candidate.is_empty() {
            debug!(conversation_id, "No contact details found");
            return Ok(candidate);
        }

        let mut saved = 0;
        for (bucket, value) in candidate.pairs() {
            store.save_lead(conversation_id, bucket, value).await?;
            saved += 1;
        }
        store.mark_lead_captured(conversation_id).await?;

        info!(conversation_id, saved, "Captured lead details");
        Ok(candidate)
    }
}
