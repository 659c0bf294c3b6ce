//! Conversation storage seam.

use std::collections::HashMap;

use async_trait::async_trait;
use database::{conversation, lead, message, Database, InvestorStatus, Role};
use tokio::sync::RwLock;

use crate::error::OrchestratorError;

/// One stored message as seen by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Persistence used by the orchestrator.
///
/// Abstracted so the orchestrator can run against SQLite or memory.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Create the conversation if it does not exist.
    async fn ensure_conversation(&self, conversation_id: &str) -> Result<(), OrchestratorError>;

    /// Append a message at the end of the conversation.
    async fn append_message(
        &self,
        conversation_id: &str,
        role: Role,
        content: &str,
    ) -> Result<(), OrchestratorError>;

    /// All messages in insertion order.
    async fn get_history(&self, conversation_id: &str)
        -> Result<Vec<HistoryEntry>, OrchestratorError>;

    /// Record one contact value. Saving the same value twice is a no-op.
    async fn save_lead(
        &self,
        conversation_id: &str,
        contact_type: &str,
        value: &str,
    ) -> Result<(), OrchestratorError>;

    async fn set_qualification(
        &self,
        conversation_id: &str,
        status: InvestorStatus,
        reason: &str,
    ) -> Result<(), OrchestratorError>;

    async fn mark_lead_captured(&self, conversation_id: &str) -> Result<(), OrchestratorError>;
}

#[async_trait]
impl ConversationStore for Database {
    async fn ensure_conversation(&self, conversation_id: &str) -> Result<(), OrchestratorError> {
        conversation::ensure_conversation(self.pool(), conversation_id).await?;
        Ok(())
    }

    async fn append_message(
        &self,
        conversation_id: &str,
        role: Role,
        content: &str,
    ) -> Result<(), OrchestratorError> {
        message::append_message(self.pool(), conversation_id, role, content).await?;
        Ok(())
    }

    async fn get_history(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<HistoryEntry>, OrchestratorError> {
        let rows = message::get_history(self.pool(), conversation_id).await?;
        rows.into_iter()
            .map(|row| {
                let role = Role::parse(&row.role).ok_or_else(|| {
                    OrchestratorError::Persistence(format!(
                        "unknown role '{}' in message {}",
                        row.role, row.message_id
                    ))
                })?;
                Ok(HistoryEntry {
                    role,
                    content: row.content,
                    timestamp: row.timestamp,
                })
            })
            .collect()
    }

    async fn save_lead(
        &self,
        conversation_id: &str,
        contact_type: &str,
        value: &str,
    ) -> Result<(), OrchestratorError> {
        lead::insert_lead(self.pool(), conversation_id, contact_type, value).await?;
        Ok(())
    }

    async fn set_qualification(
        &self,
        conversation_id: &str,
        status: InvestorStatus,
        reason: &str,
    ) -> Result<(), OrchestratorError> {
        conversation::set_qualification(self.pool(), conversation_id, status, reason).await?;
        Ok(())
    }

    async fn mark_lead_captured(&self, conversation_id: &str) -> Result<(), OrchestratorError> {
        conversation::mark_lead_captured(self.pool(), conversation_id).await?;
        Ok(())
    }
}

/// Snapshot of a conversation held by [`MemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryConversation {
    pub messages: Vec<HistoryEntry>,
    pub leads: Vec<(String, String)>,
    pub investor_status: Option<InvestorStatus>,
    pub qualification_reason: Option<String>,
    pub lead_captured: bool,
}

/// In-memory store for tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    conversations: RwLock<HashMap<String, MemoryConversation>>,
    fail_writes: RwLock<bool>,
    fail_leads: RwLock<bool>,
    fail_qualification: RwLock<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent message append fail.
    pub async fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().await = fail;
    }

    /// Copy of a conversation's state.
    pub async fn conversation(&self, conversation_id: &str) -> Option<MemoryConversation> {
        self.conversations.read().await.get(conversation_id).cloned()
    }

    /// Make every subsequent lead save fail.
    pub async fn set_fail_leads(&self, fail: bool) {
        *self.fail_leads.write().await = fail;
    }

    /// Make every subsequent qualification update fail.
    pub async fn set_fail_qualification(&self, fail: bool) {
        *self.fail_qualification.write().await = fail;
    }

    fn missing(conversation_id: &str) -> OrchestratorError {
        OrchestratorError::Persistence(format!("conversation not found: {}", conversation_id))
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn ensure_conversation(&self, conversation_id: &str) -> Result<(), OrchestratorError> {
        self.conversations
            .write()
            .await
            .entry(conversation_id.to_string())
            .or_default();
        Ok(())
    }

    async fn append_message(
        &self,
        conversation_id: &str,
        role: Role,
        content: &str,
    ) -> Result<(), OrchestratorError> {
        if *self.fail_writes.read().await {
            return Err(OrchestratorError::Persistence("writes disabled".to_string()));
        }

        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(conversation_id)
            .ok_or_else(|| Self::missing(conversation_id))?;
        conversation.messages.push(HistoryEntry::new(role, content));
        Ok(())
    }

    async fn get_history(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<HistoryEntry>, OrchestratorError> {
        Ok(self
            .conversations
            .read()
            .await
            .get(conversation_id)
            .map(|c| c.messages.clone())
            .unwrap_or_default())
    }

    async fn save_lead(
        &self,
        conversation_id: &str,
        contact_type: &str,
        value: &str,
    ) -> Result<(), OrchestratorError> {
        if *self.fail_leads.read().await {
            return Err(OrchestratorError::Persistence("lead writes disabled".to_string()));
        }

        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(conversation_id)
            .ok_or_else(|| Self::missing(conversation_id))?;

        let pair = (contact_type.to_string(), value.to_string());
        if !conversation.leads.contains(&pair) {
            conversation.leads.push(pair);
        }
        Ok(())
    }

    async fn set_qualification(
        &self,
        conversation_id: &str,
        status: InvestorStatus,
        reason: &str,
    ) -> Result<(), OrchestratorError> {
        if *self.fail_qualification.read().await {
            return Err(OrchestratorError::Persistence(
                "qualification writes disabled".to_string(),
            ));
        }

        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(conversation_id)
            .ok_or_else(|| Self::missing(conversation_id))?;
        conversation.investor_status = Some(status);
        conversation.qualification_reason = Some(reason.to_string());
        Ok(())
    }

    async fn mark_lead_captured(&self, conversation_id: &str) -> Result<(), OrchestratorError> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(conversation_id)
            .ok_or_else(|| Self::missing(conversation_id))?;
        conversation.lead_captured = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn sqlite() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn exercise(store: &dyn ConversationStore) {
        store.ensure_conversation("c1").await.unwrap();
        store.ensure_conversation("c1").await.unwrap();
        store.append_message("c1", Role::User, "שלום").await.unwrap();
        store.append_message("c1", Role::Assistant, "היי").await.unwrap();
        store.save_lead("c1", "phone", "0501234567").await.unwrap();
        store.save_lead("c1", "phone", "0501234567").await.unwrap();
        store
            .set_qualification("c1", InvestorStatus::Qualified, "yes")
            .await
            .unwrap();
        store.mark_lead_captured("c1").await.unwrap();

        let history = store.get_history("c1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "שלום");
        assert_eq!(history[1].role, Role::Assistant);

        assert!(store.get_history("unknown").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        exercise(&store).await;

        let conversation = store.conversation("c1").await.unwrap();
        assert_eq!(conversation.leads.len(), 1);
        assert_eq!(conversation.investor_status, Some(InvestorStatus::Qualified));
        assert!(conversation.lead_captured);
    }

    #[tokio::test]
    async fn test_database_store() {
        let db = sqlite().await;
        exercise(&db).await;

        let leads = lead::leads_for_conversation(db.pool(), "c1").await.unwrap();
        assert_eq!(leads.len(), 1);
        let conv = conversation::get_conversation(db.pool(), "c1").await.unwrap();
        assert!(conv.lead_captured);
        assert_eq!(conv.status(), InvestorStatus::Qualified);
    }

    #[tokio::test]
    async fn test_memory_store_failures() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.append_message("nope", Role::User, "x").await,
            Err(OrchestratorError::Persistence(_))
        ));

        store.ensure_conversation("c1").await.unwrap();
        store.set_fail_writes(true).await;
        assert!(store.append_message("c1", Role::User, "x").await.is_err());

        store.set_fail_leads(true).await;
        assert!(store.save_lead("c1", "email", "a@b.co").await.is_err());

        store.set_fail_qualification(true).await;
        assert!(store
            .set_qualification("c1", InvestorStatus::Qualified, "yes")
            .await
            .is_err());
    }
}
