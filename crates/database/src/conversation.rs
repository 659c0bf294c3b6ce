//! Conversation persistence.

use sqlx::SqlitePool;

use crate::models::{Conversation, ConversationOverview, InvestorStatus};
use crate::{DatabaseError, Result};

/// Filters for [`list_conversations`].
#[derive(Debug, Clone, Default)]
pub struct ConversationFilter {
    /// Only conversations with at least one lead.
    pub leads_only: bool,
    /// Only conversations started on this date (`YYYY-MM-DD`).
    pub date: Option<String>,
}

/// Create a conversation if it does not exist yet.
///
/// Returns `true` when a new row was inserted.
pub async fn ensure_conversation(pool: &SqlitePool, conversation_id: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO conversations (conversation_id)
        VALUES (?)
        "#,
    )
    .bind(conversation_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Get a conversation by ID.
pub async fn get_conversation(pool: &SqlitePool, conversation_id: &str) -> Result<Conversation> {
    sqlx::query_as::<_, Conversation>(
        r#"
        SELECT conversation_id, start_time, investor_status, qualification_reason, lead_captured
        FROM conversations
        WHERE conversation_id = ?
        "#,
    )
    .bind(conversation_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "conversation",
        id: conversation_id.to_string(),
    })
}

/// List conversations, newest first.
pub async fn list_conversations(
    pool: &SqlitePool,
    filter: &ConversationFilter,
) -> Result<Vec<ConversationOverview>> {
    let rows = sqlx::query_as::<_, ConversationOverview>(
        r#"
        SELECT c.conversation_id, c.start_time, c.investor_status, c.qualification_reason,
               c.lead_captured,
               (SELECT COUNT(*) FROM messages m WHERE m.conversation_id = c.conversation_id)
                   AS message_count
        FROM conversations c
        WHERE (? = 0 OR EXISTS (SELECT 1 FROM leads l WHERE l.conversation_id = c.conversation_id))
          AND (? IS NULL OR DATE(c.start_time) = ?)
        ORDER BY c.start_time DESC, c.rowid DESC
        "#,
    )
    .bind(filter.leads_only)
    .bind(filter.date.as_deref())
    .bind(filter.date.as_deref())
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Record the qualified-investor status and the reason for it.
pub async fn set_qualification(
    pool: &SqlitePool,
    conversation_id: &str,
    status: InvestorStatus,
    reason: &str,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE conversations
        SET investor_status = ?, qualification_reason = ?
        WHERE conversation_id = ?
        "#,
    )
    .bind(status.as_str())
    .bind(reason)
    .bind(conversation_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "conversation",
            id: conversation_id.to_string(),
        });
    }

    Ok(())
}

/// Flag that contact details were captured from this conversation.
pub async fn mark_lead_captured(pool: &SqlitePool, conversation_id: &str) -> Result<()> {
    sqlx::query("UPDATE conversations SET lead_captured = 1 WHERE conversation_id = ?")
        .bind(conversation_id)
        .execute(pool)
        .await?;

    Ok(())
}
