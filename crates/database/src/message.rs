//! Message persistence.

use sqlx::SqlitePool;

use crate::models::{Message, Role};
use crate::Result;

/// Append a message to a conversation and return its ID.
pub async fn append_message(
    pool: &SqlitePool,
    conversation_id: &str,
    role: Role,
    content: &str,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO messages (conversation_id, role, content)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(conversation_id)
    .bind(role.as_str())
    .bind(content)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Get all messages of a conversation in insertion order.
pub async fn get_history(pool: &SqlitePool, conversation_id: &str) -> Result<Vec<Message>> {
    let rows = sqlx::query_as::<_, Message>(
        r#"
        SELECT message_id, conversation_id, role, content, timestamp
        FROM messages
        WHERE conversation_id = ?
        ORDER BY message_id ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
