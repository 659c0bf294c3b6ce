//! Lead persistence.

use serde_json::{Map, Value};
use sqlx::SqlitePool;

use crate::models::{Lead, LeadSummary};
use crate::validation::{
    validate_contact_type, validate_contact_value, validate_lead_status, validate_notes,
};
use crate::{DatabaseError, Result};

/// Record a contact value for a conversation.
///
/// Idempotent per `(conversation_id, contact_type, contact_value)`. Returns
/// `true` when a new lead row was written.
pub async fn insert_lead(
    pool: &SqlitePool,
    conversation_id: &str,
    contact_type: &str,
    contact_value: &str,
) -> Result<bool> {
    validate_contact_type(contact_type)?;
    validate_contact_value(contact_value)?;

    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO leads (conversation_id, contact_type, contact_value, status, notes)
        VALUES (?, ?, ?, 'new', json_object('source', 'chat', 'capture_time', datetime('now')))
        "#,
    )
    .bind(conversation_id)
    .bind(contact_type)
    .bind(contact_value)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Leads captured within the last `days` days, newest first.
pub async fn recent_leads(pool: &SqlitePool, days: u32) -> Result<Vec<LeadSummary>> {
    let modifier = format!("-{} day", days);
    let rows = sqlx::query_as::<_, LeadSummary>(
        r#"
        SELECT l.lead_id, l.conversation_id, l.contact_type, l.contact_value, l.timestamp,
               l.status, l.notes, l.investor_status, l.agreement_status,
               c.qualification_reason,
               (SELECT COUNT(*) FROM messages m WHERE m.conversation_id = l.conversation_id)
                   AS message_count
        FROM leads l
        JOIN conversations c ON l.conversation_id = c.conversation_id
        WHERE l.timestamp >= datetime('now', ?)
        ORDER BY l.timestamp DESC, l.rowid DESC
        "#,
    )
    .bind(modifier)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Get a lead by ID.
pub async fn get_lead(pool: &SqlitePool, lead_id: &str) -> Result<Lead> {
    sqlx::query_as::<_, Lead>(
        r#"
        SELECT lead_id, conversation_id, contact_type, contact_value, timestamp,
               status, notes, investor_status, agreement_status
        FROM leads
        WHERE lead_id = ?
        "#,
    )
    .bind(lead_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "lead",
        id: lead_id.to_string(),
    })
}

/// Set a lead's status and merge new notes into the stored ones.
///
/// Keys already present in the stored notes are kept; `last_update` and
/// `last_status` are always refreshed.
pub async fn update_lead_status(
    pool: &SqlitePool,
    lead_id: &str,
    status: &str,
    notes: Option<&Value>,
) -> Result<Lead> {
    let status = status.trim();
    validate_lead_status(status)?;
    if let Some(notes) = notes {
        validate_notes(notes)?;
    }

    let current = get_lead(pool, lead_id).await?;
    let merged = merge_notes(current.notes.as_deref(), notes);

    sqlx::query(
        r#"
        UPDATE leads
        SET status = ?,
            notes = json_set(?, '$.last_update', datetime('now'), '$.last_status', ?)
        WHERE lead_id = ?
        "#,
    )
    .bind(status)
    .bind(Value::Object(merged).to_string())
    .bind(status)
    .bind(lead_id)
    .execute(pool)
    .await?;

    get_lead(pool, lead_id).await
}

fn merge_notes(existing: Option<&str>, incoming: Option<&Value>) -> Map<String, Value> {
    let mut merged = match incoming {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    // Corrupt stored notes are replaced rather than failing the update.
    let stored = existing
        .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
        .and_then(|value| match value {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .unwrap_or_default();

    for (key, value) in stored {
        merged.insert(key, value);
    }

    merged
}

/// All leads captured from a conversation, in capture order.
pub async fn leads_for_conversation(pool: &SqlitePool, conversation_id: &str) -> Result<Vec<Lead>> {
    let rows = sqlx::query_as::<_, Lead>(
        r#"
        SELECT lead_id, conversation_id, contact_type, contact_value, timestamp,
               status, notes, investor_status, agreement_status
        FROM leads
        WHERE conversation_id = ?
        ORDER BY timestamp ASC, rowid ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::{conversation, message, Database, ValidationError};
    use serde_json::json;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        conversation::ensure_conversation(db.pool(), "c1").await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_insert_lead_is_idempotent() {
        let db = test_db().await;

        assert!(insert_lead(db.pool(), "c1", "phone", "0501234567").await.unwrap());
        assert!(!insert_lead(db.pool(), "c1", "phone", "0501234567").await.unwrap());
        assert!(insert_lead(db.pool(), "c1", "email", "a@b.com").await.unwrap());

        let leads = leads_for_conversation(db.pool(), "c1").await.unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].contact_type, "phone");
        assert_eq!(leads[0].status, "new");
        assert_eq!(leads[0].lead_id.len(), 32);

        let notes: Value = serde_json::from_str(leads[0].notes.as_deref().unwrap()).unwrap();
        assert_eq!(notes["source"], "chat");
        assert!(notes.get("capture_time").is_some());
    }

    #[tokio::test]
    async fn test_insert_lead_validates() {
        let db = test_db().await;
        let result = insert_lead(db.pool(), "c1", "fax", "123").await;
        assert!(matches!(
            result,
            Err(DatabaseError::Validation(ValidationError::UnknownContactType(_)))
        ));
    }

    #[tokio::test]
    async fn test_recent_leads_include_conversation_data() {
        let db = test_db().await;
        message::append_message(db.pool(), "c1", Role::User, "0501234567")
            .await
            .unwrap();
        message::append_message(db.pool(), "c1", Role::Assistant, "תודה")
            .await
            .unwrap();
        insert_lead(db.pool(), "c1", "phone", "0501234567").await.unwrap();

        let leads = recent_leads(db.pool(), 7).await.unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].message_count, 2);
        assert_eq!(leads[0].contact_value, "0501234567");
    }

    #[tokio::test]
    async fn test_update_lead_status_merges_notes() {
        let db = test_db().await;
        insert_lead(db.pool(), "c1", "email", "a@b.com").await.unwrap();
        let lead_id = leads_for_conversation(db.pool(), "c1").await.unwrap()[0]
            .lead_id
            .clone();

        let updated = update_lead_status(
            db.pool(),
            &lead_id,
            "contacted",
            Some(&json!({"source": "phone call", "agent": "dana"})),
        )
        .await
        .unwrap();

        assert_eq!(updated.status, "contacted");
        let notes: Value = serde_json::from_str(updated.notes.as_deref().unwrap()).unwrap();
        // Stored keys win over incoming ones.
        assert_eq!(notes["source"], "chat");
        assert_eq!(notes["agent"], "dana");
        assert_eq!(notes["last_status"], "contacted");
        assert!(notes.get("last_update").is_some());

        let again = update_lead_status(db.pool(), &lead_id, "closed", None)
            .await
            .unwrap();
        let notes: Value = serde_json::from_str(again.notes.as_deref().unwrap()).unwrap();
        assert_eq!(notes["last_status"], "closed");
        assert_eq!(notes["agent"], "dana");
    }

    #[tokio::test]
    async fn test_update_missing_lead() {
        let db = test_db().await;
        let result = update_lead_status(db.pool(), "ghost", "contacted", None).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_rejects_empty_status() {
        let db = test_db().await;
        let result = update_lead_status(db.pool(), "ghost", "  ", None).await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }

    #[test]
    fn test_merge_notes_handles_corrupt_storage() {
        let merged = merge_notes(Some("not json"), Some(&json!({"a": 1})));
        assert_eq!(merged.get("a"), Some(&json!(1)));
        assert!(merge_notes(None, None).is_empty());
    }
}
