//! Conversation browsing endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use database::{Conversation, ConversationFilter, ConversationOverview, Lead, Message};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub leads_only: bool,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
}

/// List conversations, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ConversationOverview>>> {
    if let Some(date) = &query.date {
        if !is_iso_date(date) {
            return Err(ApiError::BadRequest(format!(
                "date must be YYYY-MM-DD, got {}",
                date
            )));
        }
    }

    let filter = ConversationFilter {
        leads_only: query.leads_only,
        date: query.date,
    };
    let conversations = database::conversation::list_conversations(state.db.pool(), &filter).await?;
    Ok(Json(conversations))
}

#[derive(Debug, Serialize)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
    pub leads: Vec<Lead>,
}

/// One conversation with its messages and leads.
pub async fn detail(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<ConversationDetail>> {
    let pool = state.db.pool();
    let conversation = database::conversation::get_conversation(pool, &conversation_id).await?;
    let messages = database::message::get_history(pool, &conversation_id).await?;
    let leads = database::lead::leads_for_conversation(pool, &conversation_id).await?;

    Ok(Json(ConversationDetail {
        conversation,
        messages,
        leads,
    }))
}

fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
