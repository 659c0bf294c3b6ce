//! Lead management endpoints for the sales team.

use axum::extract::{Path, Query, State};
use axum::Json;
use database::{Lead, LeadSummary, Message};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::state::AppState;

const DEFAULT_DAYS: u32 = 7;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub days: Option<u32>,
}

/// Leads captured in the last `days` days (default 7).
pub async fn recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<LeadSummary>>> {
    let days = query.days.unwrap_or(DEFAULT_DAYS);
    let leads = database::lead::recent_leads(state.db.pool(), days).await?;
    Ok(Json(leads))
}

#[derive(Debug, Deserialize)]
pub struct UpdateLead {
    pub status: String,
    #[serde(default)]
    pub notes: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct UpdateResult {
    pub status: String,
    pub lead_id: String,
    pub lead: Lead,
}

/// Set a lead's status and merge notes.
pub async fn update(
    State(state): State<AppState>,
    Path(lead_id): Path<String>,
    Json(request): Json<UpdateLead>,
) -> Result<Json<UpdateResult>> {
    let lead = database::lead::update_lead_status(
        state.db.pool(),
        &lead_id,
        &request.status,
        request.notes.as_ref(),
    )
    .await?;

    tracing::info!(lead_id = %lead_id, status = %lead.status, "Lead updated");

    Ok(Json(UpdateResult {
        status: "success".to_string(),
        lead_id,
        lead,
    }))
}

/// Full message history of the conversation a lead came from.
pub async fn conversation_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<Vec<Message>>> {
    let pool = state.db.pool();
    database::conversation::get_conversation(pool, &conversation_id).await?;
    let messages = database::message::get_history(pool, &conversation_id).await?;
    Ok(Json(messages))
}
