//! Dashboard routes.

use axum::extract::State;
use axum::Json;
use database::DashboardSummary;

use crate::error::Result;
use crate::state::AppState;

/// Totals and daily trends as JSON.
pub async fn summary(State(state): State<AppState>) -> Result<Json<DashboardSummary>> {
    let summary = database::stats::dashboard_summary(state.db.pool()).await?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{app, get, json, send, test_state};

    #[tokio::test]
    async fn test_summary_counts() {
        let state = test_state("בשמחה").await;
        send(
            app(state.clone()),
            json(
                "POST",
                "/api/chat",
                json!({ "message": "call 0501234567", "conversation_id": "c1" }),
            ),
        )
        .await;

        let (status, body) = send(app(state), get("/dashboard/summary")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_conversations"], 1);
        assert_eq!(body["total_leads"], 1);
        assert_eq!(body["signed_agreements"], 0);
        assert_eq!(body["trends"].as_array().unwrap().len(), 1);
    }
}
