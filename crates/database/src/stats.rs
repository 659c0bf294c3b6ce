//! Dashboard aggregates.

use sqlx::SqlitePool;

use crate::models::{DailyTrend, DashboardSummary};
use crate::Result;

/// Lead agreement status recorded once the marketing agreement is signed.
pub const SIGNED_AGREEMENT_STATUS: &str = "חתם על הסכם";

/// Totals plus per-day trends.
pub async fn dashboard_summary(pool: &SqlitePool) -> Result<DashboardSummary> {
    let (total_conversations,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversations")
        .fetch_one(pool)
        .await?;

    let (total_leads,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM leads")
        .fetch_one(pool)
        .await?;

    let (signed_agreements,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM leads WHERE agreement_status = ?")
            .bind(SIGNED_AGREEMENT_STATUS)
            .fetch_one(pool)
            .await?;

    let (qualified_investors,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM conversations WHERE investor_status = 'Qualified'")
            .fetch_one(pool)
            .await?;

    let trends = daily_trends(pool).await?;

    Ok(DashboardSummary {
        total_conversations,
        total_leads,
        signed_agreements,
        qualified_investors,
        trends,
    })
}

/// Conversations, leads and signed agreements grouped by conversation start date.
pub async fn daily_trends(pool: &SqlitePool) -> Result<Vec<DailyTrend>> {
    let rows = sqlx::query_as::<_, DailyTrend>(
        r#"
        SELECT DATE(c.start_time) AS date,
               COUNT(DISTINCT c.conversation_id) AS conversations,
               COUNT(DISTINCT l.lead_id) AS leads,
               COUNT(DISTINCT CASE WHEN l.agreement_status = ? THEN l.lead_id END) AS agreements
        FROM conversations c
        LEFT JOIN leads l ON c.conversation_id = l.conversation_id
        GROUP BY DATE(c.start_time)
        ORDER BY date ASC
        "#,
    )
    .bind(SIGNED_AGREEMENT_STATUS)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
