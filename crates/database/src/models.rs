//! Database models.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Qualified-investor status of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestorStatus {
    Unknown,
    Qualified,
    NotQualified,
}

impl InvestorStatus {
    /// Column representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestorStatus::Unknown => "Unknown",
            InvestorStatus::Qualified => "Qualified",
            InvestorStatus::NotQualified => "NotQualified",
        }
    }

    /// Parse a stored value; anything unrecognized reads as `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value {
            "Qualified" => InvestorStatus::Qualified,
            "NotQualified" => InvestorStatus::NotQualified,
            _ => InvestorStatus::Unknown,
        }
    }
}

impl Default for InvestorStatus {
    fn default() -> Self {
        InvestorStatus::Unknown
    }
}

impl fmt::Display for InvestorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a stored message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    /// Opaque identifier (UUID v4 when minted by the server).
    pub conversation_id: String,
    /// Creation timestamp.
    pub start_time: String,
    /// One of `Unknown`, `Qualified`, `NotQualified`.
    pub investor_status: String,
    /// Free-text note explaining the qualification status.
    pub qualification_reason: Option<String>,
    /// Whether contact details were captured from this conversation.
    pub lead_captured: bool,
}

impl Conversation {
    pub fn status(&self) -> InvestorStatus {
        InvestorStatus::parse(&self.investor_status)
    }
}

/// A single message, ordered by `message_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub message_id: i64,
    pub conversation_id: String,
    /// `user` or `assistant`.
    pub role: String,
    pub content: String,
    pub timestamp: String,
}

/// A captured contact detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub lead_id: String,
    pub conversation_id: String,
    /// Bucket the value came from (`phone`, `email`, `name`, ...).
    pub contact_type: String,
    pub contact_value: String,
    pub timestamp: String,
    /// Sales pipeline status, `new` on capture.
    pub status: String,
    /// JSON object with capture metadata and status history.
    pub notes: Option<String>,
    pub investor_status: Option<String>,
    pub agreement_status: Option<String>,
}

/// A lead joined with its conversation, for the recent-leads view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LeadSummary {
    pub lead_id: String,
    pub conversation_id: String,
    pub contact_type: String,
    pub contact_value: String,
    pub timestamp: String,
    pub status: String,
    pub notes: Option<String>,
    pub investor_status: Option<String>,
    pub agreement_status: Option<String>,
    pub qualification_reason: Option<String>,
    pub message_count: i64,
}

/// A conversation row with its message count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ConversationOverview {
    pub conversation_id: String,
    pub start_time: String,
    pub investor_status: String,
    pub qualification_reason: Option<String>,
    pub lead_captured: bool,
    pub message_count: i64,
}

/// Per-day activity counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DailyTrend {
    pub date: String,
    pub conversations: i64,
    pub leads: i64,
    pub agreements: i64,
}

/// Totals shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_conversations: i64,
    pub total_leads: i64,
    pub signed_agreements: i64,
    pub qualified_investors: i64,
    pub trends: Vec<DailyTrend>,
}
