//! SQLite persistence layer for the Movne sales assistant.
//!
//! This crate provides async database operations for conversations, their
//! messages, captured leads and dashboard aggregates using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{conversation, message, Database, Role};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:movne.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     conversation::ensure_conversation(db.pool(), "c27fb365").await?;
//!     message::append_message(db.pool(), "c27fb365", Role::User, "שלום").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod conversation;
pub mod error;
pub mod lead;
pub mod message;
pub mod models;
pub mod stats;
pub mod validation;

pub use conversation::ConversationFilter;
pub use error::{DatabaseError, Result};
pub use models::{
    Conversation, ConversationOverview, DailyTrend, DashboardSummary, InvestorStatus, Lead,
    LeadSummary, Message, Role,
};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// In-memory databases are per connection, so tests should use
    /// [`Database::connect_with_pool_size`] with a single connection.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Cheap liveness probe used by the health endpoint.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_conversation_flow() {
        let db = test_db().await;
        db.ping().await.unwrap();

        conversation::ensure_conversation(db.pool(), "conv-1").await.unwrap();
        message::append_message(db.pool(), "conv-1", Role::User, "מה התשואה?")
            .await
            .unwrap();
        message::append_message(db.pool(), "conv-1", Role::Assistant, "האם אתה משקיע כשיר?")
            .await
            .unwrap();
        conversation::set_qualification(
            db.pool(),
            "conv-1",
            InvestorStatus::NotQualified,
            "answered no",
        )
        .await
        .unwrap();

        let conv = conversation::get_conversation(db.pool(), "conv-1").await.unwrap();
        assert_eq!(conv.status(), InvestorStatus::NotQualified);

        let history = message::get_history(db.pool(), "conv-1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(Role::parse(&history[0].role), Some(Role::User));
    }

    #[tokio::test]
    async fn test_migrate_twice() {
        let db = test_db().await;
        db.migrate().await.unwrap();
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            InvestorStatus::Unknown,
            InvestorStatus::Qualified,
            InvestorStatus::NotQualified,
        ] {
            assert_eq!(InvestorStatus::parse(status.as_str()), status);
        }
        assert_eq!(InvestorStatus::parse("garbage"), InvestorStatus::Unknown);
    }
}
