// ABOUTME: SQLite persistence for chat messages and summary nodes
// ABOUTME: Owns the connection pool, schema migrations, and the store traits the engine consumes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! The summarizer reads messages through [`MessageStore`] and records summary
//! nodes through [`SummaryStore`]. Both traits have `SQLite` implementations
//! backed by one shared pool; tests may swap in their own implementations.

mod messages;
mod summaries;

pub use messages::MessageManager;
pub use summaries::SummaryManager;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use summarizer_core::errors::{AppError, AppResult};
use summarizer_core::models::{Message, NewSummaryNode, SummaryNode};
use tracing::info;

/// Pool size for file-backed databases
const MAX_CONNECTIONS: u32 = 5;

// ============================================================================
// Store Traits
// ============================================================================

/// Read access to a conversation's message log
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Messages of `session_id` with ids in `[start_id, end_id]`, ascending by
    /// creation time (ties broken by id)
    async fn fetch_range(
        &self,
        session_id: &str,
        start_id: i64,
        end_id: i64,
    ) -> AppResult<Vec<Message>>;
}

/// Authoritative record of summary nodes
///
/// Nodes are immutable once inserted; only the active flag can change.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Persist a node, assigning its id and creation time
    async fn insert(&self, node: NewSummaryNode) -> AppResult<SummaryNode>;

    /// All nodes of a session owned by `user_id`, newest first
    async fn list_by_session_and_user(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> AppResult<Vec<SummaryNode>>;

    /// Nodes among `ids` that belong to the session and user
    async fn find_by_ids(
        &self,
        session_id: &str,
        user_id: &str,
        ids: &[i64],
    ) -> AppResult<Vec<SummaryNode>>;

    /// Set the active flag of a node owned by `user_id`; returns whether a row changed
    async fn set_active(&self, summary_id: i64, user_id: &str, is_active: bool) -> AppResult<bool>;
}

// ============================================================================
// Database
// ============================================================================

/// Connection pool plus schema management
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails, or a
    /// migration statement fails.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config_invalid(format!("Invalid DATABASE_URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database lives only as long as its connection, so keep
        // exactly one open for the lifetime of the pool.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(MAX_CONNECTIONS)
                .connect_with(options)
                .await?
        };

        let db = Self { pool };
        db.migrate().await?;

        info!("Database ready at {database_url}");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Message store over this pool
    #[must_use]
    pub fn messages(&self) -> MessageManager {
        MessageManager::new(self.pool.clone())
    }

    /// Summary store over this pool
    #[must_use]
    pub fn summaries(&self) -> SummaryManager {
        SummaryManager::new(self.pool.clone())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails.
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_messages().await?;
        self.migrate_summaries().await?;
        Ok(())
    }

    async fn migrate_messages(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS chat_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                role TEXT NOT NULL CHECK (role IN ('system', 'user', 'assistant')),
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_chat_messages_session_id ON chat_messages(session_id, id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn migrate_summaries(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS conversation_summaries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                content TEXT NOT NULL,
                level INTEGER NOT NULL CHECK (level >= 1),
                original_message_count INTEGER NOT NULL DEFAULT 0,
                start_message_id INTEGER,
                end_message_id INTEGER,
                parent_summary_ids TEXT,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                CHECK (
                    (level = 1 AND start_message_id IS NOT NULL AND end_message_id IS NOT NULL
                        AND start_message_id <= end_message_id AND parent_summary_ids IS NULL)
                    OR (level >= 2 AND start_message_id IS NULL AND end_message_id IS NULL)
                )
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_summaries_session_user ON conversation_summaries(session_id, user_id, created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Timestamp helpers
// ============================================================================

/// Current time at the precision the store keeps
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 text so lexical order matches chronological order
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp
pub(crate) fn parse_timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid stored timestamp {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamps_sort_lexically() {
        let earlier = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let later = earlier + chrono::Duration::microseconds(1_500);
        let (a, b) = (format_timestamp(earlier), format_timestamp(later));
        assert!(a < b);
        assert_eq!(a.len(), b.len());
        assert_eq!(parse_timestamp(&b).unwrap(), later);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
    }
}
