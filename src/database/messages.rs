// ABOUTME: SQLite message log for conversation sessions
// ABOUTME: Appends immutable messages and fetches closed id ranges in creation order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use summarizer_core::errors::{AppError, AppResult};
use summarizer_core::models::{Message, MessageRole};

use super::{format_timestamp, now, parse_timestamp, MessageStore};

/// Chat message database operations
#[derive(Clone)]
pub struct MessageManager {
    pool: SqlitePool,
}

impl MessageManager {
    /// Create a new message manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a message to a session, stamped with the current time
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn append(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> AppResult<Message> {
        let created_at = now();

        let result = sqlx::query(
            r"
            INSERT INTO chat_messages (session_id, role, content, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(session_id)
        .bind(role.as_str())
        .bind(content)
        .bind(format_timestamp(created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to add message: {e}")))?;

        Ok(Message {
            id: result.last_insert_rowid(),
            session_id: session_id.to_owned(),
            role,
            content: content.to_owned(),
            created_at,
        })
    }

    /// Import a message with an id assigned elsewhere (history migration)
    ///
    /// # Errors
    ///
    /// Returns an error if the id is already taken or the write fails
    pub async fn import(&self, message: &Message) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO chat_messages (id, session_id, role, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(message.id)
        .bind(&message.session_id)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(format_timestamp(message.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to import message {}: {e}", message.id)))?;

        Ok(())
    }

    fn row_to_message(row: &SqliteRow) -> AppResult<Message> {
        let role: String = row.try_get("role")?;
        let created_at: String = row.try_get("created_at")?;
        Ok(Message {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            role: role.parse()?,
            content: row.try_get("content")?,
            created_at: parse_timestamp(&created_at)?,
        })
    }
}

#[async_trait]
impl MessageStore for MessageManager {
    async fn fetch_range(
        &self,
        session_id: &str,
        start_id: i64,
        end_id: i64,
    ) -> AppResult<Vec<Message>> {
        let rows = sqlx::query(
            r"
            SELECT id, session_id, role, content, created_at
            FROM chat_messages
            WHERE session_id = $1 AND id >= $2 AND id <= $3
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(session_id)
        .bind(start_id)
        .bind(end_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch messages: {e}")))?;

        rows.iter().map(Self::row_to_message).collect()
    }
}
