// ABOUTME: SQLite store for hierarchical summary nodes
// ABOUTME: Persists leaf ranges and merge lineage and lists nodes per session and owner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use summarizer_core::errors::{AppError, AppResult};
use summarizer_core::models::{
    MessageRange, NewSummaryNode, SummaryLineage, SummaryNode, SummaryNodeWire,
};

use super::{format_timestamp, now, parse_timestamp, SummaryStore};

const SUMMARY_COLUMNS: &str = "id, session_id, user_id, content, level, original_message_count, \
     start_message_id, end_message_id, parent_summary_ids, is_active, created_at";

/// Summary node database operations
#[derive(Clone)]
pub struct SummaryManager {
    pool: SqlitePool,
}

impl SummaryManager {
    /// Create a new summary manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_node(row: &SqliteRow) -> AppResult<SummaryNode> {
        let level: i64 = row.try_get("level")?;
        let count: i64 = row.try_get("original_message_count")?;
        let start: Option<i64> = row.try_get("start_message_id")?;
        let end: Option<i64> = row.try_get("end_message_id")?;
        let parents: Option<String> = row.try_get("parent_summary_ids")?;
        let created_at: String = row.try_get("created_at")?;

        let message_range = match (start, end) {
            (Some(start_id), Some(end_id)) => Some(MessageRange { start_id, end_id }),
            _ => None,
        };
        let parent_summary_ids = parents
            .map(|raw| serde_json::from_str::<Vec<i64>>(&raw))
            .transpose()
            .map_err(|e| AppError::database(format!("Corrupt parent_summary_ids: {e}")))?;

        let wire = SummaryNodeWire {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            user_id: row.try_get("user_id")?,
            content: row.try_get("content")?,
            level: u32::try_from(level)
                .map_err(|_| AppError::database(format!("Invalid stored level {level}")))?,
            original_message_count: u32::try_from(count)
                .map_err(|_| AppError::database(format!("Invalid stored count {count}")))?,
            message_range,
            parent_summary_ids,
            is_active: row.try_get("is_active")?,
            created_at: parse_timestamp(&created_at)?,
        };

        SummaryNode::try_from(wire)
            .map_err(|e| AppError::database(format!("Inconsistent stored summary: {}", e.message)))
    }
}

#[async_trait]
impl SummaryStore for SummaryManager {
    async fn insert(&self, node: NewSummaryNode) -> AppResult<SummaryNode> {
        let created_at = now();
        let level = node.level();

        let (range, parents_json) = match &node.lineage {
            SummaryLineage::Messages(range) => (Some(*range), None),
            SummaryLineage::Summaries(ids) if ids.is_empty() => (None, None),
            SummaryLineage::Summaries(ids) => (None, Some(serde_json::to_string(ids)?)),
        };

        let result = sqlx::query(
            r"
            INSERT INTO conversation_summaries (
                session_id, user_id, content, level, original_message_count,
                start_message_id, end_message_id, parent_summary_ids, is_active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 1, $9)
            ",
        )
        .bind(&node.session_id)
        .bind(&node.user_id)
        .bind(&node.content)
        .bind(i64::from(level))
        .bind(i64::from(node.original_message_count))
        .bind(range.map(|r| r.start_id))
        .bind(range.map(|r| r.end_id))
        .bind(parents_json)
        .bind(format_timestamp(created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to store summary: {e}")))?;

        Ok(SummaryNode {
            id: result.last_insert_rowid(),
            session_id: node.session_id,
            user_id: node.user_id,
            content: node.content,
            level,
            original_message_count: node.original_message_count,
            lineage: node.lineage,
            is_active: true,
            created_at,
        })
    }

    async fn list_by_session_and_user(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> AppResult<Vec<SummaryNode>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {SUMMARY_COLUMNS}
            FROM conversation_summaries
            WHERE session_id = $1 AND user_id = $2
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(session_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list summaries: {e}")))?;

        rows.iter().map(Self::row_to_node).collect()
    }

    async fn find_by_ids(
        &self,
        session_id: &str,
        user_id: &str,
        ids: &[i64],
    ) -> AppResult<Vec<SummaryNode>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {SUMMARY_COLUMNS} FROM conversation_summaries WHERE session_id = "
        ));
        builder.push_bind(session_id);
        builder.push(" AND user_id = ");
        builder.push_bind(user_id);
        builder.push(" AND id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY created_at ASC, id ASC");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up summaries: {e}")))?;

        rows.iter().map(Self::row_to_node).collect()
    }

    async fn set_active(&self, summary_id: i64, user_id: &str, is_active: bool) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE conversation_summaries SET is_active = $1 WHERE id = $2 AND user_id = $3",
        )
        .bind(is_active)
        .bind(summary_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update summary: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}
