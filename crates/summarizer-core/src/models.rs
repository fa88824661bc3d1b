// ABOUTME: Domain models for chat messages and hierarchical summary nodes
// ABOUTME: Encodes summary lineage (message range or parent summaries) as a tagged variant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Summarizer Models
//!
//! A [`SummaryNode`] covers either an inclusive range of raw messages (a leaf,
//! level 1) or an ordered set of other summary nodes (a merge, level 2). The
//! lineage is held in [`SummaryLineage`] so a node can never carry both. The
//! serialized form keeps the flat `messageRange` / `parentSummaryIds` fields
//! that context-assembly consumers read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::summary::{LEAF_LEVEL, MERGE_LEVEL};
use crate::errors::AppError;

// ============================================================================
// Messages
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

impl MessageRole {
    /// Convert to string representation for storage and API calls
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(AppError::invalid_input(format!(
                "Unknown message role: {other}"
            ))),
        }
    }
}

/// A single immutable message in a conversation session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Monotonic message id
    pub id: i64,
    /// Session the message belongs to
    pub session_id: String,
    /// Author role
    pub role: MessageRole,
    /// Message text
    pub content: String,
    /// Creation time, the primary ordering key
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Summary lineage
// ============================================================================

/// Inclusive interval of message ids covered by a leaf summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRange {
    /// First message id (inclusive)
    pub start_id: i64,
    /// Last message id (inclusive)
    pub end_id: i64,
}

impl MessageRange {
    /// Build a range, rejecting non-positive ids and inverted bounds
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error when either id is not positive or
    /// `start_id > end_id`.
    pub fn new(start_id: i64, end_id: i64) -> Result<Self, AppError> {
        if start_id <= 0 || end_id <= 0 {
            return Err(AppError::invalid_input(format!(
                "Message ids must be positive integers (got {start_id}..={end_id})"
            )));
        }
        if start_id > end_id {
            return Err(AppError::invalid_input(format!(
                "startMessageId {start_id} is greater than endMessageId {end_id}"
            )));
        }
        Ok(Self { start_id, end_id })
    }

    /// Whether the id lies inside the range
    #[must_use]
    pub const fn contains(&self, id: i64) -> bool {
        id >= self.start_id && id <= self.end_id
    }
}

/// What a summary node was folded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryLineage {
    /// Leaf summary over raw messages
    Messages(MessageRange),
    /// Merge summary over existing nodes, in fold order (may be empty when
    /// the caller did not record parents)
    Summaries(Vec<i64>),
}

impl SummaryLineage {
    /// Summary level implied by this lineage
    #[must_use]
    pub const fn level(&self) -> u32 {
        match self {
            Self::Messages(_) => LEAF_LEVEL,
            Self::Summaries(_) => MERGE_LEVEL,
        }
    }
}

// ============================================================================
// Summary nodes
// ============================================================================

/// A summary node before the store assigns its id and timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSummaryNode {
    /// Session the summary belongs to
    pub session_id: String,
    /// Owner of the summary
    pub user_id: String,
    /// Generated text
    pub content: String,
    /// Messages folded (leaf) or parent summaries folded (merge)
    pub original_message_count: u32,
    /// Range or parents this node covers
    pub lineage: SummaryLineage,
}

impl NewSummaryNode {
    /// Build a leaf node over a message range
    #[must_use]
    pub fn leaf(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        content: impl Into<String>,
        range: MessageRange,
        message_count: u32,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            content: content.into(),
            original_message_count: message_count,
            lineage: SummaryLineage::Messages(range),
        }
    }

    /// Build a merge node over parent summaries
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error when the parent count does not fit in `u32`.
    pub fn merge(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        content: impl Into<String>,
        parent_summary_ids: Vec<i64>,
    ) -> Result<Self, AppError> {
        let count = u32::try_from(parent_summary_ids.len())
            .map_err(|_| AppError::invalid_input("Too many parent summaries"))?;
        Ok(Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            content: content.into(),
            original_message_count: count,
            lineage: SummaryLineage::Summaries(parent_summary_ids),
        })
    }

    /// Level this node will be stored with
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.lineage.level()
    }
}

/// Persisted summary node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "SummaryNodeWire", try_from = "SummaryNodeWire")]
pub struct SummaryNode {
    /// Store-assigned id
    pub id: i64,
    /// Session the summary belongs to
    pub session_id: String,
    /// Owner of the summary
    pub user_id: String,
    /// Generated text
    pub content: String,
    /// 1 for leaf summaries, 2 or more for merges
    pub level: u32,
    /// Messages folded (leaf) or parent summaries folded (merge)
    pub original_message_count: u32,
    /// Range or parents this node covers
    pub lineage: SummaryLineage,
    /// Only active nodes participate in context reconstruction
    pub is_active: bool,
    /// Store-assigned creation time
    pub created_at: DateTime<Utc>,
}

impl SummaryNode {
    /// Message range for leaf nodes
    #[must_use]
    pub const fn message_range(&self) -> Option<MessageRange> {
        match &self.lineage {
            SummaryLineage::Messages(range) => Some(*range),
            SummaryLineage::Summaries(_) => None,
        }
    }

    /// Parent ids for merge nodes that recorded them
    #[must_use]
    pub fn parent_summary_ids(&self) -> Option<&[i64]> {
        match &self.lineage {
            SummaryLineage::Summaries(ids) if !ids.is_empty() => Some(ids),
            _ => None,
        }
    }
}

/// Flat durable shape of a [`SummaryNode`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryNodeWire {
    /// Store-assigned id
    pub id: i64,
    /// Session id
    pub session_id: String,
    /// Owner id
    pub user_id: String,
    /// Generated text
    pub content: String,
    /// Summary level
    pub level: u32,
    /// Provenance count
    pub original_message_count: u32,
    /// Leaf range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_range: Option<MessageRange>,
    /// Merge parents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_summary_ids: Option<Vec<i64>>,
    /// Active flag
    pub is_active: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl From<SummaryNode> for SummaryNodeWire {
    fn from(node: SummaryNode) -> Self {
        let (message_range, parent_summary_ids) = match node.lineage {
            SummaryLineage::Messages(range) => (Some(range), None),
            SummaryLineage::Summaries(ids) if ids.is_empty() => (None, None),
            SummaryLineage::Summaries(ids) => (None, Some(ids)),
        };
        Self {
            id: node.id,
            session_id: node.session_id,
            user_id: node.user_id,
            content: node.content,
            level: node.level,
            original_message_count: node.original_message_count,
            message_range,
            parent_summary_ids,
            is_active: node.is_active,
            created_at: node.created_at,
        }
    }
}

impl TryFrom<SummaryNodeWire> for SummaryNode {
    type Error = AppError;

    fn try_from(wire: SummaryNodeWire) -> Result<Self, Self::Error> {
        let lineage = match (wire.level, wire.message_range, wire.parent_summary_ids) {
            (0, _, _) => {
                return Err(AppError::invalid_input("Summary level must be at least 1"));
            }
            (LEAF_LEVEL, Some(range), None) => SummaryLineage::Messages(range),
            (LEAF_LEVEL, _, _) => {
                return Err(AppError::invalid_input(
                    "Level 1 summaries must carry a messageRange and no parentSummaryIds",
                ));
            }
            (_, None, parents) => SummaryLineage::Summaries(parents.unwrap_or_default()),
            (_, Some(_), _) => {
                return Err(AppError::invalid_input(
                    "Merged summaries cannot carry a messageRange",
                ));
            }
        };
        Ok(Self {
            id: wire.id,
            session_id: wire.session_id,
            user_id: wire.user_id,
            content: wire.content,
            level: wire.level,
            original_message_count: wire.original_message_count,
            lineage,
            is_active: wire.is_active,
            created_at: wire.created_at,
        })
    }
}
