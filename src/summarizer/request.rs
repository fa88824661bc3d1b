// ABOUTME: Wire payload for summary generation and its typed, validated form
// ABOUTME: Converts the flat optional-field request into a leaf or merge variant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use summarizer_core::errors::AppError;

use crate::llm::GenerationConfig;

/// Summary mode selector on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryType {
    /// Leaf summary over a message range
    #[default]
    Normal,
    /// Merge summary over existing summaries
    Super,
}

/// Request body of `POST /api/summaries`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSummaryPayload {
    /// Session to summarize
    pub session_id: Option<String>,
    /// Owner of the summary; must match the caller
    pub user_id: Option<String>,
    /// Name of the character speaking opposite the user
    pub character_name: Option<String>,
    /// `normal` (leaf) or `super` (merge); defaults to `normal`
    #[serde(default)]
    pub summary_type: SummaryType,
    /// First message id of a leaf range
    pub start_message_id: Option<i64>,
    /// Last message id of a leaf range
    pub end_message_id: Option<i64>,
    /// Concatenated text of the summaries being merged
    pub summary_content: Option<String>,
    /// Ids of the summaries being merged, in fold order
    pub parent_summary_ids: Option<Vec<i64>>,
    /// Generation credential
    pub api_key: Option<String>,
    /// Generation model
    pub model: Option<String>,
    /// Routing override endpoint
    pub base_url: Option<String>,
    /// Routing override model
    pub actual_model: Option<String>,
    /// Reasoning token budget
    pub thinking_budget: Option<u32>,
}

/// What a request asks to summarize
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryKind {
    /// Summarize raw messages in `[start_message_id, end_message_id]`
    Leaf {
        /// First message id (inclusive)
        start_message_id: i64,
        /// Last message id (inclusive)
        end_message_id: i64,
    },
    /// Consolidate existing summaries
    Merge {
        /// Concatenated text of the summaries
        summary_content: String,
        /// Parents in fold order; empty when the caller did not record them
        parent_summary_ids: Vec<i64>,
    },
}

/// Validated summary generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    /// Session to summarize
    pub session_id: String,
    /// Owner of the summary
    pub user_id: String,
    /// Character speaking opposite the user
    pub character_name: String,
    /// Generation settings
    pub generation: GenerationConfig,
    /// Leaf or merge
    pub kind: SummaryKind,
}

impl SummaryRequest {
    /// Build a leaf request
    #[must_use]
    pub fn leaf(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        character_name: impl Into<String>,
        generation: GenerationConfig,
        start_message_id: i64,
        end_message_id: i64,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            character_name: character_name.into(),
            generation,
            kind: SummaryKind::Leaf {
                start_message_id,
                end_message_id,
            },
        }
    }

    /// Build a merge request
    #[must_use]
    pub fn merge(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        character_name: impl Into<String>,
        generation: GenerationConfig,
        summary_content: impl Into<String>,
        parent_summary_ids: Vec<i64>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            character_name: character_name.into(),
            generation,
            kind: SummaryKind::Merge {
                summary_content: summary_content.into(),
                parent_summary_ids,
            },
        }
    }
}

impl GenerateSummaryPayload {
    /// Fill absent generation settings from configured defaults
    ///
    /// A credential or model in the payload wins. The routing pair is taken
    /// from the defaults only when the payload carries neither half.
    #[must_use]
    pub fn with_generation_defaults(mut self, defaults: &GenerationConfig) -> Self {
        if is_blank(self.api_key.as_deref()) && !defaults.credential.is_empty() {
            self.api_key = Some(defaults.credential.clone());
        }
        if is_blank(self.model.as_deref()) {
            self.model.clone_from(&defaults.model);
        }
        if is_blank(self.base_url.as_deref()) && is_blank(self.actual_model.as_deref()) {
            if let Some(routing) = &defaults.routing {
                self.base_url = Some(routing.base_url.clone());
                self.actual_model = Some(routing.actual_model.clone());
            }
        }
        if self.thinking_budget.is_none() {
            self.thinking_budget = defaults.thinking_budget;
        }
        self
    }
}

impl TryFrom<GenerateSummaryPayload> for SummaryRequest {
    type Error = AppError;

    fn try_from(payload: GenerateSummaryPayload) -> Result<Self, Self::Error> {
        let session_id = required(payload.session_id, "sessionId")?;
        let user_id = required(payload.user_id, "userId")?;
        let character_name = required(payload.character_name, "characterName")?;

        let kind = match payload.summary_type {
            SummaryType::Normal => SummaryKind::Leaf {
                start_message_id: payload
                    .start_message_id
                    .ok_or_else(|| AppError::missing_field("startMessageId"))?,
                end_message_id: payload
                    .end_message_id
                    .ok_or_else(|| AppError::missing_field("endMessageId"))?,
            },
            // Range fields have no meaning for a merge and are dropped.
            SummaryType::Super => SummaryKind::Merge {
                summary_content: required(payload.summary_content, "summaryContent")?,
                parent_summary_ids: payload.parent_summary_ids.unwrap_or_default(),
            },
        };

        let generation = GenerationConfig {
            credential: payload.api_key.unwrap_or_default(),
            model: payload.model.filter(|m| !m.trim().is_empty()),
            routing: GenerationConfig::routing_from_parts(payload.base_url, payload.actual_model)?,
            thinking_budget: payload.thinking_budget,
        };

        Ok(Self {
            session_id,
            user_id,
            character_name,
            generation,
            kind,
        })
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::missing_field(field))
}
