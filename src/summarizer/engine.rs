// ABOUTME: Orchestrates leaf and merge summary generation end to end
// ABOUTME: Authorizes, validates, composes, generates, and persists summary nodes with lineage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;
use std::sync::Arc;

use summarizer_core::errors::{AppError, AppResult};
use summarizer_core::models::{MessageRange, NewSummaryNode, SummaryLineage, SummaryNode};
use tracing::{error, info, instrument, warn};

use super::prompts::PromptComposer;
use super::range::{render_transcript, RangeSelector};
use super::request::{SummaryKind, SummaryRequest};
use crate::auth::AuthenticatedUser;
use crate::database::{MessageStore, SummaryStore};
use crate::llm::{GenerationClient, PromptSpec};

/// Summary generation and listing
#[derive(Clone)]
pub struct SummaryEngine {
    selector: RangeSelector,
    store: Arc<dyn SummaryStore>,
    client: Arc<dyn GenerationClient>,
    composer: PromptComposer,
}

impl SummaryEngine {
    /// Create an engine over the given collaborators
    #[must_use]
    pub fn new(
        messages: Arc<dyn MessageStore>,
        store: Arc<dyn SummaryStore>,
        client: Arc<dyn GenerationClient>,
    ) -> Self {
        Self {
            selector: RangeSelector::new(messages),
            store,
            client,
            composer: PromptComposer::new(),
        }
    }

    /// Check that the caller acts on their own behalf
    ///
    /// # Errors
    ///
    /// Returns a permission error when `user_id` is absent or differs from the caller.
    pub fn authorize(user_id: Option<&str>, identity: &AuthenticatedUser) -> AppResult<()> {
        if user_id == Some(identity.user_id.as_str()) {
            Ok(())
        } else {
            warn!(
                "User {} attempted to act for another user's summaries",
                identity.user_id
            );
            Err(AppError::forbidden(
                "Summaries can only be generated or read by their owner",
            ))
        }
    }

    /// Generate and persist one summary node
    ///
    /// Nothing is written unless generation succeeds.
    ///
    /// # Errors
    ///
    /// - permission denied when the request is for another user
    /// - invalid input for blank fields, a malformed range, range endpoints that
    ///   are not messages of the session, or unknown parents
    /// - not found when the range holds no messages
    /// - external service errors when generation fails
    /// - database error when the node cannot be stored
    #[instrument(
        skip(self, request, identity),
        fields(session_id = %request.session_id, user_id = %identity.user_id)
    )]
    pub async fn generate(
        &self,
        request: SummaryRequest,
        identity: &AuthenticatedUser,
    ) -> AppResult<SummaryNode> {
        Self::authorize(Some(&request.user_id), identity)?;

        require_non_blank(&request.session_id, "sessionId")?;
        require_non_blank(&request.user_id, "userId")?;
        require_non_blank(&request.character_name, "characterName")?;
        request.generation.validate()?;

        let (prompt, lineage, count) = match &request.kind {
            SummaryKind::Leaf {
                start_message_id,
                end_message_id,
            } => {
                self.prepare_leaf(&request, *start_message_id, *end_message_id)
                    .await?
            }
            SummaryKind::Merge {
                summary_content,
                parent_summary_ids,
            } => {
                self.prepare_merge(&request, summary_content, parent_summary_ids)
                    .await?
            }
        };

        let content = self
            .client
            .generate(&prompt, &request.generation)
            .await
            .map_err(|e| {
                error!("Summary generation via {} failed: {e}", self.client.name());
                AppError::from(e)
            })?;

        let node = NewSummaryNode {
            session_id: request.session_id,
            user_id: request.user_id,
            content,
            original_message_count: count,
            lineage,
        };

        let saved = self.store.insert(node).await.map_err(|e| {
            error!("Failed to persist generated summary: {e}");
            AppError::database(format!("Failed to persist summary: {}", e.message))
        })?;

        info!(
            summary_id = saved.id,
            level = saved.level,
            original_message_count = saved.original_message_count,
            "Summary generated"
        );
        Ok(saved)
    }

    /// Summaries of a session owned by the caller, newest first
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for a blank session id or a database
    /// error if the store cannot be read.
    #[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    pub async fn list_for_session(
        &self,
        session_id: &str,
        identity: &AuthenticatedUser,
    ) -> AppResult<Vec<SummaryNode>> {
        require_non_blank(session_id, "sessionId")?;
        self.store
            .list_by_session_and_user(session_id, &identity.user_id)
            .await
    }

    async fn prepare_leaf(
        &self,
        request: &SummaryRequest,
        start_id: i64,
        end_id: i64,
    ) -> AppResult<(PromptSpec, SummaryLineage, u32)> {
        let range = MessageRange::new(start_id, end_id)?;
        let messages = self
            .selector
            .select(&request.session_id, range.start_id, range.end_id)
            .await?;
        let first = messages.iter().map(|m| m.id).min();
        let last = messages.iter().map(|m| m.id).max();
        if first != Some(range.start_id) || last != Some(range.end_id) {
            return Err(AppError::invalid_input(format!(
                "Message range {}..={} must start and end on messages of session {}",
                range.start_id, range.end_id, request.session_id
            )));
        }
        let count = u32::try_from(messages.len())
            .map_err(|_| AppError::invalid_input("Message range is too large to summarize"))?;

        let transcript = render_transcript(&messages, &request.character_name);
        let prompt = self
            .composer
            .compose_leaf(&transcript, &request.character_name);

        Ok((prompt, SummaryLineage::Messages(range), count))
    }

    async fn prepare_merge(
        &self,
        request: &SummaryRequest,
        summary_content: &str,
        parent_ids: &[i64],
    ) -> AppResult<(PromptSpec, SummaryLineage, u32)> {
        require_non_blank(summary_content, "summaryContent")?;

        if !parent_ids.is_empty() {
            let found: HashSet<i64> = self
                .store
                .find_by_ids(&request.session_id, &request.user_id, parent_ids)
                .await?
                .into_iter()
                .map(|node| node.id)
                .collect();
            let missing: Vec<i64> = parent_ids
                .iter()
                .copied()
                .filter(|id| !found.contains(id))
                .collect();
            if !missing.is_empty() {
                return Err(AppError::invalid_input(format!(
                    "Parent summaries {missing:?} do not exist in session {}",
                    request.session_id
                )));
            }
        }

        let count = u32::try_from(parent_ids.len())
            .map_err(|_| AppError::invalid_input("Too many parent summaries"))?;
        let prompt = self.composer.compose_merge(summary_content);

        Ok((prompt, SummaryLineage::Summaries(parent_ids.to_vec()), count))
    }
}

fn require_non_blank(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        Err(AppError::missing_field(field))
    } else {
        Ok(())
    }
}
