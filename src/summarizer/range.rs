// ABOUTME: Selects the messages of a closed id range and renders them as a transcript
// ABOUTME: Read-only view over the message log used by leaf summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use summarizer_core::constants::transcript::USER_SPEAKER_LABEL;
use summarizer_core::errors::{AppError, AppResult};
use summarizer_core::models::{Message, MessageRange, MessageRole};
use tracing::debug;

use crate::database::MessageStore;

/// Fetches the messages a leaf summary folds
#[derive(Clone)]
pub struct RangeSelector {
    messages: Arc<dyn MessageStore>,
}

impl RangeSelector {
    /// Create a selector over a message store
    #[must_use]
    pub fn new(messages: Arc<dyn MessageStore>) -> Self {
        Self { messages }
    }

    /// Messages of `session_id` with ids in `[start_id, end_id]`, oldest first
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error for a malformed range and a not-found
    /// error when the range holds no messages of the session.
    pub async fn select(
        &self,
        session_id: &str,
        start_id: i64,
        end_id: i64,
    ) -> AppResult<Vec<Message>> {
        let range = MessageRange::new(start_id, end_id)?;
        let messages = self
            .messages
            .fetch_range(session_id, range.start_id, range.end_id)
            .await?;

        if messages.is_empty() {
            return Err(AppError::not_found(format!(
                "Messages {start_id}..={end_id} in session {session_id}"
            )));
        }

        debug!(
            "Selected {} messages from session {session_id} ({start_id}..={end_id})",
            messages.len()
        );
        Ok(messages)
    }
}

/// Render messages as `speaker: content` lines
///
/// User messages are labeled `user`; every other role speaks as the character.
#[must_use]
pub fn render_transcript(messages: &[Message], character_name: &str) -> String {
    messages
        .iter()
        .map(|message| {
            let speaker = match message.role {
                MessageRole::User => USER_SPEAKER_LABEL,
                MessageRole::Assistant | MessageRole::System => character_name,
            };
            format!("{speaker}: {}", message.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(id: i64, role: MessageRole, content: &str) -> Message {
        Message {
            id,
            session_id: "s-1".to_owned(),
            role,
            content: content.to_owned(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_transcript_labels_speakers() {
        let messages = vec![
            message(1, MessageRole::User, "where are we going?"),
            message(2, MessageRole::Assistant, "north, to the pass"),
            message(3, MessageRole::System, "the storm begins"),
        ];

        assert_eq!(
            render_transcript(&messages, "Aria"),
            "user: where are we going?\nAria: north, to the pass\nAria: the storm begins"
        );
    }

    #[test]
    fn test_empty_transcript() {
        assert_eq!(render_transcript(&[], "Aria"), "");
    }
}
