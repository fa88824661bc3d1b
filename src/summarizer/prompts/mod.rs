// ABOUTME: Prompt composition for leaf (transcript) and merge (summary-of-summaries) generation
// ABOUTME: Templates are loaded at compile time from markdown files next to this module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Summary Prompts
//!
//! Pure transformation from source text to a [`PromptSpec`]. No generation
//! happens here, so template wording can be tested without a backend.

use summarizer_core::constants::summary::{LEAF_MAX_CHARS, MERGE_MAX_CHARS};

use crate::llm::{ChatMessage, PromptMode, PromptSpec};

/// Fixed system instruction sent with every summary request
pub const SUMMARIZER_SYSTEM_PROMPT: &str = include_str!("summarizer_system.md");

/// Template for summaries over a raw transcript
const LEAF_TEMPLATE: &str = include_str!("leaf_summary.md");

/// Template for consolidating existing summaries
const MERGE_TEMPLATE: &str = include_str!("merge_summary.md");

/// Builds generation requests for leaf and merge summaries
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer;

impl PromptComposer {
    /// Create a composer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Compose a leaf prompt from a rendered `speaker: text` transcript
    #[must_use]
    pub fn compose_leaf(&self, transcript: &str, character_name: &str) -> PromptSpec {
        let max_chars = LEAF_MAX_CHARS.to_string();
        let body = fill(
            LEAF_TEMPLATE,
            &[
                ("character_name", character_name),
                ("max_chars", &max_chars),
                ("transcript", transcript),
            ],
        );

        Self::spec(PromptMode::Leaf, body)
    }

    /// Compose a merge prompt from the concatenated text of the summaries being folded
    #[must_use]
    pub fn compose_merge(&self, concatenated_summaries: &str) -> PromptSpec {
        let max_chars = MERGE_MAX_CHARS.to_string();
        let body = fill(
            MERGE_TEMPLATE,
            &[("max_chars", &max_chars), ("summaries", concatenated_summaries)],
        );

        Self::spec(PromptMode::Merge, body)
    }

    fn spec(mode: PromptMode, body: String) -> PromptSpec {
        PromptSpec {
            mode,
            system_prompt: SUMMARIZER_SYSTEM_PROMPT.trim().to_owned(),
            messages: vec![ChatMessage::user(body.trim_end())],
        }
    }
}

/// Replace `{name}` placeholders of the template in one scan.
///
/// Substituted values are copied verbatim, so braces inside them stay literal.
/// Unknown placeholders are left as written.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let substitution = tail.find('}').and_then(|close| {
            let name = &tail[1..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match substitution {
            Some((value, close)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
