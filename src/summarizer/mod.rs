// ABOUTME: Hierarchical conversation summarization: leaf summaries over message ranges
// ABOUTME: and merge summaries over existing summaries, persisted with lineage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Conversation Summarizer
//!
//! Condenses a growing chat transcript into a tree of summaries. Level 1
//! nodes cover a closed range of message ids; level 2 nodes fold existing
//! nodes together. Callers pick non-overlapping ranges; the engine records
//! what each node covers so context can be rebuilt from the tree.
//!
//! ```text
//! SummaryRequest -> SummaryEngine -> RangeSelector | caller text
//!                                 -> PromptComposer -> GenerationClient
//!                                 -> SummaryStore -> SummaryNode
//! ```

mod engine;
mod guard;
/// Prompt templates for leaf and merge summaries
pub mod prompts;
mod range;
mod request;

pub use engine::SummaryEngine;
pub use guard::{SessionGenerationGuard, SessionPermit};
pub use prompts::PromptComposer;
pub use range::{render_transcript, RangeSelector};
pub use request::{GenerateSummaryPayload, SummaryKind, SummaryRequest, SummaryType};
