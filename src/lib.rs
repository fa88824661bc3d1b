// ABOUTME: Main library entry point for the hierarchical conversation summarizer
// ABOUTME: Condenses chat transcripts into leaf and merge summaries served over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Conversation Summarizer
//!
//! Turns an ever-growing chat transcript into a layered tree of summaries so
//! a chat turn can rebuild context without resending the whole history.
//!
//! ## Architecture
//!
//! - **Database**: `SQLite` message log and summary store
//! - **LLM**: generation client contract plus an OpenAI-compatible implementation
//! - **Summarizer**: range selection, prompt composition, and the summary engine
//! - **Routes**: authenticated `HTTP` endpoints over the engine
//! - **Config**: environment configuration built once at startup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use conversation_summarizer::config::environment::ServerConfig;
//! use conversation_summarizer::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("{}", config.summary());
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by the server binary and integration tests (tests/).

/// JWT authentication and caller identity
pub mod auth;

/// Environment configuration
pub mod config;

/// `SQLite` persistence for messages and summaries
pub mod database;

/// Text-generation client abstraction
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Shared resources for route handlers
pub mod resources;

/// `HTTP` routes
pub mod routes;

/// Summary engine, prompts, and request types
pub mod summarizer;

pub use summarizer_core::{constants, errors, models};
