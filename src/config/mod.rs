// ABOUTME: Configuration module for centralized server settings
// ABOUTME: Exposes the environment-derived server configuration built once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module for the conversation summarizer
//!
//! Configuration is read from the environment exactly once and then passed
//! to constructors; nothing below reads environment variables lazily.

/// Environment and server configuration
pub mod environment;

pub use environment::{AuthConfig, DatabaseUrl, GenerationSettings, ServerConfig};
