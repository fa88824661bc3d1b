// ABOUTME: Constants for summary generation, transcript rendering, and service defaults
// ABOUTME: Pure data constants grouped by domain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into small domain modules rather than one flat list.

/// Summary generation constants
pub mod summary {
    /// Model used when neither the request nor the configuration names one
    pub const DEFAULT_SUMMARY_MODEL: &str = "gpt-4o-mini";

    /// Text substituted when the backend answers successfully but without usable content
    pub const FALLBACK_SUMMARY_TEXT: &str = "summary generation failed";

    /// Level assigned to summaries built directly from raw messages
    pub const LEAF_LEVEL: u32 = 1;

    /// Level assigned to summaries folded from other summaries
    pub const MERGE_LEVEL: u32 = 2;

    /// Target length (characters) requested for leaf summaries
    pub const LEAF_MAX_CHARS: usize = 200;

    /// Target length (characters) requested for merge summaries
    pub const MERGE_MAX_CHARS: usize = 300;
}

/// Transcript rendering constants
pub mod transcript {
    /// Speaker label used for every user-authored message
    pub const USER_SPEAKER_LABEL: &str = "user";
}

/// Service identification
pub mod service_names {
    /// Service name used in logs and token audiences
    pub const SUMMARIZER_SERVER: &str = "conversation-summarizer";
}

/// API endpoints
pub mod endpoints {
    /// Health check endpoint
    pub const HEALTH_CHECK: &str = "/health";
    /// Readiness endpoint (database reachable)
    pub const READY_CHECK: &str = "/ready";
    /// Summary generation endpoint
    pub const SUMMARIES: &str = "/api/summaries";
    /// Per-session summary listing endpoint
    pub const SESSION_SUMMARIES: &str = "/api/sessions/:session_id/summaries";
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}
