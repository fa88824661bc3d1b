// ABOUTME: Text-generation abstraction used to turn composed prompts into summary text
// ABOUTME: Defines the GenerationClient contract, its configuration, and typed failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Generation Client Interface
//!
//! The summarizer never talks to a model backend directly. It hands a
//! [`PromptSpec`] and a [`GenerationConfig`] to a [`GenerationClient`] and gets
//! back either generated text or a [`GenerationError`].
//!
//! ## Key Concepts
//!
//! - **`PromptSpec`**: opaque, fully composed request (system prompt + messages)
//! - **`GenerationConfig`**: credential, model, optional routing override, thinking budget
//! - **`GenerationError`**: `Failed` for non-success upstream statuses, `Unavailable`
//!   for transport failures; neither is retried here
//!
//! ## Example: Using a Client
//!
//! ```rust,no_run
//! use conversation_summarizer::llm::{GenerationClient, GenerationConfig, PromptSpec};
//!
//! async fn example(client: &dyn GenerationClient, prompt: &PromptSpec) {
//!     let config = GenerationConfig::new("sk-test");
//!     let text = client.generate(prompt, &config).await;
//! }
//! ```

mod openai_compatible;

pub use openai_compatible::{
    OpenAiCompatibleClient, OpenAiCompatibleConfig, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use summarizer_core::constants::summary::DEFAULT_SUMMARY_MODEL;
use summarizer_core::errors::AppError;
use summarizer_core::models::MessageRole;
use thiserror::Error;

// ============================================================================
// Message Types
// ============================================================================

/// A single message sent to the generation backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

// ============================================================================
// Prompt
// ============================================================================

/// Which summarization policy produced a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    /// Summary over a raw transcript
    Leaf,
    /// Consolidation of existing summaries
    Merge,
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf => f.write_str("leaf"),
            Self::Merge => f.write_str("merge"),
        }
    }
}

/// Fully composed generation request, consumed unchanged by a [`GenerationClient`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSpec {
    /// Policy that produced this prompt
    pub mode: PromptMode,
    /// Fixed system instruction
    pub system_prompt: String,
    /// Conversation messages sent after the system instruction
    pub messages: Vec<ChatMessage>,
}

// ============================================================================
// Configuration
// ============================================================================

/// Alternate endpoint and model that replace the default route for one call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingOverride {
    /// Base URL of the alternate OpenAI-compatible endpoint
    pub base_url: String,
    /// Model name understood by the alternate endpoint
    pub actual_model: String,
}

/// Per-call generation settings
#[derive(Clone, PartialEq, Eq, Default)]
pub struct GenerationConfig {
    /// Bearer credential for the backend
    pub credential: String,
    /// Model identifier; [`DEFAULT_SUMMARY_MODEL`] when absent
    pub model: Option<String>,
    /// Alternate route, supplied as a pair or not at all
    pub routing: Option<RoutingOverride>,
    /// Reasoning token budget hint
    pub thinking_budget: Option<u32>,
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("credential", &"[REDACTED]")
            .field("model", &self.model)
            .field("routing", &self.routing)
            .field("thinking_budget", &self.thinking_budget)
            .finish()
    }
}

impl GenerationConfig {
    /// Create a configuration with only a credential
    #[must_use]
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            ..Self::default()
        }
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the routing override
    #[must_use]
    pub fn with_routing(mut self, base_url: impl Into<String>, actual_model: impl Into<String>) -> Self {
        self.routing = Some(RoutingOverride {
            base_url: base_url.into(),
            actual_model: actual_model.into(),
        });
        self
    }

    /// Set the thinking budget
    #[must_use]
    pub const fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }

    /// Pair up separately supplied routing fields
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error when only one of the two fields is present.
    pub fn routing_from_parts(
        base_url: Option<String>,
        actual_model: Option<String>,
    ) -> Result<Option<RoutingOverride>, AppError> {
        match (non_blank(base_url), non_blank(actual_model)) {
            (Some(base_url), Some(actual_model)) => Ok(Some(RoutingOverride {
                base_url,
                actual_model,
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(AppError::invalid_input(
                "baseUrl was supplied without actualModel; both or neither are required",
            )),
            (None, Some(_)) => Err(AppError::invalid_input(
                "actualModel was supplied without baseUrl; both or neither are required",
            )),
        }
    }

    /// Model to request from the default route
    #[must_use]
    pub fn effective_model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_SUMMARY_MODEL)
    }

    /// Check the configuration before any network call
    ///
    /// # Errors
    ///
    /// Returns an error when the credential is empty.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.credential.trim().is_empty() {
            return Err(AppError::missing_field("apiKey"));
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Errors
// ============================================================================

/// Terminal failures of a single generation call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// Upstream answered with a non-success status
    #[error("generation failed with status {status}: {body}")]
    Failed {
        /// Upstream HTTP status
        status: u16,
        /// Upstream response body (truncated)
        body: String,
    },
    /// Upstream could not be reached (timeout, refused connection, unreadable response)
    #[error("generation service unavailable: {0}")]
    Unavailable(String),
}

impl From<GenerationError> for AppError {
    fn from(error: GenerationError) -> Self {
        let app_error = match &error {
            GenerationError::Failed { status, body } => AppError::external_service(
                "SummaryGeneration",
                format!("upstream returned status {status}: {body}"),
            ),
            GenerationError::Unavailable(reason) => {
                AppError::external_unavailable("SummaryGeneration", reason.clone())
            }
        };
        app_error.with_source(error)
    }
}

// ============================================================================
// Client Trait
// ============================================================================

/// Executes a composed prompt against a text-generation backend
///
/// Implementations return the generated text verbatim. A successful response
/// without usable text yields the fallback summary text, not an error.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Generate text for the prompt
    async fn generate(
        &self,
        prompt: &PromptSpec,
        config: &GenerationConfig,
    ) -> Result<String, GenerationError>;
}
