// ABOUTME: OpenAI-compatible HTTP implementation of the GenerationClient contract
// ABOUTME: Handles routing overrides, thinking budgets, timeouts, and fallback summary text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI`-Compatible Generation Client
//!
//! Sends composed summary prompts to any endpoint implementing the `OpenAI`
//! chat completions API. A per-request [`RoutingOverride`](super::RoutingOverride)
//! swaps both the base URL and the model for a single call.
//!
//! ## Failure mapping
//!
//! - connect error, timeout, unreadable body → [`GenerationError::Unavailable`]
//! - non-2xx status → [`GenerationError::Failed`] with the status and a body excerpt
//! - 2xx without usable text → fallback summary text (success)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use summarizer_core::constants::summary::FALLBACK_SUMMARY_TEXT;
use summarizer_core::errors::AppError;
use tracing::{debug, error, instrument, warn};

use super::{ChatMessage, GenerationClient, GenerationConfig, GenerationError, PromptSpec};

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default base URL for the generation backend
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Connection timeout
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default whole-request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Longest upstream error body kept in a `Failed` error
const MAX_ERROR_BODY_CHARS: usize = 500;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// OpenAI-compatible API request structure
#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking: Option<ThinkingOptions>,
}

/// Message structure for OpenAI-compatible API
#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for OpenAiMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

/// Reasoning budget extension understood by thinking-capable backends
#[derive(Debug, Serialize)]
struct ThinkingOptions {
    #[serde(rename = "type")]
    kind: &'static str,
    budget_tokens: u32,
}

/// OpenAI-compatible API response structure
///
/// Every field is optional: a success response that lacks text falls back to
/// the fixed summary text instead of failing. A top-level `content` field is
/// accepted for gateways that flatten the completion.
#[derive(Debug, Default, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

/// Choice in response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    #[serde(default)]
    message: Option<OpenAiResponseMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Message in response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiResponse {
    /// First non-blank text in the response
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .or(self.content)
            .filter(|text| !text.trim().is_empty())
    }
}

// ============================================================================
// Client Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible generation client
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL used when a request carries no routing override
    pub base_url: String,
    /// Upper bound for one generation call; expiry is reported as unavailable
    pub request_timeout: Duration,
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

// ============================================================================
// Client Implementation
// ============================================================================

/// Generation client for `OpenAI`-compatible chat completion endpoints
pub struct OpenAiCompatibleClient {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Build the chat completions URL for a base URL
    fn completions_url(base_url: &str) -> String {
        format!("{}/chat/completions", base_url.trim_end_matches('/'))
    }

    /// Resolve base URL and model, honoring the routing override
    fn resolve_route<'a>(&'a self, config: &'a GenerationConfig) -> (&'a str, &'a str) {
        config.routing.as_ref().map_or_else(
            || (self.config.base_url.as_str(), config.effective_model()),
            |routing| (routing.base_url.as_str(), routing.actual_model.as_str()),
        )
    }

    /// Assemble the wire messages: system instruction first, then the prompt body
    fn convert_messages(prompt: &PromptSpec) -> Vec<OpenAiMessage<'_>> {
        let mut messages = Vec::with_capacity(prompt.messages.len() + 1);
        messages.push(OpenAiMessage {
            role: "system",
            content: &prompt.system_prompt,
        });
        messages.extend(prompt.messages.iter().map(OpenAiMessage::from));
        messages
    }

    /// Describe a transport failure
    fn transport_error(error: &reqwest::Error, base_url: &str) -> GenerationError {
        if error.is_timeout() {
            GenerationError::Unavailable(format!("request to {base_url} timed out"))
        } else if error.is_connect() {
            GenerationError::Unavailable(format!("cannot connect to {base_url}"))
        } else {
            GenerationError::Unavailable(format!("request to {base_url} failed: {error}"))
        }
    }
}

#[async_trait]
impl GenerationClient for OpenAiCompatibleClient {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    #[instrument(skip(self, prompt, config), fields(mode = %prompt.mode, model = tracing::field::Empty))]
    async fn generate(
        &self,
        prompt: &PromptSpec,
        config: &GenerationConfig,
    ) -> Result<String, GenerationError> {
        let (base_url, model) = self.resolve_route(config);
        tracing::Span::current().record("model", model);

        let request = OpenAiRequest {
            model,
            messages: Self::convert_messages(prompt),
            stream: false,
            thinking: config.thinking_budget.map(|budget_tokens| ThinkingOptions {
                kind: "enabled",
                budget_tokens,
            }),
        };

        debug!(
            "Sending {} summary request with {} messages to {}",
            prompt.mode,
            request.messages.len(),
            base_url
        );

        let response = self
            .client
            .post(Self::completions_url(base_url))
            .bearer_auth(&config.credential)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send summary request to {base_url}: {e}");
                Self::transport_error(&e, base_url)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read summary response: {e}");
            Self::transport_error(&e, base_url)
        })?;

        if !status.is_success() {
            warn!("Summary generation returned status {status}");
            return Err(GenerationError::Failed {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: OpenAiResponse = serde_json::from_str(&body).unwrap_or_else(|e| {
            warn!("Summary response was not valid JSON: {e}");
            OpenAiResponse::default()
        });

        debug!(
            "Received summary response: model={:?}, finish_reason={:?}",
            parsed.model,
            parsed.choices.first().and_then(|c| c.finish_reason.as_deref())
        );

        Ok(parsed.into_text().unwrap_or_else(|| {
            warn!("Summary response carried no usable text; substituting fallback");
            FALLBACK_SUMMARY_TEXT.to_owned()
        }))
    }
}
