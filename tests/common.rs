// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, message seeding, and stub generation clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::wildcard_in_or_patterns,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `conversation_summarizer`

use std::sync::{Arc, Mutex, Once};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use conversation_summarizer::auth::{AuthManager, AuthenticatedUser};
use conversation_summarizer::database::{Database, SummaryStore};
use conversation_summarizer::errors::{AppError, AppResult};
use conversation_summarizer::llm::{
    GenerationClient, GenerationConfig, GenerationError, PromptSpec,
};
use conversation_summarizer::models::{Message, MessageRole, NewSummaryNode, SummaryNode};
use conversation_summarizer::resources::ServerResources;
use conversation_summarizer::summarizer::SummaryEngine;
use tokio::sync::Notify;

static INIT_LOGGER: Once = Once::new();

/// Secret shared by test tokens
pub const TEST_JWT_SECRET: &[u8] = b"summarizer-test-secret";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// Fixed base time so seeded messages have predictable order
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

/// Seed messages with the given ids, alternating user and assistant turns
pub async fn seed_messages(database: &Database, session_id: &str, ids: &[i64]) -> Vec<Message> {
    let manager = database.messages();
    let mut seeded = Vec::with_capacity(ids.len());
    for (offset, id) in ids.iter().enumerate() {
        let role = if offset % 2 == 0 {
            MessageRole::User
        } else {
            MessageRole::Assistant
        };
        let message = Message {
            id: *id,
            session_id: session_id.to_owned(),
            role,
            content: format!("message {id}"),
            created_at: base_time() + Duration::seconds(*id),
        };
        manager.import(&message).await.unwrap();
        seeded.push(message);
    }
    seeded
}

/// Insert a leaf summary directly through the store
pub async fn insert_leaf(
    database: &Database,
    session_id: &str,
    user_id: &str,
    content: &str,
) -> SummaryNode {
    let range = conversation_summarizer::models::MessageRange::new(1, 2).unwrap();
    database
        .summaries()
        .insert(NewSummaryNode::leaf(session_id, user_id, content, range, 2))
        .await
        .unwrap()
}

/// Generation config with a usable credential
pub fn test_generation() -> GenerationConfig {
    GenerationConfig::new("sk-test")
}

/// Authenticated identity for a user id
pub fn identity(user_id: &str) -> AuthenticatedUser {
    AuthenticatedUser::new(user_id)
}

/// Auth manager signing with [`TEST_JWT_SECRET`]
pub fn test_auth() -> AuthManager {
    AuthManager::new(TEST_JWT_SECRET, 1)
}

/// Engine over a database and a generation client
pub fn engine_for(database: &Database, client: Arc<dyn GenerationClient>) -> SummaryEngine {
    SummaryEngine::new(
        Arc::new(database.messages()),
        Arc::new(database.summaries()),
        client,
    )
}

/// Server resources over a database, a generation client, and generation defaults
pub fn resources_for(
    database: Database,
    client: Arc<dyn GenerationClient>,
    defaults: GenerationConfig,
) -> Arc<ServerResources> {
    Arc::new(ServerResources::new(
        database,
        Arc::new(test_auth()),
        client,
        defaults,
    ))
}

// ============================================================================
// Generation client stubs
// ============================================================================

/// Generation client that replies with a fixed outcome and records each call
pub struct StubGenerationClient {
    outcome: Result<String, GenerationError>,
    calls: Mutex<Vec<(PromptSpec, GenerationConfig)>>,
}

impl StubGenerationClient {
    /// Reply with `text` on every call
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(text.to_owned()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Fail every call with `error`
    pub fn failing(error: GenerationError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(error),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<PromptSpec> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(prompt, _)| prompt.clone())
            .collect()
    }

    /// Configurations received so far
    pub fn configs(&self) -> Vec<GenerationConfig> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, config)| config.clone())
            .collect()
    }

    /// Number of calls received
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationClient for StubGenerationClient {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate(
        &self,
        prompt: &PromptSpec,
        config: &GenerationConfig,
    ) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.clone(), config.clone()));
        self.outcome.clone()
    }
}

/// Generation client that blocks until released, for overlap tests
#[derive(Default)]
pub struct GatedGenerationClient {
    /// Signalled when a call has started
    pub entered: Notify,
    /// Signal to let the pending call finish
    pub release: Notify,
}

#[async_trait]
impl GenerationClient for GatedGenerationClient {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn generate(
        &self,
        _prompt: &PromptSpec,
        _config: &GenerationConfig,
    ) -> Result<String, GenerationError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok("gated summary".to_owned())
    }
}

// ============================================================================
// Store stubs
// ============================================================================

/// Summary store whose writes always fail
pub struct FailingSummaryStore;

#[async_trait]
impl SummaryStore for FailingSummaryStore {
    async fn insert(&self, _node: NewSummaryNode) -> AppResult<SummaryNode> {
        Err(AppError::database("disk I/O error"))
    }

    async fn list_by_session_and_user(
        &self,
        _session_id: &str,
        _user_id: &str,
    ) -> AppResult<Vec<SummaryNode>> {
        Ok(Vec::new())
    }

    async fn find_by_ids(
        &self,
        _session_id: &str,
        _user_id: &str,
        _ids: &[i64],
    ) -> AppResult<Vec<SummaryNode>> {
        Ok(Vec::new())
    }

    async fn set_active(
        &self,
        _summary_id: i64,
        _user_id: &str,
        _is_active: bool,
    ) -> AppResult<bool> {
        Ok(false)
    }
}
