// ABOUTME: Shared server resources handed to every route handler
// ABOUTME: Wires database, authentication, generation client, engine, and session guard together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! Everything a handler needs is created once at startup and shared behind an
//! `Arc`. Tests build the same container around in-memory stores and stub
//! generation clients.

use std::sync::Arc;

use summarizer_core::errors::AppResult;

use crate::auth::{AuthManager, Authenticator};
use crate::config::ServerConfig;
use crate::database::Database;
use crate::llm::{GenerationClient, GenerationConfig, OpenAiCompatibleClient};
use crate::summarizer::{SessionGenerationGuard, SummaryEngine};

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Connection pool and stores
    pub database: Database,
    /// Resolves bearer tokens into identities
    pub auth: Arc<dyn Authenticator>,
    /// Summary orchestration
    pub engine: SummaryEngine,
    /// Rejects overlapping generations per session
    pub guard: SessionGenerationGuard,
    /// Generation settings used when a request omits them
    pub generation_defaults: GenerationConfig,
}

impl ServerResources {
    /// Assemble resources around explicit collaborators
    #[must_use]
    pub fn new(
        database: Database,
        auth: Arc<dyn Authenticator>,
        client: Arc<dyn GenerationClient>,
        generation_defaults: GenerationConfig,
    ) -> Self {
        let engine = SummaryEngine::new(
            Arc::new(database.messages()),
            Arc::new(database.summaries()),
            client,
        );
        Self {
            database,
            auth,
            engine,
            guard: SessionGenerationGuard::new(),
            generation_defaults,
        }
    }

    /// Build production resources from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client for the generation backend cannot be built.
    pub fn from_config(config: &ServerConfig, database: Database) -> AppResult<Self> {
        let auth = AuthManager::new(config.auth.jwt_secret.as_bytes(), config.auth.jwt_expiry_hours);
        let client = OpenAiCompatibleClient::new(config.generation.client.clone())?;

        Ok(Self::new(
            database,
            Arc::new(auth),
            Arc::new(client),
            config.generation.defaults.clone(),
        ))
    }
}
