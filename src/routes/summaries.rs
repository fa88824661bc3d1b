// ABOUTME: Summary route handlers for generating and listing conversation summaries
// ABOUTME: Authenticates callers, fills generation defaults, and guards sessions against overlap
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Summary routes
//!
//! Both handlers require a bearer token. Generation is serialized per
//! session: a second request for a session that is still generating is
//! rejected with `409` rather than queued.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use summarizer_core::constants::endpoints;
use summarizer_core::errors::AppError;
use summarizer_core::models::SummaryNode;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::logging::AppLogger;
use crate::resources::ServerResources;
use crate::summarizer::{GenerateSummaryPayload, SummaryEngine, SummaryRequest};

// ============================================================================
// Response Types
// ============================================================================

/// Response for listing summaries
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryListResponse {
    /// Summaries, newest first
    pub summaries: Vec<SummaryNode>,
    /// Total count
    pub total: usize,
}

// ============================================================================
// Routes
// ============================================================================

/// Summary routes implementation
pub struct SummaryRoutes;

impl SummaryRoutes {
    /// Create all summary routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(endpoints::SUMMARIES, post(Self::generate_summary))
            .route(endpoints::SESSION_SUMMARIES, get(Self::list_summaries))
            .with_state(resources)
    }

    /// Extract and authenticate user from authorization header
    fn authenticate(
        headers: &HeaderMap,
        resources: &ServerResources,
    ) -> Result<AuthenticatedUser, AppError> {
        let header = headers.get("authorization").and_then(|h| h.to_str().ok());
        resources.auth.authenticate(header).inspect_err(|e| {
            AppLogger::log_auth_event("anonymous", "bearer", false, Some(&e.message));
        })
    }

    /// Generate one summary node
    async fn generate_summary(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(payload): Json<GenerateSummaryPayload>,
    ) -> Result<Response, AppError> {
        let started = Instant::now();
        let user = Self::authenticate(&headers, &resources)?;

        // Ownership is checked before the payload is validated.
        SummaryEngine::authorize(payload.user_id.as_deref(), &user)?;
        let request = SummaryRequest::try_from(
            payload.with_generation_defaults(&resources.generation_defaults),
        )?;

        let session_id = request.session_id.clone();
        let _permit = resources.guard.acquire(&session_id)?;

        let result = resources.engine.generate(request, &user).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AppLogger::log_summary_request(
            &user.user_id,
            &session_id,
            result.as_ref().map_or_else(|e| e.code.description(), |_| "created"),
            elapsed_ms,
        );

        let node = result?;
        Ok((StatusCode::CREATED, Json(node)).into_response())
    }

    /// List the caller's summaries for a session
    async fn list_summaries(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(session_id): Path<String>,
    ) -> Result<Response, AppError> {
        let user = Self::authenticate(&headers, &resources)?;
        let summaries = resources.engine.list_for_session(&session_id, &user).await?;

        info!(
            "Listed {} summaries for session {session_id} of user {}",
            summaries.len(),
            user.user_id
        );

        let total = summaries.len();
        Ok((StatusCode::OK, Json(SummaryListResponse { summaries, total })).into_response())
    }
}
