// ABOUTME: Route module organization for the summarizer HTTP endpoints
// ABOUTME: Assembles domain routers into one application router with tracing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the conversation summarizer
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the summary engine.

/// Health check and readiness routes
pub mod health;
/// Summary generation and listing routes
pub mod summaries;

pub use health::HealthRoutes;
pub use summaries::{SummaryListResponse, SummaryRoutes};

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::resources::ServerResources;

/// Build the complete application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(SummaryRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
}
