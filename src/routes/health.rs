// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Provides liveness and database readiness endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use summarizer_core::constants::{endpoints, service_names};
use summarizer_core::errors::AppError;

use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        async fn health_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "ok",
                "service": service_names::SUMMARIZER_SERVER,
                "version": env!("CARGO_PKG_VERSION"),
            }))
        }

        async fn ready_handler(
            State(resources): State<Arc<ServerResources>>,
        ) -> Result<Json<serde_json::Value>, AppError> {
            sqlx::query("SELECT 1")
                .execute(resources.database.pool())
                .await
                .map_err(|e| AppError::database(format!("Database not ready: {e}")))?;
            Ok(Json(serde_json::json!({
                "status": "ready",
                "timestamp": chrono::Utc::now().to_rfc3339()
            })))
        }

        Router::new()
            .route(endpoints::HEALTH_CHECK, get(health_handler))
            .route(endpoints::READY_CHECK, get(ready_handler))
            .with_state(resources)
    }
}
