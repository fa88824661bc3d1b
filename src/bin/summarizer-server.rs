// ABOUTME: HTTP server binary for the conversation summarizer
// ABOUTME: Loads configuration, opens the database, and serves summary routes until Ctrl-C
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Conversation Summarizer Server Binary
//!
//! Serves summary generation and listing over `HTTP` with `JWT` authentication.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use conversation_summarizer::{
    config::{environment::ServerConfig, DatabaseUrl},
    database::Database,
    logging,
    resources::ServerResources,
    routes,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "summarizer-server")]
#[command(about = "Hierarchical conversation summarizer - leaf and merge summaries over HTTP")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL (sqlite:<path> or sqlite::memory:)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let database_override = args
        .database_url
        .as_deref()
        .map(DatabaseUrl::parse_url)
        .transpose()?;
    let config = ServerConfig::from_env()?.with_overrides(args.http_port, database_override);

    logging::init_from_env()?;

    info!("Starting conversation summarizer");
    info!("{}", config.summary());

    if let DatabaseUrl::SQLite { path } = &config.database {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
        }
    }

    let database = Database::new(&config.database.to_connection_string()).await?;
    let resources = Arc::new(ServerResources::from_config(&config, database)?);
    let app = routes::router(resources);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        return Err(e.into());
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {e}"),
    }
}
