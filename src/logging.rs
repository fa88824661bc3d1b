// ABOUTME: Logging configuration and structured logging setup for the summarizer server
// ABOUTME: Configures log levels, formatters, and noise reduction for dependency crates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Tracing subscriber setup driven by `RUST_LOG` and `LOG_*` variables

use std::env;
use std::io;
use summarizer_core::constants::service_names;
use summarizer_core::errors::{AppError, AppResult};
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Directives applied on top of any `RUST_LOG` value
const NOISE_REDUCTION: &[&str] = &[
    "hyper=warn",
    "hyper::proto=warn",
    "reqwest=warn",
    "sqlx=info",
    "sqlx::query=warn",
    "tower_http=info",
];

/// Subscriber settings
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)] // Independent output toggles
pub struct LoggingConfig {
    /// Base filter directive, usually taken from `RUST_LOG`
    pub level: String,
    /// Output encoding
    pub format: LogFormat,
    /// Emit file and line of each event
    pub include_location: bool,
    /// Emit thread ids and names
    pub include_thread: bool,
    /// Emit span open/close events
    pub include_spans: bool,
    /// Reported in the startup event
    pub service_name: String,
    /// Reported in the startup event
    pub service_version: String,
}

/// Log output encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Multi-field human readable lines
    Pretty,
    /// Single-line output without targets
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value; anything unknown is pretty
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: service_names::SUMMARIZER_SERVER.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

impl LoggingConfig {
    /// Read `RUST_LOG`, `LOG_FORMAT`, and the `LOG_INCLUDE_*` switches
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            level: env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
            format: env::var("LOG_FORMAT")
                .map_or(LogFormat::Pretty, |v| LogFormat::from_str_or_default(&v)),
            include_location: env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: env::var("LOG_INCLUDE_SPANS").is_ok(),
            ..Self::default()
        }
    }

    /// Build the filter: the configured level plus noise reduction for dependencies
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::new(&self.level);
        for directive in NOISE_REDUCTION {
            match directive.parse() {
                Ok(parsed) => filter = filter.add_directive(parsed),
                Err(e) => warn!("Ignoring log directive {directive}: {e}"),
            }
        }
        filter
    }

    /// Install the global subscriber for the configured format
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> AppResult<()> {
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let detailed = || {
            fmt::layer()
                .with_writer(io::stdout)
                .with_file(self.include_location)
                .with_line_number(self.include_location)
                .with_thread_ids(self.include_thread)
                .with_thread_names(self.include_thread)
                .with_span_events(span_events.clone())
        };

        let output: Box<dyn Layer<Registry> + Send + Sync> = match self.format {
            LogFormat::Json => detailed().json().boxed(),
            LogFormat::Pretty => detailed().boxed(),
            LogFormat::Compact => fmt::layer()
                .with_writer(io::stdout)
                .compact()
                .with_target(false)
                .boxed(),
        };

        tracing_subscriber::registry()
            .with(output)
            .with(self.env_filter())
            .try_init()
            .map_err(|e| AppError::internal(format!("Failed to initialize logging: {e}")))?;

        self.announce();
        Ok(())
    }

    fn announce(&self) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            log.level = %self.level,
            log.format = ?self.format,
            log.location = self.include_location,
            log.thread = self.include_thread,
            log.spans = self.include_spans,
            "Logging initialized"
        );
    }
}

/// Install a subscriber configured from the environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> AppResult<()> {
    LoggingConfig::from_env().init()
}

/// Structured events shared by route handlers
pub struct AppLogger;

impl AppLogger {
    /// Record the outcome of resolving a bearer token
    pub fn log_auth_event(user_id: &str, event: &str, success: bool, details: Option<&str>) {
        info!(
            user.id = %user_id,
            auth.event = %event,
            auth.success = %success,
            auth.details = details.unwrap_or(""),
            "Authentication event"
        );
    }

    /// Log a completed summary generation request
    pub fn log_summary_request(
        user_id: &str,
        session_id: &str,
        outcome: &str,
        duration_ms: u64,
    ) {
        info!(
            user.id = %user_id,
            summary.session = %session_id,
            summary.outcome = %outcome,
            summary.duration_ms = %duration_ms,
            "Summary request"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str_or_default("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_or_default("COMPACT"), LogFormat::Compact);
        assert_eq!(LogFormat::from_str_or_default("other"), LogFormat::Pretty);
    }

    #[test]
    fn test_noise_reduction_does_not_raise_verbosity() {
        let filter = LoggingConfig::default().env_filter();
        assert_eq!(
            filter.max_level_hint(),
            Some(tracing::level_filters::LevelFilter::INFO)
        );
    }
}
