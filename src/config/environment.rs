// ABOUTME: Environment configuration for the summarizer server
// ABOUTME: Reads ports, database URL, JWT settings, and generation defaults once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management for production deployment

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use summarizer_core::constants::ports::DEFAULT_HTTP_PORT;
use summarizer_core::errors::{AppError, AppResult};
use tracing::{info, warn};

use crate::llm::{GenerationConfig, OpenAiCompatibleConfig};

/// Environment variable names
pub mod keys {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// `SQLite` connection URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Shared HS256 secret
    pub const JWT_SECRET: &str = "JWT_SECRET";
    /// Token lifetime in hours
    pub const JWT_EXPIRY_HOURS: &str = "JWT_EXPIRY_HOURS";
    /// Default generation endpoint
    pub const LLM_BASE_URL: &str = "SUMMARY_LLM_BASE_URL";
    /// Per-call generation timeout in seconds
    pub const LLM_TIMEOUT_SECS: &str = "SUMMARY_LLM_TIMEOUT_SECS";
    /// Default generation credential
    pub const LLM_API_KEY: &str = "SUMMARY_LLM_API_KEY";
    /// Default generation model
    pub const LLM_MODEL: &str = "SUMMARY_LLM_MODEL";
    /// Default routing override endpoint
    pub const LLM_ROUTE_BASE_URL: &str = "SUMMARY_LLM_ROUTE_BASE_URL";
    /// Default routing override model
    pub const LLM_ROUTE_MODEL: &str = "SUMMARY_LLM_ROUTE_MODEL";
    /// Default reasoning token budget
    pub const LLM_THINKING_BUDGET: &str = "SUMMARY_LLM_THINKING_BUDGET";
}

/// Default database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/summaries.db";

/// Default token lifetime
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Type-safe database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite` database (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// # Errors
    ///
    /// Returns a config-invalid error for anything but a `sqlite:` URL.
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let path = s.strip_prefix("sqlite:").ok_or_else(|| {
            AppError::config_invalid(format!("Unsupported database URL (expected sqlite:): {s}"))
        })?;
        let path = path.trim_start_matches("//");
        if path == ":memory:" {
            Ok(Self::Memory)
        } else if path.is_empty() {
            Err(AppError::config_invalid("Database URL has no path"))
        } else {
            Ok(Self::SQLite {
                path: PathBuf::from(path),
            })
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_connection_string())
    }
}

/// JWT settings
#[derive(Clone)]
pub struct AuthConfig {
    /// Shared HS256 secret
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub jwt_expiry_hours: i64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .finish()
    }
}

/// Generation backend settings
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Endpoint and timeout of the HTTP client
    pub client: OpenAiCompatibleConfig,
    /// Values used when a request leaves them out
    pub defaults: GenerationConfig,
}

/// Server configuration loaded once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Database location
    pub database: DatabaseUrl,
    /// JWT settings
    pub auth: AuthConfig,
    /// Generation backend settings
    pub generation: GenerationSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when `JWT_SECRET` is missing, a numeric variable does
    /// not parse, the database URL is unsupported, or only one half of the
    /// default routing pair is set.
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let jwt_secret =
            optional_env(keys::JWT_SECRET).ok_or_else(|| AppError::config_missing(keys::JWT_SECRET))?;

        let routing = GenerationConfig::routing_from_parts(
            optional_env(keys::LLM_ROUTE_BASE_URL),
            optional_env(keys::LLM_ROUTE_MODEL),
        )
        .map_err(|_| {
            AppError::config_invalid(format!(
                "{} and {} must be set together",
                keys::LLM_ROUTE_BASE_URL,
                keys::LLM_ROUTE_MODEL
            ))
        })?;

        let config = Self {
            http_port: parse_env(keys::HTTP_PORT, DEFAULT_HTTP_PORT)?,
            database: DatabaseUrl::parse_url(&env_var_or(keys::DATABASE_URL, DEFAULT_DATABASE_URL))?,
            auth: AuthConfig {
                jwt_secret,
                jwt_expiry_hours: parse_env(keys::JWT_EXPIRY_HOURS, DEFAULT_JWT_EXPIRY_HOURS)?,
            },
            generation: GenerationSettings {
                client: OpenAiCompatibleConfig {
                    base_url: env_var_or(keys::LLM_BASE_URL, crate::llm::DEFAULT_BASE_URL),
                    request_timeout: Duration::from_secs(parse_env(
                        keys::LLM_TIMEOUT_SECS,
                        crate::llm::DEFAULT_REQUEST_TIMEOUT_SECS,
                    )?),
                },
                defaults: GenerationConfig {
                    credential: optional_env(keys::LLM_API_KEY).unwrap_or_default(),
                    model: optional_env(keys::LLM_MODEL),
                    routing,
                    thinking_budget: optional_env(keys::LLM_THINKING_BUDGET)
                        .map(|raw| parse_value(keys::LLM_THINKING_BUDGET, &raw))
                        .transpose()?,
                },
            },
        };

        if config.generation.defaults.credential.is_empty() {
            warn!(
                "{} is not set; requests must supply their own apiKey",
                keys::LLM_API_KEY
            );
        }

        Ok(config)
    }

    /// Apply command-line overrides
    #[must_use]
    pub fn with_overrides(mut self, http_port: Option<u16>, database: Option<DatabaseUrl>) -> Self {
        if let Some(port) = http_port {
            self.http_port = port;
        }
        if let Some(database) = database {
            self.database = database;
        }
        self
    }

    /// Log-safe summary of the configuration
    #[must_use]
    pub fn summary(&self) -> String {
        let defaults = &self.generation.defaults;
        format!(
            "Conversation Summarizer Configuration:\n\
             - HTTP Port: {}\n\
             - Database: {}\n\
             - JWT Expiry: {}h\n\
             - Generation Endpoint: {}\n\
             - Generation Timeout: {}s\n\
             - Default Model: {}\n\
             - Default Credential: {}\n\
             - Routing Override: {}\n\
             - Thinking Budget: {}",
            self.http_port,
            self.database,
            self.auth.jwt_expiry_hours,
            self.generation.client.base_url,
            self.generation.client.request_timeout.as_secs(),
            defaults.effective_model(),
            if defaults.credential.is_empty() { "Not set" } else { "Configured" },
            defaults
                .routing
                .as_ref()
                .map_or_else(|| "Disabled".to_owned(), |r| format!("{} ({})", r.base_url, r.actual_model)),
            defaults
                .thinking_budget
                .map_or_else(|| "Disabled".to_owned(), |b| b.to_string()),
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_owned())
}

/// Non-blank environment variable
fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable, falling back to a default when unset
fn parse_env<T: FromStr>(key: &str, default: T) -> AppResult<T>
where
    T::Err: fmt::Display,
{
    optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> AppResult<T>
where
    T::Err: fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::config_invalid(format!("Invalid {key} value {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_parsing() {
        let file = DatabaseUrl::parse_url("sqlite:./test.db").unwrap();
        assert_eq!(file.to_connection_string(), "sqlite:./test.db");
        assert!(!file.is_memory());

        assert!(DatabaseUrl::parse_url("sqlite::memory:").unwrap().is_memory());
        assert!(DatabaseUrl::parse_url("postgres://localhost/db").is_err());
        assert!(DatabaseUrl::parse_url("sqlite:").is_err());
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u16>("HTTP_PORT", "eighty").unwrap_err();
        assert!(err.message.contains("HTTP_PORT"));
        assert_eq!(parse_value::<u16>("HTTP_PORT", " 8081 ").unwrap(), 8081);
    }
}
