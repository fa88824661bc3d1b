// ABOUTME: Tests for environment-derived server configuration
// ABOUTME: Runs serially because each case rewrites process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::time::Duration;

use conversation_summarizer::config::environment::keys;
use conversation_summarizer::config::{DatabaseUrl, ServerConfig};
use conversation_summarizer::errors::ErrorCode;
use serial_test::serial;

const ALL_KEYS: &[&str] = &[
    keys::HTTP_PORT,
    keys::DATABASE_URL,
    keys::JWT_SECRET,
    keys::JWT_EXPIRY_HOURS,
    keys::LLM_BASE_URL,
    keys::LLM_TIMEOUT_SECS,
    keys::LLM_API_KEY,
    keys::LLM_MODEL,
    keys::LLM_ROUTE_BASE_URL,
    keys::LLM_ROUTE_MODEL,
    keys::LLM_THINKING_BUDGET,
];

fn reset_env() {
    for key in ALL_KEYS {
        env::remove_var(key);
    }
    env::set_var(keys::JWT_SECRET, "test-secret");
}

#[test]
#[serial]
fn test_defaults_apply_with_only_secret_set() {
    reset_env();
    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http_port, 8081);
    assert_eq!(
        config.database.to_connection_string(),
        "sqlite:./data/summaries.db"
    );
    assert_eq!(config.auth.jwt_expiry_hours, 24);
    assert_eq!(config.generation.client.base_url, "https://api.openai.com/v1");
    assert_eq!(
        config.generation.client.request_timeout,
        Duration::from_secs(120)
    );
    assert!(config.generation.defaults.credential.is_empty());
    assert_eq!(config.generation.defaults.effective_model(), "gpt-4o-mini");
    assert!(config.generation.defaults.routing.is_none());
    assert!(config.generation.defaults.thinking_budget.is_none());
}

#[test]
#[serial]
fn test_missing_secret_is_reported() {
    reset_env();
    env::remove_var(keys::JWT_SECRET);

    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigMissing);
    assert!(err.message.contains("JWT_SECRET"));
}

#[test]
#[serial]
fn test_generation_defaults_are_read() {
    reset_env();
    env::set_var(keys::HTTP_PORT, "9090");
    env::set_var(keys::DATABASE_URL, "sqlite::memory:");
    env::set_var(keys::LLM_TIMEOUT_SECS, "30");
    env::set_var(keys::LLM_API_KEY, "sk-configured");
    env::set_var(keys::LLM_MODEL, "summary-model");
    env::set_var(keys::LLM_ROUTE_BASE_URL, "http://gateway/v1");
    env::set_var(keys::LLM_ROUTE_MODEL, "gateway-model");
    env::set_var(keys::LLM_THINKING_BUDGET, "2048");

    let config = ServerConfig::from_env().unwrap();
    reset_env();

    assert_eq!(config.http_port, 9090);
    assert_eq!(config.database, DatabaseUrl::Memory);
    assert_eq!(config.generation.client.request_timeout, Duration::from_secs(30));
    let defaults = &config.generation.defaults;
    assert_eq!(defaults.credential, "sk-configured");
    assert_eq!(defaults.effective_model(), "summary-model");
    assert_eq!(defaults.routing.as_ref().unwrap().actual_model, "gateway-model");
    assert_eq!(defaults.thinking_budget, Some(2048));
}

#[test]
#[serial]
fn test_half_routing_pair_is_invalid() {
    reset_env();
    env::set_var(keys::LLM_ROUTE_BASE_URL, "http://gateway/v1");

    let err = ServerConfig::from_env().unwrap_err();
    reset_env();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);
}

#[test]
#[serial]
fn test_unparseable_numbers_are_invalid() {
    reset_env();
    env::set_var(keys::HTTP_PORT, "not-a-port");
    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);

    reset_env();
    env::set_var(keys::LLM_THINKING_BUDGET, "-5");
    let err = ServerConfig::from_env().unwrap_err();
    reset_env();
    assert!(err.message.contains(keys::LLM_THINKING_BUDGET));
}

#[test]
#[serial]
fn test_summary_hides_secrets_and_overrides_apply() {
    reset_env();
    env::set_var(keys::LLM_API_KEY, "sk-very-secret");

    let config = ServerConfig::from_env()
        .unwrap()
        .with_overrides(Some(7000), Some(DatabaseUrl::Memory));
    reset_env();

    let summary = config.summary();
    assert!(!summary.contains("sk-very-secret"));
    assert!(!summary.contains("test-secret"));
    assert!(summary.contains("7000"));
    assert!(summary.contains("sqlite::memory:"));
    assert!(summary.contains("Configured"));
}
