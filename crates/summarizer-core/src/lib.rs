// ABOUTME: Core types and constants for the hierarchical conversation summarizer
// ABOUTME: Foundation crate with error handling, summary node models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Summarizer Core
//!
//! Foundation crate providing shared types for the conversation summarizer.
//! This crate is designed to change infrequently, enabling incremental
//! compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **models**: Messages, message ranges, and summary nodes
//! - **constants**: Model defaults, fallback text, and labels

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (`Message`, `SummaryNode`, `MessageRange`)
pub mod models;
