// ABOUTME: Per-session marker that rejects overlapping summary generations
// ABOUTME: Holding a permit blocks the session; dropping it releases the session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use summarizer_core::errors::{AppError, AppResult};

/// Tracks sessions with a generation in flight
#[derive(Clone, Default)]
pub struct SessionGenerationGuard {
    in_flight: Arc<DashMap<String, ()>>,
}

impl SessionGenerationGuard {
    /// Create an empty guard
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `session_id` for one generation
    ///
    /// # Errors
    ///
    /// Returns a resource-locked error when the session is already claimed.
    pub fn acquire(&self, session_id: &str) -> AppResult<SessionPermit> {
        match self.in_flight.entry(session_id.to_owned()) {
            Entry::Occupied(_) => Err(AppError::resource_locked(format!(
                "A summary is already being generated for session {session_id}"
            ))),
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(SessionPermit {
                    in_flight: Arc::clone(&self.in_flight),
                    session_id: session_id.to_owned(),
                })
            }
        }
    }

    /// Whether a generation is running for `session_id`
    #[must_use]
    pub fn is_busy(&self, session_id: &str) -> bool {
        self.in_flight.contains_key(session_id)
    }
}

/// Claim on a session, released on drop
pub struct SessionPermit {
    in_flight: Arc<DashMap<String, ()>>,
    session_id: String,
}

impl Drop for SessionPermit {
    fn drop(&mut self) {
        self.in_flight.remove(&self.session_id);
    }
}
