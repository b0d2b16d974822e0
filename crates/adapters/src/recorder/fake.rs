// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake event recorder for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{EventRecorder, RecordError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tfsync_core::{Event, Reason, ResourceKey};

struct FakeRecorderState {
    events: Vec<(ResourceKey, Event)>,
    fail: bool,
}

/// Fake event recorder for testing
#[derive(Clone)]
pub struct FakeRecorder {
    inner: Arc<Mutex<FakeRecorderState>>,
}

impl Default for FakeRecorder {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeRecorderState {
                events: Vec::new(),
                fail: false,
            })),
        }
    }
}

impl FakeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded events
    pub fn events(&self) -> Vec<Event> {
        self.inner
            .lock()
            .events
            .iter()
            .map(|(_, e)| e.clone())
            .collect()
    }

    /// Reasons of recorded events, in order
    pub fn reasons(&self) -> Vec<Reason> {
        self.inner
            .lock()
            .events
            .iter()
            .map(|(_, e)| e.reason)
            .collect()
    }

    /// Make every subsequent record call fail
    pub fn set_failing(&self, fail: bool) {
        self.inner.lock().fail = fail;
    }
}

#[async_trait]
impl EventRecorder for FakeRecorder {
    async fn record(&self, key: &ResourceKey, event: &Event) -> Result<(), RecordError> {
        let mut inner = self.inner.lock();
        if inner.fail {
            return Err(RecordError::RecordFailed("recorder unavailable".to_string()));
        }
        inner.events.push((key.clone(), event.clone()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
