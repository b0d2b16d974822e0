// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op event recorder.

use super::{EventRecorder, RecordError};
use async_trait::async_trait;
use tfsync_core::{Event, ResourceKey};

/// Event recorder that silently discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpRecorder;

impl NoOpRecorder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventRecorder for NoOpRecorder {
    async fn record(&self, _key: &ResourceKey, _event: &Event) -> Result<(), RecordError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
