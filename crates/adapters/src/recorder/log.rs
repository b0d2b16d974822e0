// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event recorder that writes events to the tracing log.

use super::{EventRecorder, RecordError};
use async_trait::async_trait;
use tfsync_core::{Event, EventKind, ResourceKey};

/// Records events as structured log lines under the `tfsync::event` target.
///
/// Used when the reconciler runs outside a store with native event support.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogRecorder;

impl LogRecorder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventRecorder for LogRecorder {
    async fn record(&self, key: &ResourceKey, event: &Event) -> Result<(), RecordError> {
        match event.kind {
            EventKind::Normal => tracing::info!(
                target: "tfsync::event",
                resource = %key,
                reason = %event.reason,
                "{}",
                event.message
            ),
            EventKind::Warning => tracing::warn!(
                target: "tfsync::event",
                resource = %key,
                reason = %event.reason,
                "{}",
                event.message
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
