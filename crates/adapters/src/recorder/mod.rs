// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event recorder adapters

mod log;
mod noop;

pub use log::LogRecorder;
pub use noop::NoOpRecorder;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeRecorder;

use async_trait::async_trait;
use tfsync_core::{Event, ResourceKey};
use thiserror::Error;

/// Errors from event recording
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record failed: {0}")]
    RecordFailed(String),
}

/// Adapter for attaching user-visible events to a resource
#[async_trait]
pub trait EventRecorder: Clone + Send + Sync + 'static {
    async fn record(&self, key: &ResourceKey, event: &Event) -> Result<(), RecordError>;
}
