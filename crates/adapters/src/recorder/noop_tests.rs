// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tfsync_core::Reason;

#[tokio::test]
async fn noop_record_returns_ok() {
    let recorder = NoOpRecorder::new();
    let event = Event::normal(Reason::RunStarted, "run-1");
    let result = recorder.record(&ResourceKey::new("default", "app"), &event).await;
    assert!(result.is_ok());
}
