// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_logs::{assert_log, with_tracing};
use serial_test::serial;
use tfsync_core::Reason;

#[test]
#[serial(tracing)]
fn normal_event_logs_at_info() {
    let (logs, result) = with_tracing(|| async {
        let event = Event::normal(Reason::WorkspaceCreated, "created workspace ws-1");
        LogRecorder::new()
            .record(&ResourceKey::new("default", "app"), &event)
            .await
    });

    assert!(result.is_ok());
    assert_log(&logs, "level", "INFO");
    assert_log(&logs, "resource", "default/app");
    assert_log(&logs, "reason", "WorkspaceCreated");
    assert_log(&logs, "message", "created workspace ws-1");
}

#[test]
#[serial(tracing)]
fn warning_event_logs_at_warn() {
    let (logs, _) = with_tracing(|| async {
        let event = Event::warning(Reason::RunErrored, "run run-1 errored");
        LogRecorder::new()
            .record(&ResourceKey::new("default", "app"), &event)
            .await
    });

    assert_log(&logs, "level", "WARN");
    assert_log(&logs, "reason", "RunErrored");
}
