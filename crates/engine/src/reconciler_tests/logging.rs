// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use std::path::Path;
use tfsync_adapters::test_logs::{assert_log, with_tracing};

#[test]
#[serial(tracing)]
fn pass_is_logged_under_resource_span() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());

    let (logs, result) = with_tracing(|| async { ctx.reconciler.reconcile(&key).await });

    assert!(result.is_ok());
    assert_log(&logs, "reconcile span", "reconcile{key=default/app}");
    assert_log(&logs, "finalizer", "finalizer added");
    assert_log(&logs, "upload", "uploaded configuration");
}

#[test]
#[serial(tracing)]
fn secret_values_never_reach_logs() {
    let ctx = setup();
    ctx.secrets
        .set(Path::new("/tmp/secrets"), "token", "hunter2-plaintext");
    let key = ctx.apply(WorkspaceBuilder::new().secret_variable("token").build());

    let (logs, result) = with_tracing(|| async { ctx.reconciler.reconcile(&key).await });

    assert!(result.is_ok());
    assert_log(&logs, "variable key", "key=token");
    assert!(!logs.contains("hunter2-plaintext"), "secret leaked:\n{logs}");
}

#[test]
#[serial(tracing)]
fn validation_failure_is_logged() {
    let ctx = setup();
    let key = ctx
        .store
        .apply(WorkspaceBuilder::new().organization("nowhere").build())
        .key();

    let (logs, result) = with_tracing(|| async { ctx.reconciler.reconcile(&key).await });

    assert!(result.is_err());
    assert_log(&logs, "validation", "validation failed");
    assert_log(&logs, "failed pass", "pass failed");
}
