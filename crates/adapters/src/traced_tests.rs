// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::platform::{FakePlatform, PlatformCall};
use crate::test_logs::{assert_log, with_tracing};
use serial_test::serial;
use tfsync_core::{RunStatus, VariableCategory};

fn options(name: &str) -> WorkspaceOptions {
    WorkspaceOptions {
        name: name.to_string(),
        terraform_version: "1.6.0".to_string(),
        auto_apply: true,
        vcs_repo: None,
    }
}

// =============================================================================
// Tracing output verification tests
// =============================================================================

#[test]
#[serial(tracing)]
fn create_workspace_logs_span_and_timing() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedPlatform::new(FakePlatform::new());
        traced.create_workspace("acme", &options("default-app")).await
    });

    assert!(result.is_ok(), "create should succeed: {:?}", result);
    assert_log(&logs, "span name", "platform.create_workspace");
    assert_log(&logs, "workspace name", "default-app");
    assert_log(&logs, "completion", "completed");
    assert_log(&logs, "timing", "elapsed_ms");
}

#[test]
#[serial(tracing)]
fn failed_call_logs_error() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakePlatform::new();
        let ws = fake.add_workspace("acme", "default-app");
        fake.fail("delete_workspace");
        TracedPlatform::new(fake).delete_workspace(&ws).await
    });

    assert!(result.is_err());
    assert_log(&logs, "failure", "failed");
    assert_log(&logs, "error detail", "injected failure in delete_workspace");
}

#[test]
#[serial(tracing)]
fn not_found_is_not_logged_as_error() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedPlatform::new(FakePlatform::new());
        traced.read_workspace("acme", "missing").await
    });

    assert!(result.unwrap_err().is_not_found());
    assert_log(&logs, "not found", "not found");
    assert!(!logs.contains("ERROR"), "not-found should not log an error:\n{logs}");
}

#[test]
#[serial(tracing)]
fn sensitive_variable_value_is_never_logged() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakePlatform::new();
        let ws = fake.add_workspace("acme", "default-app");
        let traced = TracedPlatform::new(fake);
        let request = VariableRequest {
            key: "db_password".to_string(),
            value: "correct-horse-battery".to_string(),
            sensitive: true,
            hcl: false,
            category: VariableCategory::Terraform,
        };
        let created = traced.create_variable(&ws, &request).await?;
        traced.update_variable(&ws, &created.id, &request).await
    });

    assert!(result.is_ok());
    assert_log(&logs, "variable key", "db_password");
    assert!(
        !logs.contains("correct-horse-battery"),
        "sensitive value leaked into logs:\n{logs}"
    );
}

// =============================================================================
// Delegation tests - verify traced wrapper delegates to inner adapter
// =============================================================================

#[tokio::test]
async fn traced_platform_delegates_calls() {
    let fake = FakePlatform::new();
    let traced = TracedPlatform::new(fake.clone());

    let ws = traced.create_workspace("acme", &options("default-app")).await.unwrap();
    let run = traced.create_run(&ws.id, &RunOptions::default()).await.unwrap();
    let read = traced.read_run(&run.id).await.unwrap();
    traced.force_cancel_run(&run.id, "cleanup").await.unwrap();

    assert_eq!(read.status, RunStatus::Pending);
    let calls = fake.calls();
    assert_eq!(calls.len(), 4);
    assert!(matches!(calls[3], PlatformCall::ForceCancelRun { ref comment, .. } if comment == "cleanup"));
    assert_eq!(fake.runs(&ws.id)[0].status, RunStatus::ForceCanceled);
}
