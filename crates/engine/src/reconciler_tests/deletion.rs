// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tfsync_core::{Reason, FINALIZER};

fn destroy_runs(ctx: &TestContext) -> usize {
    count(&ctx.platform.calls(), |c| {
        matches!(c, PlatformCall::CreateRun { options, .. } if options.is_destroy)
    })
}

fn position(calls: &[PlatformCall], pred: impl Fn(&PlatformCall) -> bool) -> usize {
    calls.iter().position(pred).unwrap()
}

#[tokio::test(start_paused = true)]
async fn cancels_destroys_deletes_and_releases() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());
    let pending = start_first_run(&ctx, &key, vec![RunStatus::Planning]).await;
    let remote = remote_of(&ctx, &key);
    ctx.store.request_deletion(&key);
    ctx.platform.clear_calls();
    ctx.platform
        .script_next_run(vec![RunStatus::Planning, RunStatus::Applying, RunStatus::Applied]);

    assert_eq!(pass(&ctx, &key).await, Requeue::Done);

    let calls = ctx.platform.calls();
    let cancel = position(&calls, |c| {
        matches!(c, PlatformCall::ForceCancelRun { id, .. } if *id == pending)
    });
    let destroy = position(&calls, |c| {
        matches!(c, PlatformCall::CreateRun { options, .. } if options.is_destroy)
    });
    let delete = position(&calls, |c| matches!(c, PlatformCall::DeleteWorkspace { .. }));
    assert!(cancel < destroy && destroy < delete, "{calls:?}");

    assert!(ctx.platform.workspace(&remote.id).is_none());
    assert!(ctx.store.snapshot(&key).is_none());
    assert!(ctx.recorder.reasons().contains(&Reason::DestroyStarted));
}

#[tokio::test]
async fn workspace_that_never_ran_is_deleted_without_destroy() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().no_source().build());
    pass(&ctx, &key).await;
    ctx.store.request_deletion(&key);

    assert_eq!(pass(&ctx, &key).await, Requeue::Done);

    assert_eq!(destroy_runs(&ctx), 0);
    assert!(ctx.platform.workspace_by_name("default-app").is_none());
    assert!(ctx.store.snapshot(&key).is_none());
}

#[tokio::test]
async fn missing_remote_workspace_is_not_created_during_deletion() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().with_finalizer().deleting().build());

    assert_eq!(pass(&ctx, &key).await, Requeue::Done);

    assert!(ctx.platform.mutations().is_empty());
    assert!(ctx.store.snapshot(&key).is_none());
}

#[tokio::test]
async fn deleting_resource_without_finalizer_is_left_alone() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().deleting().build());

    assert_eq!(pass(&ctx, &key).await, Requeue::Done);

    assert!(ctx.platform.calls().is_empty());
}

#[tokio::test]
async fn delete_failure_still_releases_resource() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().no_source().build());
    pass(&ctx, &key).await;
    ctx.store.request_deletion(&key);
    ctx.platform.fail("delete_workspace");

    assert_eq!(pass(&ctx, &key).await, Requeue::Done);

    assert!(ctx.store.snapshot(&key).is_none());
    assert!(ctx.platform.workspace_by_name("default-app").is_some());
    assert!(ctx.recorder.reasons().contains(&Reason::WorkspaceDeleteFailed));
}

#[tokio::test(start_paused = true)]
async fn errored_destroy_keeps_the_finalizer() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());
    converge(&ctx, &key).await;
    ctx.store.request_deletion(&key);
    ctx.platform
        .script_next_run(vec![RunStatus::Planning, RunStatus::Errored]);

    let err = ctx.reconciler.reconcile(&key).await.unwrap_err();

    assert!(matches!(err, ReconcileError::DestroyFailed(_)), "{err}");
    assert!(ctx.get(&key).meta.has_finalizer(FINALIZER));
    assert!(ctx.platform.workspace_by_name("default-app").is_some());
    assert_eq!(ctx.recorder.reasons().last(), Some(&Reason::RunErrored));
}

#[tokio::test(start_paused = true)]
async fn stuck_destroy_times_out_and_resumes_later() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());
    converge(&ctx, &key).await;
    ctx.store.request_deletion(&key);
    ctx.platform.script_next_run(vec![RunStatus::Applying]);

    let err = ctx.reconciler.reconcile(&key).await.unwrap_err();
    let run_id = match err {
        ReconcileError::DestroyTimeout { run_id, .. } => run_id,
        other => panic!("expected destroy timeout, got {other}"),
    };
    assert!(ctx.get(&key).meta.has_finalizer(FINALIZER));

    ctx.platform.set_run_status(&run_id, RunStatus::Applied);
    assert_eq!(pass(&ctx, &key).await, Requeue::Done);

    assert_eq!(destroy_runs(&ctx), 1);
    assert!(ctx.store.snapshot(&key).is_none());
}
