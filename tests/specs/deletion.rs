//! Deletion sequencing.

use crate::prelude::*;
use tfsync_engine::Requeue;

#[tokio::test(start_paused = true)]
async fn applying_workspace_is_cancelled_destroyed_and_deleted() {
    let h = Harness::new();
    let key = h.declare(h.workspace().build());
    h.converge(&key).await;
    let remote = h.remote(&key);
    let applying = h.platform.add_run(&remote.id, RunStatus::Applying);
    h.store.request_deletion(&key);
    h.platform.clear_calls();
    h.platform
        .script_next_run(vec![RunStatus::Planning, RunStatus::Applying, RunStatus::Applied]);

    assert_eq!(h.reconcile(&key).await, Requeue::Done);

    let calls = h.platform.calls();
    let cancel = calls
        .iter()
        .position(|c| matches!(c, PlatformCall::ForceCancelRun { id, .. } if *id == applying))
        .unwrap();
    let destroy = calls
        .iter()
        .position(|c| matches!(c, PlatformCall::CreateRun { options, .. } if options.is_destroy))
        .unwrap();
    let delete = calls
        .iter()
        .position(|c| matches!(c, PlatformCall::DeleteWorkspace { .. }))
        .unwrap();
    assert!(cancel < destroy, "{calls:?}");
    assert!(destroy < delete, "{calls:?}");
    assert!(h.platform.workspace(&remote.id).is_none());
    assert!(h.store.snapshot(&key).is_none());
}

#[tokio::test]
async fn failed_workspace_delete_never_blocks_release() {
    let h = Harness::new();
    let key = h.declare(h.workspace().no_source().build());
    h.reconcile(&key).await;
    assert!(h.resource(&key).meta.has_finalizer(FINALIZER));
    h.store.request_deletion(&key);
    h.platform.fail("delete_workspace");

    assert_eq!(h.reconcile(&key).await, Requeue::Done);

    assert!(h.store.snapshot(&key).is_none());
    assert!(h.recorder.reasons().contains(&Reason::WorkspaceDeleteFailed));
}
