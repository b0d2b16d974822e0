//! Run lifecycle: configuration delivery and single-flight.

use crate::prelude::*;
use similar_asserts::assert_eq;
use tfsync_engine::Requeue;

#[tokio::test]
async fn module_run_waits_for_uploaded_configuration() {
    let h = Harness::new();
    let key = h.declare(h.workspace().variable("region", "eu-west-1").build());

    assert_eq!(h.reconcile(&key).await, Requeue::After(SHORT));
    let status = h.resource(&key).status;
    assert_eq!(status.run_id, None);
    let cv = status.config_version_id.unwrap();
    let remote = h.remote(&key);

    // Upload still pending: not ready, no run
    assert_eq!(h.reconcile(&key).await, Requeue::After(SHORT));
    assert!(h.platform.runs(&remote.id).is_empty());

    h.platform
        .set_config_version_status(&cv, ConfigVersionStatus::Uploaded);
    assert_eq!(h.reconcile(&key).await, Requeue::Immediately);

    let runs = h.platform.runs(&remote.id);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].config_version_id, Some(cv));
    assert_eq!(h.resource(&key).status.run_id, Some(runs[0].id.clone()));
}

#[tokio::test]
async fn no_run_is_created_while_one_is_pending() {
    let h = Harness::new();
    let key = h.declare(h.workspace().build());
    h.platform.set_auto_upload(true);
    h.reconcile(&key).await;
    h.platform.script_next_run(vec![RunStatus::Planning]);
    assert_eq!(h.reconcile(&key).await, Requeue::Immediately);

    for value in ["1", "2", "3"] {
        h.declare(h.workspace().variable("size", value).build());
        assert_eq!(h.reconcile(&key).await, Requeue::After(SHORT));
    }

    assert_eq!(h.platform.runs(&h.remote(&key).id).len(), 1);
}

#[tokio::test]
async fn errored_run_is_recorded() {
    let h = Harness::new();
    let key = h.declare(h.workspace().build());
    h.platform.set_auto_upload(true);
    h.reconcile(&key).await;
    h.platform
        .script_next_run(vec![RunStatus::Planning, RunStatus::Errored]);
    h.reconcile(&key).await;

    assert_eq!(h.reconcile(&key).await, Requeue::After(STEADY));

    assert_eq!(h.resource(&key).status.run_status, Some(RunStatus::Errored));
    assert!(h.recorder.reasons().contains(&Reason::RunErrored));
}
