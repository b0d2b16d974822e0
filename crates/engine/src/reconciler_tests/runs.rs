// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tfsync_core::{ConfigVersionStatus, MapRef};

fn created_versions(ctx: &TestContext) -> usize {
    count(&ctx.platform.calls(), |c| {
        matches!(c, PlatformCall::CreateConfigurationVersion { .. })
    })
}

#[tokio::test]
async fn vcs_run_uses_platform_configuration() {
    let ctx = setup();
    let id = ctx.platform.add_workspace("acme", "default-app");
    ctx.platform
        .add_configuration_version(&id, ConfigVersionStatus::Uploaded);
    let key = ctx.apply(WorkspaceBuilder::new().vcs("acme/infra").build());

    assert_eq!(pass(&ctx, &key).await, Requeue::Immediately);

    let runs = ctx.platform.runs(&id);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].config_version_id, None);
    assert!(!runs[0].is_destroy);
    assert_eq!(created_versions(&ctx), 0);
}

#[tokio::test(start_paused = true)]
async fn vcs_run_gives_up_without_configuration_version() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().vcs("acme/infra").build());

    let err = ctx.reconciler.reconcile(&key).await.unwrap_err();

    assert!(matches!(err, ReconcileError::ConfigVersionMissing(_)), "{err}");
    let listed = count(&ctx.platform.calls(), |c| {
        matches!(c, PlatformCall::ListConfigurationVersions { .. })
    });
    assert_eq!(listed, 3);
    assert!(ctx.platform.runs(&remote_of(&ctx, &key).id).is_empty());
}

#[tokio::test]
async fn errored_upload_is_replaced() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());
    pass(&ctx, &key).await;
    let first = ctx.get(&key).status.config_version_id.unwrap();
    ctx.platform
        .set_config_version_status(&first, ConfigVersionStatus::Errored);

    assert_eq!(pass(&ctx, &key).await, SHORT);

    let second = ctx.get(&key).status.config_version_id.unwrap();
    assert_ne!(first, second);
    assert_eq!(created_versions(&ctx), 2);
    assert!(ctx.platform.runs(&remote_of(&ctx, &key).id).is_empty());
}

#[tokio::test]
async fn configuration_change_discards_in_flight_upload() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());
    pass(&ctx, &key).await;
    let stale = ctx.get(&key).status.config_version_id.unwrap();

    ctx.apply(WorkspaceBuilder::new().variable("size", "3").build());
    assert_eq!(pass(&ctx, &key).await, SHORT);

    let fresh = ctx.get(&key).status.config_version_id.unwrap();
    assert_ne!(stale, fresh);
    let uploaded = ctx.platform.uploaded_config(&fresh).unwrap();
    assert!(uploaded.contains("variable \"size\""), "{uploaded}");

    // Still processing: no further upload
    assert_eq!(pass(&ctx, &key).await, SHORT);
    assert_eq!(created_versions(&ctx), 2);
}

#[tokio::test]
async fn rendered_configuration_is_remembered_only_after_upload() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());
    let config_map = MapRef::new("default", "app");
    ctx.platform.fail("create_configuration_version");

    assert!(ctx.reconciler.reconcile(&key).await.is_err());
    assert_eq!(ctx.maps.snapshot(&config_map), None);

    ctx.platform.clear_failures();
    assert_eq!(pass(&ctx, &key).await, SHORT);
    let stored = ctx.maps.snapshot(&config_map).unwrap();
    assert!(stored["terraform"].contains("module \"operator\""));
}

#[tokio::test]
async fn vanished_pending_run_does_not_block_new_runs() {
    let ctx = setup();
    ctx.platform.set_auto_upload(true);
    let key = ctx.apply(WorkspaceBuilder::new().build());
    let mut ws = ctx.get(&key);
    ws.status.run_id = Some(RunId::new("run-gone"));
    ws.status.run_status = Some(RunStatus::Planning);
    ctx.store.update_status(&ws).await.unwrap();

    assert_eq!(pass(&ctx, &key).await, SHORT);

    let status = ctx.get(&key).status;
    assert_eq!(status.run_id, None);
    assert_eq!(status.run_status, None);
    let uploaded = ctx
        .platform
        .uploaded_config(&status.config_version_id.unwrap())
        .unwrap();
    let stored = ctx.maps.snapshot(&MapRef::new("default", "app")).unwrap();
    assert_eq!(stored["terraform"], uploaded);

    assert_eq!(pass(&ctx, &key).await, Requeue::Immediately);

    let runs = ctx.platform.runs(&remote_of(&ctx, &key).id);
    assert_eq!(runs.len(), 1);
    assert_eq!(ctx.get(&key).status.run_id, Some(runs[0].id.clone()));
}

#[tokio::test]
async fn single_flight_guard_refuses_second_run() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().vcs("acme/infra").build());
    let id = ctx.platform.add_workspace("acme", "default-app");
    ctx.platform
        .add_configuration_version(&id, ConfigVersionStatus::Uploaded);
    pass(&ctx, &key).await;
    let mut ws = ctx.get(&key);
    let remote = remote_of(&ctx, &key);

    let start = ctx
        .reconciler
        .start_run(&mut ws, &remote, &ConfigSource::Vcs, false)
        .await
        .unwrap();

    assert_eq!(start, RunStart::NotReady);
    assert_eq!(ctx.platform.runs(&id).len(), 1);
}

#[tokio::test]
async fn single_flight_guard_leaves_configuration_drift_pending() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());
    let run_id = start_first_run(&ctx, &key, vec![RunStatus::Planning]).await;
    let config_map = MapRef::new("default", "app");
    let stored = ctx.maps.snapshot(&config_map);

    ctx.apply(WorkspaceBuilder::new().variable("size", "3").build());
    let mut ws = ctx.get(&key);
    let remote = remote_of(&ctx, &key);
    let source = ConfigSource::for_workspace(&ws).unwrap().unwrap();

    let start = ctx
        .reconciler
        .start_run(&mut ws, &remote, &source, true)
        .await
        .unwrap();

    assert_eq!(start, RunStart::NotReady);
    assert!(!start.delivered_config());
    assert_eq!(created_versions(&ctx), 1);

    // A full pass waits on the run and keeps the old text as delivered
    assert_eq!(pass(&ctx, &key).await, SHORT);
    assert_eq!(ctx.maps.snapshot(&config_map), stored);
    assert_eq!(ctx.get(&key).status.run_id, Some(run_id));
}
