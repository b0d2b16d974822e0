// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tfsync_core::{ConfigVersionStatus, Reason, FINALIZER};

#[tokio::test]
async fn missing_resource_is_a_no_op() {
    let ctx = setup();
    let result = ctx
        .reconciler
        .reconcile(&ResourceKey::new("default", "ghost"))
        .await
        .unwrap();

    assert_eq!(result, Requeue::Done);
    assert!(ctx.platform.calls().is_empty());
}

#[tokio::test]
async fn first_pass_creates_workspace_and_uploads_configuration() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().variable("region", "eu-west-1").build());

    assert_eq!(pass(&ctx, &key).await, SHORT);

    let ws = ctx.get(&key);
    assert!(ws.meta.has_finalizer(FINALIZER));
    let remote = ctx.platform.workspace_by_name("default-app").unwrap();
    assert_eq!(ws.status.workspace_id, Some(remote.id.clone()));
    assert!(ws.status.config_version_id.is_some());
    assert!(ctx.platform.runs(&remote.id).is_empty());

    let vars = ctx.platform.variables(&remote.id);
    assert_eq!(vars, vec![("region".to_string(), "eu-west-1".to_string(), false)]);

    let main_tf = ctx.work_dir.join("default-app").join("main.tf");
    let written = std::fs::read_to_string(main_tf).unwrap();
    assert!(written.contains("module \"operator\""), "{written}");
}

#[tokio::test]
async fn run_waits_for_configuration_upload() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());

    assert_eq!(pass(&ctx, &key).await, SHORT);
    let cv_id = ctx.get(&key).status.config_version_id.unwrap();
    let remote = remote_of(&ctx, &key);

    // Upload still pending: no run
    assert_eq!(pass(&ctx, &key).await, SHORT);
    assert!(ctx.platform.runs(&remote.id).is_empty());
    assert_eq!(ctx.get(&key).status.config_version_id, Some(cv_id.clone()));

    ctx.platform
        .set_config_version_status(&cv_id, ConfigVersionStatus::Uploaded);
    assert_eq!(pass(&ctx, &key).await, Requeue::Immediately);

    let runs = ctx.platform.runs(&remote.id);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].config_version_id, Some(cv_id.clone()));
    let status = ctx.get(&key).status;
    assert_eq!(status.run_id, Some(runs[0].id.clone()));
    assert_eq!(status.run_status, Some(RunStatus::Pending));
    assert_eq!(status.config_version_id, None);

    let uploaded = ctx.platform.uploaded_config(&cv_id).unwrap();
    assert!(uploaded.contains("name = \"default-app\""), "{uploaded}");
    assert_eq!(ctx.recorder.reasons().last(), Some(&Reason::RunStarted));
}

#[tokio::test]
async fn converged_workspace_makes_no_mutations() {
    let ctx = setup();
    let key = ctx.apply(
        WorkspaceBuilder::new()
            .variable("region", "eu-west-1")
            .env_variable("TF_LOG", "info")
            .ssh_key("sshkey-1")
            .terraform_version("1.6.0")
            .build(),
    );
    converge(&ctx, &key).await;
    ctx.platform.clear_calls();
    let map_writes = ctx.maps.writes();
    let version = ctx.get(&key).meta.resource_version;

    assert_eq!(pass(&ctx, &key).await, STEADY);

    assert!(ctx.platform.mutations().is_empty(), "{:?}", ctx.platform.mutations());
    assert_eq!(ctx.maps.writes(), map_writes);
    assert_eq!(ctx.get(&key).meta.resource_version, version);
}

#[tokio::test]
async fn pending_run_blocks_all_other_mutations() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());
    start_first_run(&ctx, &key, vec![RunStatus::Planning]).await;

    // A spec change while the run is in flight must wait
    ctx.apply(WorkspaceBuilder::new().variable("size", "3").build());
    ctx.platform.clear_calls();

    assert_eq!(pass(&ctx, &key).await, SHORT);

    assert!(ctx.platform.mutations().is_empty(), "{:?}", ctx.platform.mutations());
    assert_eq!(ctx.get(&key).status.run_status, Some(RunStatus::Planning));
}

#[tokio::test]
async fn variable_change_after_convergence_starts_new_run() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());
    let first = converge(&ctx, &key).await;

    ctx.apply(WorkspaceBuilder::new().env_variable("TF_LOG", "debug").build());
    // Fresh configuration version, then the run
    assert_eq!(pass(&ctx, &key).await, SHORT);
    assert_eq!(pass(&ctx, &key).await, Requeue::Immediately);

    let second = ctx.get(&key).status.run_id.unwrap();
    assert_ne!(first, second);
    assert_eq!(ctx.platform.runs(&remote_of(&ctx, &key).id).len(), 2);
}

#[tokio::test]
async fn errored_run_is_reported_once_and_not_retried() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().output("vpc", "vpc_id").build());
    let run_id = start_first_run(&ctx, &key, vec![RunStatus::Planning, RunStatus::Errored]).await;

    assert_eq!(pass(&ctx, &key).await, STEADY);
    assert_eq!(pass(&ctx, &key).await, STEADY);

    let errored: Vec<_> = ctx
        .recorder
        .reasons()
        .into_iter()
        .filter(|r| *r == Reason::RunErrored)
        .collect();
    assert_eq!(errored.len(), 1);
    assert_eq!(ctx.get(&key).status.run_id, Some(run_id));
    assert_eq!(ctx.get(&key).status.outputs_map, None);
    assert_eq!(ctx.platform.runs(&remote_of(&ctx, &key).id).len(), 1);
}

#[tokio::test]
async fn externally_started_run_is_observed() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());
    converge(&ctx, &key).await;
    let remote = remote_of(&ctx, &key);
    let external = ctx.platform.add_run(&remote.id, RunStatus::Planning);

    assert_eq!(pass(&ctx, &key).await, SHORT);

    let status = ctx.get(&key).status;
    assert_eq!(status.run_id, Some(external));
    assert_eq!(status.run_status, Some(RunStatus::Planning));
}

#[tokio::test]
async fn unknown_organization_fails_validation_without_mutation() {
    let ctx = setup();
    let ws = WorkspaceBuilder::new().organization("nowhere").build();
    ctx.secrets.add_mount(&ws.spec.secrets_mount_path);
    let key = ctx.store.apply(ws).key();

    let err = ctx.reconciler.reconcile(&key).await.unwrap_err();

    assert!(matches!(err, ReconcileError::Validation(_)), "{err}");
    assert!(ctx.platform.mutations().is_empty());
    assert!(!ctx.get(&key).meta.has_finalizer(FINALIZER));
    assert_eq!(ctx.recorder.reasons(), vec![Reason::ValidationFailed]);
}

#[tokio::test]
async fn missing_secrets_mount_fails_validation() {
    let ctx = setup();
    let ws = WorkspaceBuilder::new().build();
    ctx.platform.add_organization("acme");
    let key = ctx.store.apply(ws).key();

    let err = ctx.reconciler.reconcile(&key).await.unwrap_err();

    assert!(err.to_string().contains("secrets mount"), "{err}");
    assert!(ctx.platform.mutations().is_empty());
}

#[tokio::test]
async fn module_and_vcs_together_fail_validation() {
    let ctx = setup();
    let mut ws = WorkspaceBuilder::new().vcs("acme/infra").build();
    ws.spec.module = WorkspaceBuilder::new().build().spec.module;
    let key = ctx.apply(ws);

    let err = ctx.reconciler.reconcile(&key).await.unwrap_err();
    assert!(matches!(err, ReconcileError::Validation(_)), "{err}");
}

#[tokio::test]
async fn workspace_without_source_syncs_but_never_runs() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().no_source().variable("a", "1").build());

    assert_eq!(pass(&ctx, &key).await, STEADY);
    assert_eq!(pass(&ctx, &key).await, STEADY);

    let remote = remote_of(&ctx, &key);
    assert!(ctx.platform.runs(&remote.id).is_empty());
    assert_eq!(ctx.platform.variables(&remote.id).len(), 1);
    assert!(ctx.recorder.reasons().contains(&Reason::ValidationFailed));
}

#[tokio::test]
async fn recorder_failure_does_not_fail_pass() {
    let ctx = setup();
    ctx.recorder.set_failing(true);
    let key = ctx.apply(WorkspaceBuilder::new().build());

    assert_eq!(pass(&ctx, &key).await, SHORT);
    assert!(ctx.platform.workspace_by_name("default-app").is_some());
}

#[tokio::test]
async fn platform_failure_aborts_pass() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());
    ctx.platform.fail("list_variables");

    let err = ctx.reconciler.reconcile(&key).await.unwrap_err();
    assert!(matches!(err, ReconcileError::Platform(_)), "{err}");

    ctx.platform.clear_failures();
    assert_eq!(pass(&ctx, &key).await, SHORT);
}
