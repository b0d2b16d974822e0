// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tfsync_core::{ExecutionMode, Reason, WorkspaceUpdate};

#[tokio::test]
async fn creates_workspace_with_defaults() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());

    pass(&ctx, &key).await;

    let remote = ctx.platform.workspace_by_name("default-app").unwrap();
    assert_eq!(remote.organization, "acme");
    assert_eq!(remote.terraform_version, "latest");
    assert!(remote.auto_apply);
    assert_eq!(remote.execution_mode, ExecutionMode::Remote);
    assert!(ctx.recorder.reasons().contains(&Reason::WorkspaceCreated));
}

#[tokio::test]
async fn creates_vcs_workspace_with_repository() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().vcs("acme/infra").build());
    ctx.platform.fail("list_configuration_versions");

    // The pass fails later, after the workspace exists
    let _ = ctx.reconciler.reconcile(&key).await;

    let remote = ctx.platform.workspace_by_name("default-app").unwrap();
    assert_eq!(remote.vcs_repo.unwrap().repo_identifier, "acme/infra");
}

#[tokio::test]
async fn adopts_existing_workspace() {
    let ctx = setup();
    let existing = ctx.platform.add_workspace("acme", "default-app");
    let key = ctx.apply(WorkspaceBuilder::new().build());

    pass(&ctx, &key).await;

    assert_eq!(ctx.get(&key).status.workspace_id, Some(existing));
    assert_eq!(
        count(&ctx.platform.calls(), |c| matches!(
            c,
            PlatformCall::CreateWorkspace { .. }
        )),
        0
    );
    // Unset version is left alone on an adopted workspace
    assert_eq!(
        ctx.platform.workspace_by_name("default-app").unwrap().terraform_version,
        "1.5.7"
    );
}

#[tokio::test]
async fn recorded_workspace_id_is_never_overwritten() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().no_source().build());
    pass(&ctx, &key).await;
    let first = ctx.get(&key).status.workspace_id.unwrap();

    // Someone deletes the remote workspace out of band
    ctx.platform.delete_workspace(&first).await.unwrap();
    pass(&ctx, &key).await;

    let recreated = ctx.platform.workspace_by_name("default-app").unwrap();
    assert_ne!(recreated.id, first);
    assert_eq!(ctx.get(&key).status.workspace_id, Some(first));
}

#[tokio::test]
async fn converges_explicit_terraform_version() {
    let ctx = setup();
    let id = ctx.platform.add_workspace("acme", "default-app");
    let key = ctx.apply(
        WorkspaceBuilder::new()
            .no_source()
            .terraform_version("1.6.0")
            .build(),
    );

    pass(&ctx, &key).await;

    assert_eq!(ctx.platform.workspace(&id).unwrap().terraform_version, "1.6.0");
    assert!(ctx.platform.calls().contains(&PlatformCall::UpdateWorkspace {
        id,
        update: WorkspaceUpdate {
            terraform_version: Some("1.6.0".to_string()),
            execution_mode: None,
        },
    }));
}

#[tokio::test]
async fn assigns_and_unassigns_ssh_key() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().no_source().ssh_key("sshkey-1").build());
    pass(&ctx, &key).await;
    assert_eq!(
        remote_of(&ctx, &key).ssh_key_id.as_deref(),
        Some("sshkey-1")
    );

    ctx.apply(WorkspaceBuilder::new().no_source().build());
    pass(&ctx, &key).await;

    assert_eq!(remote_of(&ctx, &key).ssh_key_id, None);
    assert_eq!(
        count(&ctx.platform.calls(), |c| matches!(
            c,
            PlatformCall::UnassignSshKey { .. }
        )),
        1
    );
}

#[tokio::test]
async fn agent_pool_switches_execution_mode() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().no_source().agent_pool("apool-1").build());
    pass(&ctx, &key).await;
    assert_eq!(
        remote_of(&ctx, &key).execution_mode,
        ExecutionMode::Agent {
            pool_id: "apool-1".to_string()
        }
    );

    ctx.apply(WorkspaceBuilder::new().no_source().build());
    pass(&ctx, &key).await;
    assert_eq!(remote_of(&ctx, &key).execution_mode, ExecutionMode::Remote);
}

#[tokio::test]
async fn failed_setting_does_not_block_the_others() {
    let ctx = setup();
    let key = ctx.apply(
        WorkspaceBuilder::new()
            .no_source()
            .ssh_key("sshkey-1")
            .agent_pool("apool-1")
            .build(),
    );
    ctx.platform.fail("assign_ssh_key");

    let err = ctx.reconciler.reconcile(&key).await.unwrap_err();

    assert!(err.to_string().contains("assign_ssh_key"), "{err}");
    let remote = remote_of(&ctx, &key);
    assert_eq!(remote.ssh_key_id, None);
    assert_eq!(
        remote.execution_mode,
        ExecutionMode::Agent {
            pool_id: "apool-1".to_string()
        }
    );
}
