// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::resource::FINALIZER;

#[test]
fn remote_name_combines_namespace_and_name() {
    let meta = ResourceMeta {
        namespace: "team-a".to_string(),
        name: "network".to_string(),
        ..Default::default()
    };
    assert_eq!(meta.remote_workspace_name(), "team-a-network");
    assert_eq!(meta.key().to_string(), "team-a/network");
}

#[test]
fn finalizer_lookup() {
    let mut meta = ResourceMeta::default();
    assert!(!meta.has_finalizer(FINALIZER));
    meta.finalizers.push(FINALIZER.to_string());
    assert!(meta.has_finalizer(FINALIZER));
}

#[yare::parameterized(
    never_run = { None,                              false, false },
    planning  = { Some(RunStatus::Planning),         true,  false },
    applied   = { Some(RunStatus::Applied),          false, true },
    finished  = { Some(RunStatus::PlannedAndFinished), false, true },
    discarded = { Some(RunStatus::Discarded),        false, true },
    errored   = { Some(RunStatus::Errored),          false, false },
)]
fn status_run_predicates(run_status: Option<RunStatus>, pending: bool, succeeded: bool) {
    let status = WorkspaceStatus {
        run_status,
        ..Default::default()
    };
    assert_eq!(status.is_run_pending(), pending);
    assert_eq!(status.last_run_succeeded(), succeeded);
}

#[test]
fn execution_mode_for_agent_pool() {
    assert_eq!(ExecutionMode::for_agent_pool(None), ExecutionMode::Remote);
    assert_eq!(
        ExecutionMode::for_agent_pool(Some("apool-1")),
        ExecutionMode::Agent {
            pool_id: "apool-1".to_string()
        }
    );
}

#[test]
fn spec_deserializes_with_defaults() {
    let spec: WorkspaceSpec = serde_json::from_str(
        r#"{
            "organization": "acme",
            "module": { "source": "app.terraform.io/acme/network/aws", "version": "1.2.0" },
            "secrets_mount_path": "/tmp/secrets",
            "variables": [{ "key": "region", "value": "us-east-1" }]
        }"#,
    )
    .unwrap();
    assert_eq!(spec.organization, "acme");
    assert_eq!(spec.module.unwrap().version.as_deref(), Some("1.2.0"));
    assert!(spec.vcs.is_none());
    assert_eq!(spec.variables.len(), 1);
    assert!(!spec.variables[0].sensitive);
    assert!(spec.notifications.is_empty());
}

#[test]
fn status_round_trips_run_status_as_string() {
    let status = WorkspaceStatus {
        workspace_id: Some(WorkspaceId::new("ws-1")),
        run_id: Some(RunId::new("run-1")),
        run_status: Some(RunStatus::Applying),
        ..Default::default()
    };
    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["run_status"], "applying");
    assert!(json.get("config_version_id").is_none());
}
