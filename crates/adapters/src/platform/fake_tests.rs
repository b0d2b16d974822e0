// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tfsync_core::VariableCategory;

fn options(name: &str) -> WorkspaceOptions {
    WorkspaceOptions {
        name: name.to_string(),
        terraform_version: "latest".to_string(),
        auto_apply: true,
        vcs_repo: None,
    }
}

#[tokio::test]
async fn unknown_organization_is_not_found() {
    let platform = FakePlatform::new();
    let err = platform.read_organization("nope").await.unwrap_err();
    assert!(err.is_not_found());

    platform.add_organization("acme");
    assert_eq!(platform.read_organization("acme").await.unwrap().name, "acme");
}

#[tokio::test]
async fn created_workspace_is_readable_by_name() {
    let platform = FakePlatform::new();
    assert!(platform.read_workspace("acme", "ns-app").await.unwrap_err().is_not_found());

    let created = platform.create_workspace("acme", &options("ns-app")).await.unwrap();
    let read = platform.read_workspace("acme", "ns-app").await.unwrap();

    assert_eq!(created, read);
    assert!(read.auto_apply);
    assert_eq!(platform.mutations().len(), 1);
}

#[tokio::test]
async fn sensitive_values_are_hidden_from_listing() {
    let platform = FakePlatform::new();
    let ws = platform.create_workspace("acme", &options("ns-app")).await.unwrap();
    let request = VariableRequest {
        key: "token".to_string(),
        value: "hunter2".to_string(),
        sensitive: true,
        hcl: false,
        category: VariableCategory::Env,
    };
    platform.create_variable(&ws.id, &request).await.unwrap();

    let listed = platform.list_variables(&ws.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].value, None);
    assert_eq!(
        platform.variables(&ws.id),
        vec![("token".to_string(), "hunter2".to_string(), true)]
    );
}

#[tokio::test]
async fn create_run_becomes_current_run() {
    let platform = FakePlatform::new();
    let ws = platform.create_workspace("acme", &options("ns-app")).await.unwrap();

    let run = platform.create_run(&ws.id, &RunOptions::default()).await.unwrap();

    assert_eq!(run.status, RunStatus::Pending);
    assert_eq!(platform.workspace(&ws.id).unwrap().current_run, Some(run.id));
}

#[tokio::test]
async fn scripted_run_advances_per_read_and_sticks_on_last() {
    let platform = FakePlatform::new();
    let ws = platform.create_workspace("acme", &options("ns-app")).await.unwrap();
    platform.script_next_run(vec![RunStatus::Planning, RunStatus::Applying, RunStatus::Applied]);

    let run = platform.create_run(&ws.id, &RunOptions::default()).await.unwrap();
    assert_eq!(run.status, RunStatus::Planning);

    let mut seen = Vec::new();
    for _ in 0..3 {
        seen.push(platform.read_run(&run.id).await.unwrap().status);
    }
    assert_eq!(seen, vec![RunStatus::Applying, RunStatus::Applied, RunStatus::Applied]);
}

#[tokio::test]
async fn upload_records_main_tf_and_auto_uploads() {
    let platform = FakePlatform::new();
    platform.set_auto_upload(true);
    let ws = platform.create_workspace("acme", &options("ns-app")).await.unwrap();
    let cv = platform.create_configuration_version(&ws.id).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("main.tf"), "terraform {}\n").unwrap();

    platform.upload_configuration(&cv.upload_url, dir.path()).await.unwrap();

    let read = platform.read_configuration_version(&cv.id).await.unwrap();
    assert_eq!(read.status, ConfigVersionStatus::Uploaded);
    assert_eq!(platform.uploaded_config(&cv.id).as_deref(), Some("terraform {}\n"));
}

#[tokio::test]
async fn state_is_not_found_until_set() {
    let platform = FakePlatform::new();
    let ws = platform.add_workspace("acme", "ns-app");
    assert!(platform.current_state_download_url(&ws).await.unwrap_err().is_not_found());

    platform.set_state(&ws, &serde_json::json!({"outputs": {}}));
    let url = platform.current_state_download_url(&ws).await.unwrap();
    let bytes = platform.download_state(&url).await.unwrap();
    assert_eq!(bytes, br#"{"outputs":{}}"#.to_vec());
}

#[tokio::test]
async fn injected_failure_is_an_api_error() {
    let platform = FakePlatform::new();
    let ws = platform.add_workspace("acme", "ns-app");
    platform.fail("delete_workspace");

    let err = platform.delete_workspace(&ws).await.unwrap_err();
    assert!(matches!(err, PlatformError::Api { status: 500, .. }));
    assert!(platform.workspace(&ws).is_some());

    platform.clear_failures();
    platform.delete_workspace(&ws).await.unwrap();
    assert!(platform.workspace(&ws).is_none());
}

#[tokio::test]
async fn reads_are_not_mutations() {
    let platform = FakePlatform::new();
    let ws = platform.add_workspace("acme", "ns-app");
    platform.list_variables(&ws).await.unwrap();
    platform.list_notifications(&ws).await.unwrap();
    platform.list_runs(&ws).await.unwrap();

    assert_eq!(platform.calls().len(), 3);
    assert!(platform.mutations().is_empty());
}
