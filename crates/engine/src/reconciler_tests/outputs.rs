// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use std::collections::BTreeMap;
use tfsync_core::{MapRef, OutputStatus, Reason};

fn sample_state() -> serde_json::Value {
    json!({
        "version": 4,
        "outputs": {
            "vpc_id": { "value": "vpc-1", "type": "string" },
            "subnets": { "value": ["a", "b"], "type": ["list", "string"] },
            "count": { "value": 3, "type": "number" },
            "unset": { "value": null, "type": "string" }
        }
    })
}

/// Start an applied run and give the workspace `state` before it is observed.
async fn applied_with_state(ctx: &TestContext, key: &ResourceKey, state: &serde_json::Value) {
    start_first_run(ctx, key, vec![RunStatus::Applied]).await;
    ctx.platform.set_state(&remote_of(ctx, key).id, state);
}

#[tokio::test]
async fn publishes_stringified_outputs_after_applied_run() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().output("vpc_id", "vpc_id").build());
    applied_with_state(&ctx, &key, &sample_state()).await;

    assert_eq!(pass(&ctx, &key).await, STEADY);

    let published = ctx.maps.snapshot(&MapRef::new("default", "app-outputs")).unwrap();
    let expected = BTreeMap::from([
        ("count".to_string(), "3".to_string()),
        ("subnets".to_string(), r#"["a","b"]"#.to_string()),
        ("vpc_id".to_string(), r#""vpc-1""#.to_string()),
    ]);
    assert_eq!(published, expected);

    let status = ctx.get(&key).status;
    let keys: Vec<_> = status.outputs.iter().map(|o| o.key.as_str()).collect();
    assert_eq!(keys, vec!["count", "subnets", "vpc_id"]);
    assert_eq!(status.outputs_map, Some(MapRef::new("default", "app-outputs")));
    assert!(ctx.recorder.reasons().contains(&Reason::OutputsPublished));
}

#[tokio::test]
async fn unchanged_outputs_are_not_rewritten() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());
    applied_with_state(&ctx, &key, &sample_state()).await;
    pass(&ctx, &key).await;
    let writes = ctx.maps.writes();

    pass(&ctx, &key).await;

    assert_eq!(ctx.maps.writes(), writes);
}

#[tokio::test]
async fn changed_state_republishes() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());
    applied_with_state(&ctx, &key, &sample_state()).await;
    pass(&ctx, &key).await;

    let state = json!({ "outputs": { "vpc_id": { "value": "vpc-2", "type": "string" } } });
    ctx.platform.set_state(&remote_of(&ctx, &key).id, &state);
    pass(&ctx, &key).await;

    assert_eq!(
        ctx.get(&key).status.outputs,
        vec![OutputStatus {
            key: "vpc_id".to_string(),
            value: r#""vpc-2""#.to_string(),
        }]
    );
    let published = ctx.maps.snapshot(&MapRef::new("default", "app-outputs")).unwrap();
    assert_eq!(published.len(), 1);
}

#[tokio::test]
async fn renamed_outputs_map_replaces_the_old_one() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());
    applied_with_state(&ctx, &key, &sample_state()).await;
    pass(&ctx, &key).await;

    ctx.apply(WorkspaceBuilder::new().outputs_map("app-values").build());
    pass(&ctx, &key).await;

    assert_eq!(ctx.maps.snapshot(&MapRef::new("default", "app-outputs")), None);
    let published = ctx.maps.snapshot(&MapRef::new("default", "app-values")).unwrap();
    assert_eq!(published.len(), 3);
    assert_eq!(
        ctx.get(&key).status.outputs_map,
        Some(MapRef::new("default", "app-values"))
    );
}

#[tokio::test]
async fn workspace_without_state_publishes_empty_map() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());
    start_first_run(&ctx, &key, vec![RunStatus::Applied]).await;

    pass(&ctx, &key).await;

    let published = ctx.maps.snapshot(&MapRef::new("default", "app-outputs")).unwrap();
    assert!(published.is_empty());
    assert!(ctx.get(&key).status.outputs.is_empty());
}

#[tokio::test]
async fn malformed_state_fails_the_pass() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().build());
    let state = json!({ "outputs": { "vpc_id": { "value": 7, "type": "string" } } });
    applied_with_state(&ctx, &key, &state).await;

    let err = ctx.reconciler.reconcile(&key).await.unwrap_err();

    assert!(matches!(err, ReconcileError::State(_)), "{err}");
    assert_eq!(ctx.get(&key).status.outputs_map, None);
}
