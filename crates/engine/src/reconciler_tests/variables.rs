// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::Path;

fn variable_mutations(ctx: &TestContext) -> Vec<PlatformCall> {
    ctx.platform
        .mutations()
        .into_iter()
        .filter(|c| {
            matches!(
                c,
                PlatformCall::CreateVariable { .. }
                    | PlatformCall::UpdateVariable { .. }
                    | PlatformCall::DeleteVariable { .. }
            )
        })
        .collect()
}

#[tokio::test]
async fn converges_remote_variables_to_declared_set() {
    let ctx = setup();
    let id = ctx.platform.add_workspace("acme", "default-app");
    ctx.platform.add_variable(&id, "B", "old", true);
    ctx.platform.add_variable(&id, "C", "stale", false);
    ctx.secrets.set(Path::new("/tmp/secrets"), "B", "fresh");
    let key = ctx.apply(
        WorkspaceBuilder::new()
            .no_source()
            .variable("A", "1")
            .secret_variable("B")
            .build(),
    );

    pass(&ctx, &key).await;

    let mut vars = ctx.platform.variables(&id);
    vars.sort();
    assert_eq!(
        vars,
        vec![
            ("A".to_string(), "1".to_string(), false),
            ("B".to_string(), "fresh".to_string(), true),
        ]
    );
    let calls = variable_mutations(&ctx);
    assert_eq!(calls.len(), 3);
    assert!(matches!(calls[0], PlatformCall::DeleteVariable { .. }));
    assert_eq!(ctx.secrets.reads(), vec!["B".to_string()]);
}

#[tokio::test]
async fn sensitive_variables_are_rewritten_every_pass() {
    let ctx = setup();
    ctx.secrets.set(Path::new("/tmp/secrets"), "token", "s3cret");
    let key = ctx.apply(WorkspaceBuilder::new().no_source().secret_variable("token").build());
    pass(&ctx, &key).await;
    let ws = ctx.get(&key);
    let remote = remote_of(&ctx, &key);

    ctx.platform.clear_calls();
    assert!(ctx.reconciler.sync_variables(&ws, &remote).await.unwrap());
    assert!(ctx.reconciler.sync_variables(&ws, &remote).await.unwrap());

    let calls = variable_mutations(&ctx);
    assert_eq!(calls.len(), 2);
    assert!(calls
        .iter()
        .all(|c| matches!(c, PlatformCall::UpdateVariable { .. })));
}

#[tokio::test]
async fn unchanged_plain_variables_report_no_change() {
    let ctx = setup();
    let key = ctx.apply(
        WorkspaceBuilder::new()
            .no_source()
            .variable("region", "eu-west-1")
            .env_variable("TF_LOG", "info")
            .build(),
    );
    pass(&ctx, &key).await;
    let ws = ctx.get(&key);
    let remote = remote_of(&ctx, &key);
    ctx.platform.clear_calls();

    assert!(!ctx.reconciler.sync_variables(&ws, &remote).await.unwrap());
    assert!(variable_mutations(&ctx).is_empty());
}

#[tokio::test]
async fn deleting_variables_alone_reports_no_change() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().no_source().variable("a", "1").build());
    pass(&ctx, &key).await;
    let remote = remote_of(&ctx, &key);
    ctx.apply(WorkspaceBuilder::new().no_source().build());
    let ws = ctx.get(&key);

    assert!(!ctx.reconciler.sync_variables(&ws, &remote).await.unwrap());
    assert!(ctx.platform.variables(&remote.id).is_empty());
}

#[tokio::test]
async fn missing_secret_aborts_the_pass() {
    let ctx = setup();
    let key = ctx.apply(WorkspaceBuilder::new().no_source().secret_variable("token").build());

    let err = ctx.reconciler.reconcile(&key).await.unwrap_err();

    assert!(matches!(err, ReconcileError::Secret(_)), "{err}");
    assert!(ctx.platform.variables(&remote_of(&ctx, &key).id).is_empty());
}

#[tokio::test]
async fn inline_sensitive_value_is_not_read_from_mount() {
    let ctx = setup();
    let mut ws = WorkspaceBuilder::new().no_source().build();
    ws.spec.variables.push(tfsync_core::Variable {
        key: "password".to_string(),
        value: "inline".to_string(),
        sensitive: true,
        ..Default::default()
    });
    let key = ctx.apply(ws);

    pass(&ctx, &key).await;

    assert!(ctx.secrets.reads().is_empty());
    assert_eq!(
        ctx.platform.variables(&remote_of(&ctx, &key).id),
        vec![("password".to_string(), "inline".to_string(), true)]
    );
}
