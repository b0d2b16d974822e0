// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod deletion;
mod lifecycle;
mod logging;
mod notifications;
mod outputs;
mod runs;
mod variables;
mod workspace;

use super::*;
use crate::test_helpers::{setup, TestContext};
use tfsync_adapters::PlatformCall;
use tfsync_core::test_support::WorkspaceBuilder;
use tfsync_core::{RemoteWorkspace, RunId, RunStatus};

const SHORT: Requeue = Requeue::After(Duration::from_secs(10));
const STEADY: Requeue = Requeue::After(Duration::from_secs(60));

async fn pass(ctx: &TestContext, key: &ResourceKey) -> Requeue {
    ctx.reconciler.reconcile(key).await.unwrap()
}

/// Upload configuration and start the first run, whose reads follow `statuses`.
async fn start_first_run(
    ctx: &TestContext,
    key: &ResourceKey,
    statuses: Vec<RunStatus>,
) -> RunId {
    ctx.platform.set_auto_upload(true);
    assert_eq!(pass(ctx, key).await, SHORT);
    ctx.platform.script_next_run(statuses);
    assert_eq!(pass(ctx, key).await, Requeue::Immediately);
    ctx.get(key).status.run_id.unwrap()
}

/// Take a fresh module-backed workspace to an applied, converged state.
async fn converge(ctx: &TestContext, key: &ResourceKey) -> RunId {
    let run_id = start_first_run(ctx, key, vec![RunStatus::Applied]).await;
    assert_eq!(pass(ctx, key).await, STEADY);
    run_id
}

fn remote_of(ctx: &TestContext, key: &ResourceKey) -> RemoteWorkspace {
    let id = ctx.get(key).status.workspace_id.unwrap();
    ctx.platform.workspace(&id).unwrap()
}

fn count(calls: &[PlatformCall], pred: impl Fn(&PlatformCall) -> bool) -> usize {
    calls.iter().filter(|c| pred(c)).count()
}
