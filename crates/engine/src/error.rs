// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the reconciler

use std::path::PathBuf;
use std::time::Duration;
use tfsync_adapters::{MapStoreError, PlatformError, SecretError, StoreError};
use tfsync_core::{RunId, StateParseError, WorkspaceId};
use thiserror::Error;

/// Errors that abort a reconcile pass. The caller retries the pass.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
    #[error("resource store error: {0}")]
    Store(#[from] StoreError),
    #[error("map store error: {0}")]
    Maps(#[from] MapStoreError),
    #[error("secret error: {0}")]
    Secret(#[from] SecretError),
    #[error("invalid state document: {0}")]
    State(#[from] StateParseError),
    #[error("failed to render configuration: {0}")]
    Render(#[from] hcl::Error),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("destroy run {0} errored")]
    DestroyFailed(RunId),
    #[error("destroy run {run_id} did not finish within {timeout:?}")]
    DestroyTimeout { run_id: RunId, timeout: Duration },
    #[error("no configuration version appeared for workspace {0}")]
    ConfigVersionMissing(WorkspaceId),
}
