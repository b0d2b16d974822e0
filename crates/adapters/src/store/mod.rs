// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative resource store adapter
//!
//! Writes are optimistic: each carries the resource version the caller last
//! read and fails with [`StoreError::Conflict`] when the stored copy moved on.

mod memory;

pub use memory::MemoryResourceStore;

use async_trait::async_trait;
use tfsync_core::{ResourceKey, Workspace};
use thiserror::Error;

/// Errors from resource store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("resource not found: {0}")]
    NotFound(ResourceKey),
    #[error("conflict on {key}: expected version {expected}, found {found}")]
    Conflict {
        key: ResourceKey,
        expected: u64,
        found: u64,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Adapter for the store holding declared workspace resources
#[async_trait]
pub trait ResourceStore: Clone + Send + Sync + 'static {
    /// Fetch a resource; `None` when it no longer exists
    async fn get(&self, key: &ResourceKey) -> Result<Option<Workspace>, StoreError>;

    /// Persist `workspace.status`
    async fn update_status(&self, workspace: &Workspace) -> Result<Workspace, StoreError>;

    /// Add the reconciler's finalizer marker
    async fn add_finalizer(&self, workspace: &Workspace) -> Result<Workspace, StoreError>;

    /// Remove the reconciler's finalizer marker. A resource marked for
    /// deletion is released once no finalizers remain.
    async fn remove_finalizer(&self, workspace: &Workspace) -> Result<Workspace, StoreError>;
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
