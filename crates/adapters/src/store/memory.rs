// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory resource store

use super::{ResourceStore, StoreError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tfsync_core::{ResourceKey, Workspace, FINALIZER};

/// Resource store backed by a map, usable as the store of an embedded
/// reconciler and as a test double.
#[derive(Clone, Default)]
pub struct MemoryResourceStore {
    inner: Arc<Mutex<BTreeMap<ResourceKey, Workspace>>>,
}

impl MemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a resource as its author would, bumping its version.
    pub fn apply(&self, mut workspace: Workspace) -> Workspace {
        let mut inner = self.inner.lock();
        let key = workspace.key();
        if let Some(existing) = inner.get(&key) {
            workspace.meta.resource_version = existing.meta.resource_version + 1;
            workspace.meta.finalizers = existing.meta.finalizers.clone();
            workspace.status = existing.status.clone();
        } else {
            workspace.meta.resource_version = workspace.meta.resource_version.max(1);
        }
        inner.insert(key, workspace.clone());
        workspace
    }

    /// Mark a resource for deletion. Resources without finalizers are
    /// removed immediately.
    pub fn request_deletion(&self, key: &ResourceKey) {
        let mut inner = self.inner.lock();
        let release = match inner.get_mut(key) {
            Some(ws) => {
                ws.meta.deletion_requested = true;
                ws.meta.resource_version += 1;
                ws.meta.finalizers.is_empty()
            }
            None => false,
        };
        if release {
            inner.remove(key);
        }
    }

    /// Snapshot of a stored resource
    pub fn snapshot(&self, key: &ResourceKey) -> Option<Workspace> {
        self.inner.lock().get(key).cloned()
    }

    fn write(
        &self,
        workspace: &Workspace,
        mutate: impl FnOnce(&mut Workspace),
    ) -> Result<Workspace, StoreError> {
        let mut inner = self.inner.lock();
        let key = workspace.key();
        let stored = inner
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        if stored.meta.resource_version != workspace.meta.resource_version {
            return Err(StoreError::Conflict {
                key,
                expected: workspace.meta.resource_version,
                found: stored.meta.resource_version,
            });
        }
        mutate(stored);
        stored.meta.resource_version += 1;
        let updated = stored.clone();
        if updated.meta.deletion_requested && updated.meta.finalizers.is_empty() {
            inner.remove(&key);
        }
        Ok(updated)
    }
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    async fn get(&self, key: &ResourceKey) -> Result<Option<Workspace>, StoreError> {
        Ok(self.snapshot(key))
    }

    async fn update_status(&self, workspace: &Workspace) -> Result<Workspace, StoreError> {
        let status = workspace.status.clone();
        self.write(workspace, |stored| stored.status = status)
    }

    async fn add_finalizer(&self, workspace: &Workspace) -> Result<Workspace, StoreError> {
        self.write(workspace, |stored| {
            if !stored.meta.has_finalizer(FINALIZER) {
                stored.meta.finalizers.push(FINALIZER.to_string());
            }
        })
    }

    async fn remove_finalizer(&self, workspace: &Workspace) -> Result<Workspace, StoreError> {
        self.write(workspace, |stored| {
            stored.meta.finalizers.retain(|f| f != FINALIZER);
        })
    }
}
