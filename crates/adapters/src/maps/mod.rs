// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Downstream key-value map store
//!
//! Holds published outputs and the rendered configuration text, one
//! string map per namespaced name.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tfsync_core::MapRef;
use thiserror::Error;

/// Errors from map store operations
#[derive(Debug, Error)]
pub enum MapStoreError {
    #[error("map not found: {0}")]
    NotFound(MapRef),
    #[error("map store unavailable: {0}")]
    Unavailable(String),
}

impl MapStoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, MapStoreError::NotFound(_))
    }
}

/// Adapter for the downstream key-value store
#[async_trait]
pub trait MapStore: Clone + Send + Sync + 'static {
    async fn get(&self, map: &MapRef) -> Result<BTreeMap<String, String>, MapStoreError>;

    /// Create the map or replace its entire contents
    async fn upsert(
        &self,
        map: &MapRef,
        data: BTreeMap<String, String>,
    ) -> Result<(), MapStoreError>;

    async fn delete(&self, map: &MapRef) -> Result<(), MapStoreError>;
}

/// In-memory map store that counts writes
#[derive(Clone, Default)]
pub struct MemoryMapStore {
    inner: Arc<Mutex<MemoryMaps>>,
}

#[derive(Default)]
struct MemoryMaps {
    maps: HashMap<MapRef, BTreeMap<String, String>>,
    writes: usize,
}

impl MemoryMapStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, map: &MapRef) -> Option<BTreeMap<String, String>> {
        self.inner.lock().maps.get(map).cloned()
    }

    /// Number of upserts and deletes performed
    pub fn writes(&self) -> usize {
        self.inner.lock().writes
    }
}

#[async_trait]
impl MapStore for MemoryMapStore {
    async fn get(&self, map: &MapRef) -> Result<BTreeMap<String, String>, MapStoreError> {
        self.inner
            .lock()
            .maps
            .get(map)
            .cloned()
            .ok_or_else(|| MapStoreError::NotFound(map.clone()))
    }

    async fn upsert(
        &self,
        map: &MapRef,
        data: BTreeMap<String, String>,
    ) -> Result<(), MapStoreError> {
        let mut inner = self.inner.lock();
        inner.maps.insert(map.clone(), data);
        inner.writes += 1;
        Ok(())
    }

    async fn delete(&self, map: &MapRef) -> Result<(), MapStoreError> {
        let mut inner = self.inner.lock();
        inner.writes += 1;
        inner
            .maps
            .remove(map)
            .map(|_| ())
            .ok_or_else(|| MapStoreError::NotFound(map.clone()))
    }
}

#[cfg(test)]
#[path = "maps_tests.rs"]
mod tests;
