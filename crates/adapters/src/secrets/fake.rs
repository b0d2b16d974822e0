// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake secret source for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SecretError, SecretSource};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Default)]
struct FakeSecretsState {
    mounts: HashSet<PathBuf>,
    values: HashMap<(PathBuf, String), String>,
    reads: Vec<String>,
}

/// Fake secret source holding values in memory
#[derive(Clone, Default)]
pub struct FakeSecrets {
    inner: Arc<Mutex<FakeSecretsState>>,
}

impl FakeSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mount without any keys
    pub fn add_mount(&self, mount: &Path) {
        self.inner.lock().mounts.insert(mount.to_path_buf());
    }

    /// Set a value, registering its mount
    pub fn set(&self, mount: &Path, key: &str, value: &str) {
        let mut inner = self.inner.lock();
        inner.mounts.insert(mount.to_path_buf());
        inner
            .values
            .insert((mount.to_path_buf(), key.to_string()), value.to_string());
    }

    /// Keys read so far, in order
    pub fn reads(&self) -> Vec<String> {
        self.inner.lock().reads.clone()
    }
}

#[async_trait]
impl SecretSource for FakeSecrets {
    async fn read(&self, mount: &Path, key: &str) -> Result<String, SecretError> {
        let mut inner = self.inner.lock();
        inner.reads.push(key.to_string());
        inner
            .values
            .get(&(mount.to_path_buf(), key.to_string()))
            .cloned()
            .ok_or_else(|| SecretError::NotFound {
                mount: mount.to_path_buf(),
                key: key.to_string(),
            })
    }

    async fn exists(&self, mount: &Path) -> bool {
        self.inner.lock().mounts.contains(mount)
    }
}
