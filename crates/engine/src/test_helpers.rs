// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use crate::{EngineConfig, Reconciler, ReconcilerDeps};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tfsync_adapters::{FakePlatform, FakeRecorder, FakeSecrets, MemoryMapStore, MemoryResourceStore};
use tfsync_core::{ResourceKey, Workspace};

/// Convenience alias for the fully-typed test reconciler.
pub(crate) type TestReconciler =
    Reconciler<FakePlatform, MemoryResourceStore, MemoryMapStore, FakeSecrets, FakeRecorder>;

/// Test context holding the reconciler and its fake adapters.
pub(crate) struct TestContext {
    pub reconciler: TestReconciler,
    pub platform: FakePlatform,
    pub store: MemoryResourceStore,
    pub maps: MemoryMapStore,
    pub secrets: FakeSecrets,
    pub recorder: FakeRecorder,
    pub work_dir: PathBuf,
    _dir: TempDir,
}

impl TestContext {
    /// Store a resource and make its organization and secrets mount exist.
    pub fn apply(&self, workspace: Workspace) -> ResourceKey {
        self.platform.add_organization(&workspace.spec.organization);
        self.secrets.add_mount(&workspace.spec.secrets_mount_path);
        self.store.apply(workspace).key()
    }

    pub fn get(&self, key: &ResourceKey) -> Workspace {
        self.store.snapshot(key).unwrap()
    }
}

pub(crate) fn test_config(work_dir: PathBuf) -> EngineConfig {
    EngineConfig {
        short_requeue: Duration::from_secs(10),
        steady_requeue: Duration::from_secs(60),
        destroy_poll_interval: Duration::from_secs(5),
        destroy_timeout: Duration::from_secs(60),
        vcs_config_retries: 3,
        vcs_config_retry_delay: Duration::from_secs(1),
        default_terraform_version: "latest".to_string(),
        work_dir,
    }
}

/// Create a reconciler wired to fresh fakes.
pub(crate) fn setup() -> TestContext {
    let dir = tempfile::tempdir().unwrap();
    let work_dir = dir.path().join("work");
    let platform = FakePlatform::new();
    let store = MemoryResourceStore::new();
    let maps = MemoryMapStore::new();
    let secrets = FakeSecrets::new();
    let recorder = FakeRecorder::new();

    let reconciler = Reconciler::new(
        ReconcilerDeps {
            platform: platform.clone(),
            store: store.clone(),
            maps: maps.clone(),
            secrets: secrets.clone(),
            recorder: recorder.clone(),
        },
        test_config(work_dir.clone()),
    );

    TestContext {
        reconciler,
        platform,
        store,
        maps,
        secrets,
        recorder,
        work_dir,
        _dir: dir,
    }
}
