//! Test harness for behavioral specifications.
//!
//! Wires a reconciler to in-memory adapters and offers helpers to drive it.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tfsync_adapters::{FakePlatform, FakeRecorder, FakeSecrets, MemoryMapStore, MemoryResourceStore};
use tfsync_core::{RemoteWorkspace, ResourceKey, Workspace};
use tfsync_engine::{EngineConfig, Reconciler, ReconcilerDeps, Requeue};

pub use tfsync_adapters::PlatformCall;
pub use tfsync_core::test_support::WorkspaceBuilder;
pub use tfsync_core::{ConfigVersionStatus, Reason, RunStatus, FINALIZER};

pub const SHORT: Duration = Duration::from_secs(5);
pub const STEADY: Duration = Duration::from_secs(300);

pub struct Harness {
    pub reconciler:
        Reconciler<FakePlatform, MemoryResourceStore, MemoryMapStore, FakeSecrets, FakeRecorder>,
    pub platform: FakePlatform,
    pub store: MemoryResourceStore,
    pub maps: MemoryMapStore,
    pub secrets: FakeSecrets,
    pub recorder: FakeRecorder,
    pub secrets_dir: PathBuf,
    _dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let secrets_dir = dir.path().join("secrets");
        let config = EngineConfig {
            short_requeue: SHORT,
            steady_requeue: STEADY,
            destroy_poll_interval: Duration::from_secs(10),
            destroy_timeout: Duration::from_secs(600),
            vcs_config_retries: 2,
            vcs_config_retry_delay: Duration::from_secs(1),
            default_terraform_version: "1.7.0".to_string(),
            work_dir: dir.path().join("work"),
        };
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
            config,
        );
        Self {
            reconciler,
            platform,
            store,
            maps,
            secrets,
            recorder,
            secrets_dir,
            _dir: dir,
        }
    }

    /// A module-backed workspace whose secrets live in this harness.
    pub fn workspace(&self) -> WorkspaceBuilder {
        WorkspaceBuilder::new().secrets_mount(&self.secrets_dir)
    }

    /// Declare a workspace, creating its organization and secrets mount.
    pub fn declare(&self, workspace: Workspace) -> ResourceKey {
        self.platform.add_organization(&workspace.spec.organization);
        self.secrets.add_mount(&workspace.spec.secrets_mount_path);
        self.store.apply(workspace).key()
    }

    pub fn set_secret(&self, key: &str, value: &str) {
        self.secrets.set(&self.secrets_dir, key, value);
    }

    pub async fn reconcile(&self, key: &ResourceKey) -> Requeue {
        self.reconciler.reconcile(key).await.unwrap()
    }

    pub fn resource(&self, key: &ResourceKey) -> Workspace {
        self.store.snapshot(key).unwrap()
    }

    pub fn remote(&self, key: &ResourceKey) -> RemoteWorkspace {
        let id = self.resource(key).status.workspace_id.unwrap();
        self.platform.workspace(&id).unwrap()
    }

    /// Drive a module-backed workspace to an applied run and steady state.
    pub async fn converge(&self, key: &ResourceKey) {
        self.platform.set_auto_upload(true);
        assert_eq!(self.reconcile(key).await, Requeue::After(SHORT));
        self.platform.script_next_run(vec![RunStatus::Applied]);
        assert_eq!(self.reconcile(key).await, Requeue::Immediately);
        assert_eq!(self.reconcile(key).await, Requeue::After(STEADY));
    }
}
