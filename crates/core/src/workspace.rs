// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace resource: desired spec, observed status, and the platform's view.
//!
//! The spec is owned by whoever declares the resource. The status is written
//! only by the reconciler and records what it last observed remotely.

use crate::id::{ConfigVersionId, RunId, WorkspaceId};
use crate::notification::Notification;
use crate::resource::{ResourceKey, ResourceMeta};
use crate::run::RunStatus;
use crate::variable::Variable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A declared workspace resource as held by the resource store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub meta: ResourceMeta,
    pub spec: WorkspaceSpec,
    #[serde(default)]
    pub status: WorkspaceStatus,
}

impl Workspace {
    pub fn key(&self) -> ResourceKey {
        self.meta.key()
    }

    pub fn is_marked_for_deletion(&self) -> bool {
        self.meta.deletion_requested
    }
}

/// Registry module backing a workspace's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSource {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Version-controlled repository the platform pulls configuration from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsRepo {
    /// OAuth token id of the VCS connection on the platform.
    pub token_id: String,
    /// `org/repo` style identifier.
    pub repo_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default)]
    pub ingress_submodules: bool,
}

/// Maps a module output attribute to an output key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSelector {
    pub key: String,
    pub module_output_name: String,
}

/// Desired state of a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSpec {
    pub organization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<ModuleSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs: Option<VcsRepo>,
    #[serde(default)]
    pub variables: Vec<Variable>,
    /// Directory holding one plaintext file per sensitive variable.
    pub secrets_mount_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_pool_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    #[serde(default)]
    pub outputs: Vec<OutputSelector>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    /// Name of the downstream output map; defaults to `<name>-outputs`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs_map: Option<String>,
}

/// A stringified output published after a successful run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputStatus {
    pub key: String,
    pub value: String,
}

/// Namespaced name of a map in the downstream key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapRef {
    pub namespace: String,
    pub name: String,
}

impl MapRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for MapRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Observed state, mutated only by the reconciler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<WorkspaceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<RunId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_status: Option<RunStatus>,
    /// Configuration version uploaded but not yet consumed by a run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_version_id: Option<ConfigVersionId>,
    #[serde(default)]
    pub outputs: Vec<OutputStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs_map: Option<MapRef>,
}

impl WorkspaceStatus {
    /// True while the last observed run has not reached a terminal status.
    pub fn is_run_pending(&self) -> bool {
        self.run_status.as_ref().is_some_and(|s| s.is_pending())
    }

    /// True when the last observed run is terminal and did not error.
    pub fn last_run_succeeded(&self) -> bool {
        self.run_status
            .as_ref()
            .is_some_and(|s| s.is_terminal() && *s != RunStatus::Errored)
    }
}

/// Organization as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Where the platform executes runs for a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    #[default]
    Remote,
    Local,
    /// Runs are executed by the given agent pool.
    Agent { pool_id: String },
}

impl ExecutionMode {
    /// Execution mode implied by an optional agent pool.
    pub fn for_agent_pool(pool_id: Option<&str>) -> Self {
        match pool_id {
            Some(id) => ExecutionMode::Agent {
                pool_id: id.to_string(),
            },
            None => ExecutionMode::Remote,
        }
    }
}

/// The platform's view of a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteWorkspace {
    pub id: WorkspaceId,
    pub name: String,
    pub organization: String,
    pub terraform_version: String,
    pub auto_apply: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key_id: Option<String>,
    #[serde(default)]
    pub execution_mode: ExecutionMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs_repo: Option<VcsRepo>,
    /// Most recent run, regardless of who triggered it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_run: Option<RunId>,
}

/// Attributes of a workspace being created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceOptions {
    pub name: String,
    pub terraform_version: String,
    pub auto_apply: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcs_repo: Option<VcsRepo>,
}

/// Targeted update of mutable workspace attributes. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_mode: Option<ExecutionMode>,
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
