// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{
    ModuleSource, Notification, OutputSelector, ResourceMeta, Variable, VcsRepo, Workspace,
    WorkspaceSpec, FINALIZER,
};
use std::path::{Path, PathBuf};

/// Builder for `Workspace` with test defaults.
pub struct WorkspaceBuilder {
    meta: ResourceMeta,
    spec: WorkspaceSpec,
}

impl WorkspaceBuilder {
    /// Module-backed workspace `default/app` in organization `acme`.
    pub fn new() -> Self {
        Self {
            meta: ResourceMeta {
                namespace: "default".to_string(),
                name: "app".to_string(),
                ..Default::default()
            },
            spec: WorkspaceSpec {
                organization: "acme".to_string(),
                module: Some(ModuleSource {
                    source: "app.terraform.io/acme/app/aws".to_string(),
                    version: Some("1.0.0".to_string()),
                }),
                secrets_mount_path: PathBuf::from("/tmp/secrets"),
                ..Default::default()
            },
        }
    }

    pub fn named(mut self, namespace: &str, name: &str) -> Self {
        self.meta.namespace = namespace.to_string();
        self.meta.name = name.to_string();
        self
    }

    pub fn organization(mut self, org: &str) -> Self {
        self.spec.organization = org.to_string();
        self
    }

    pub fn secrets_mount(mut self, path: &Path) -> Self {
        self.spec.secrets_mount_path = path.to_path_buf();
        self
    }

    pub fn vcs(mut self, repo: &str) -> Self {
        self.spec.module = None;
        self.spec.vcs = Some(VcsRepo {
            token_id: "ot-1".to_string(),
            repo_identifier: repo.to_string(),
            branch: None,
            ingress_submodules: false,
        });
        self
    }

    pub fn no_source(mut self) -> Self {
        self.spec.module = None;
        self.spec.vcs = None;
        self
    }

    pub fn variable(mut self, key: &str, value: &str) -> Self {
        self.spec.variables.push(Variable {
            key: key.to_string(),
            value: value.to_string(),
            ..Default::default()
        });
        self
    }

    pub fn env_variable(mut self, key: &str, value: &str) -> Self {
        self.spec.variables.push(Variable {
            key: key.to_string(),
            value: value.to_string(),
            environment_variable: true,
            ..Default::default()
        });
        self
    }

    /// Sensitive variable read from the secrets mount.
    pub fn secret_variable(mut self, key: &str) -> Self {
        self.spec.variables.push(Variable {
            key: key.to_string(),
            sensitive: true,
            ..Default::default()
        });
        self
    }

    pub fn output(mut self, key: &str, module_output_name: &str) -> Self {
        self.spec.outputs.push(OutputSelector {
            key: key.to_string(),
            module_output_name: module_output_name.to_string(),
        });
        self
    }

    pub fn notification(mut self, notification: Notification) -> Self {
        self.spec.notifications.push(notification);
        self
    }

    pub fn ssh_key(mut self, id: &str) -> Self {
        self.spec.ssh_key_id = Some(id.to_string());
        self
    }

    pub fn agent_pool(mut self, id: &str) -> Self {
        self.spec.agent_pool_id = Some(id.to_string());
        self
    }

    pub fn terraform_version(mut self, version: &str) -> Self {
        self.spec.terraform_version = Some(version.to_string());
        self
    }

    pub fn outputs_map(mut self, name: &str) -> Self {
        self.spec.outputs_map = Some(name.to_string());
        self
    }

    pub fn with_finalizer(mut self) -> Self {
        self.meta.finalizers.push(FINALIZER.to_string());
        self
    }

    pub fn deleting(mut self) -> Self {
        self.meta.deletion_requested = true;
        self
    }

    pub fn build(self) -> Workspace {
        Workspace {
            meta: self.meta,
            spec: self.spec,
            status: Default::default(),
        }
    }
}

impl Default for WorkspaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
