// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative resource identity and metadata.
//!
//! A workspace resource is addressed by `namespace/name`. The metadata also
//! carries the optimistic-concurrency version, the finalizer list that keeps
//! the resource alive while remote cleanup is pending, and the deletion marker.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Finalizer held on every workspace resource that may own a remote workspace.
pub const FINALIZER: &str = "finalizer.tfsync.dev/workspace";

/// Address of a workspace resource in the declarative store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceKey {
    pub namespace: String,
    pub name: String,
}

impl ResourceKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Store-owned metadata of a workspace resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMeta {
    pub namespace: String,
    pub name: String,
    /// Bumped by the store on every write; writes carrying a stale version fail.
    #[serde(default)]
    pub resource_version: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub finalizers: Vec<String>,
    /// Set when deletion was requested; the resource lingers until its
    /// finalizers are removed.
    #[serde(default)]
    pub deletion_requested: bool,
}

impl ResourceMeta {
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.namespace, &self.name)
    }

    pub fn has_finalizer(&self, finalizer: &str) -> bool {
        self.finalizers.iter().any(|f| f == finalizer)
    }

    /// Name of the remote workspace backing this resource.
    pub fn remote_workspace_name(&self) -> String {
        format!("{}-{}", self.namespace, self.name)
    }
}
