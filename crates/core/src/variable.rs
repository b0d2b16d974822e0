// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace variables, desired and remote.

use crate::id::{VariableId, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the platform exposes a variable to runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableCategory {
    /// Input variable of the provisioning configuration.
    #[default]
    Terraform,
    /// Process environment variable of the run.
    Env,
}

impl fmt::Display for VariableCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableCategory::Terraform => f.write_str("terraform"),
            VariableCategory::Env => f.write_str("env"),
        }
    }
}

/// A desired variable. Keys are unique within a workspace.
///
/// A sensitive variable with an empty value is sourced from the secrets mount
/// at `{secrets_mount_path}/{key}`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default)]
    pub hcl: bool,
    #[serde(default)]
    pub environment_variable: bool,
}

impl Variable {
    pub fn category(&self) -> VariableCategory {
        if self.environment_variable {
            VariableCategory::Env
        } else {
            VariableCategory::Terraform
        }
    }

    /// Whether the plaintext must be read from the secrets mount.
    pub fn is_mounted(&self) -> bool {
        self.sensitive && self.value.is_empty()
    }
}

// Sensitive plaintext never reaches logs through Debug.
impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.sensitive { "<sensitive>" } else { self.value.as_str() };
        f.debug_struct("Variable")
            .field("key", &self.key)
            .field("value", &value)
            .field("sensitive", &self.sensitive)
            .field("hcl", &self.hcl)
            .field("environment_variable", &self.environment_variable)
            .finish()
    }
}

/// The platform's view of a variable. Sensitive values are never returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteVariable {
    pub id: VariableId,
    pub workspace_id: WorkspaceId,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub sensitive: bool,
    pub hcl: bool,
    pub category: VariableCategory,
}

/// Payload of a variable create or update, with the value already resolved.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRequest {
    pub key: String,
    pub value: String,
    pub sensitive: bool,
    pub hcl: bool,
    pub category: VariableCategory,
}

impl VariableRequest {
    pub fn new(variable: &Variable, value: String) -> Self {
        Self {
            key: variable.key.clone(),
            value,
            sensitive: variable.sensitive,
            hcl: variable.hcl,
            category: variable.category(),
        }
    }
}

impl fmt::Debug for VariableRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.sensitive { "<sensitive>" } else { self.value.as_str() };
        f.debug_struct("VariableRequest")
            .field("key", &self.key)
            .field("value", &value)
            .field("sensitive", &self.sensitive)
            .field("hcl", &self.hcl)
            .field("category", &self.category)
            .finish()
    }
}

#[cfg(test)]
#[path = "variable_tests.rs"]
mod tests;
