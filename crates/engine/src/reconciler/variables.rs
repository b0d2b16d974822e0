// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Variable convergence
//!
//! Remote sensitive values cannot be read back, so sensitive variables are
//! overwritten on every pass instead of diffed.

use super::Reconciler;
use crate::error::ReconcileError;
use std::collections::{HashMap, HashSet};
use tfsync_adapters::{EventRecorder, MapStore, PlatformAdapter, ResourceStore, SecretSource};
use tfsync_core::{RemoteVariable, RemoteWorkspace, Variable, VariableRequest, Workspace};

/// Remote changes that bring a workspace's variables in line with its spec.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct VariablePlan<'a> {
    /// Remote variables whose key is no longer declared.
    pub deletes: Vec<&'a RemoteVariable>,
    /// Declared variables missing remotely.
    pub creates: Vec<&'a Variable>,
    /// Declared variables whose remote copy must be overwritten.
    pub updates: Vec<(&'a Variable, &'a RemoteVariable)>,
}

impl VariablePlan<'_> {
    /// Whether applying the plan creates or overwrites anything.
    /// Deletions alone do not count.
    pub fn changes_values(&self) -> bool {
        !self.creates.is_empty() || !self.updates.is_empty()
    }
}

/// Diff declared variables against the remote set by key.
pub fn plan_variables<'a>(
    desired: &'a [Variable],
    remote: &'a [RemoteVariable],
) -> VariablePlan<'a> {
    let declared: HashSet<&str> = desired.iter().map(|v| v.key.as_str()).collect();
    let by_key: HashMap<&str, &RemoteVariable> =
        remote.iter().map(|r| (r.key.as_str(), r)).collect();

    let mut plan = VariablePlan {
        deletes: remote
            .iter()
            .filter(|r| !declared.contains(r.key.as_str()))
            .collect(),
        ..Default::default()
    };

    for variable in desired {
        match by_key.get(variable.key.as_str()) {
            None => plan.creates.push(variable),
            Some(existing) if needs_update(variable, existing) => {
                plan.updates.push((variable, existing));
            }
            Some(_) => {}
        }
    }
    plan
}

fn needs_update(desired: &Variable, remote: &RemoteVariable) -> bool {
    if remote.sensitive {
        return true;
    }
    remote.value.as_deref() != Some(desired.value.as_str())
        || remote.hcl != desired.hcl
        || remote.sensitive != desired.sensitive
        || remote.category != desired.category()
}

impl<P, S, M, K, R> Reconciler<P, S, M, K, R>
where
    P: PlatformAdapter,
    S: ResourceStore,
    M: MapStore,
    K: SecretSource,
    R: EventRecorder,
{
    /// Converge remote variables. Returns whether any value was written.
    pub(crate) async fn sync_variables(
        &self,
        ws: &Workspace,
        remote: &RemoteWorkspace,
    ) -> Result<bool, ReconcileError> {
        let current = self.platform.list_variables(&remote.id).await?;
        let plan = plan_variables(&ws.spec.variables, &current);

        for stale in &plan.deletes {
            self.platform.delete_variable(&remote.id, &stale.id).await?;
            tracing::info!(key = %stale.key, "deleted variable");
        }

        for variable in &plan.creates {
            let request = self.variable_request(ws, variable).await?;
            self.platform.create_variable(&remote.id, &request).await?;
            tracing::info!(key = %variable.key, sensitive = variable.sensitive, "created variable");
        }

        for (variable, existing) in &plan.updates {
            let request = self.variable_request(ws, variable).await?;
            self.platform
                .update_variable(&remote.id, &existing.id, &request)
                .await?;
            tracing::info!(key = %variable.key, sensitive = variable.sensitive, "updated variable");
        }

        if plan.deletes.is_empty() && !plan.changes_values() {
            tracing::debug!(count = current.len(), "variables up to date");
        }
        Ok(plan.changes_values())
    }

    /// Resolve a variable's value, reading mounted secrets as needed.
    async fn variable_request(
        &self,
        ws: &Workspace,
        variable: &Variable,
    ) -> Result<VariableRequest, ReconcileError> {
        let value = if variable.is_mounted() {
            self.secrets
                .read(&ws.spec.secrets_mount_path, &variable.key)
                .await?
        } else {
            variable.value.clone()
        };
        Ok(VariableRequest::new(variable, value))
    }
}

#[cfg(test)]
#[path = "variables_tests.rs"]
mod tests;
