// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote workspace read-or-create and settings convergence

use super::Reconciler;
use crate::error::ReconcileError;
use tfsync_adapters::{
    EventRecorder, MapStore, PlatformAdapter, PlatformError, ResourceStore, SecretSource,
};
use tfsync_core::{
    Event, ExecutionMode, Reason, RemoteWorkspace, Workspace, WorkspaceOptions, WorkspaceSpec,
    WorkspaceUpdate,
};

type Converged = Result<Option<RemoteWorkspace>, PlatformError>;

/// Fold one setting's outcome into the running view, keeping the first error.
fn absorb(
    outcome: Converged,
    setting: &str,
    remote: &mut RemoteWorkspace,
    first_error: &mut Option<PlatformError>,
) {
    match outcome {
        Ok(Some(updated)) => {
            tracing::info!(setting, "workspace setting updated");
            *remote = updated;
        }
        Ok(None) => tracing::debug!(setting, "workspace setting up to date"),
        Err(e) => {
            tracing::warn!(setting, error = %e, "workspace setting update failed");
            first_error.get_or_insert(e);
        }
    }
}

impl<P, S, M, K, R> Reconciler<P, S, M, K, R>
where
    P: PlatformAdapter,
    S: ResourceStore,
    M: MapStore,
    K: SecretSource,
    R: EventRecorder,
{
    /// Read the remote workspace; `None` when it does not exist.
    pub(crate) async fn find_remote_workspace(
        &self,
        ws: &Workspace,
    ) -> Result<Option<RemoteWorkspace>, ReconcileError> {
        let name = ws.meta.remote_workspace_name();
        match self.platform.read_workspace(&ws.spec.organization, &name).await {
            Ok(remote) => Ok(Some(remote)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Ensure the remote workspace exists and its settings match the spec.
    pub(crate) async fn sync_workspace(
        &self,
        ws: &mut Workspace,
    ) -> Result<RemoteWorkspace, ReconcileError> {
        let remote = match self.find_remote_workspace(ws).await? {
            Some(remote) => remote,
            None => self.create_remote_workspace(ws).await?,
        };

        match &ws.status.workspace_id {
            None => {
                ws.status.workspace_id = Some(remote.id.clone());
                self.persist_status(ws).await?;
            }
            Some(recorded) if *recorded != remote.id => {
                tracing::warn!(
                    recorded = %recorded,
                    found = %remote.id,
                    "remote workspace id differs from the recorded one"
                );
            }
            Some(_) => {}
        }

        self.converge_settings(&ws.spec, remote).await
    }

    async fn create_remote_workspace(
        &self,
        ws: &Workspace,
    ) -> Result<RemoteWorkspace, ReconcileError> {
        let options = WorkspaceOptions {
            name: ws.meta.remote_workspace_name(),
            terraform_version: ws
                .spec
                .terraform_version
                .clone()
                .unwrap_or_else(|| self.config.default_terraform_version.clone()),
            auto_apply: true,
            vcs_repo: ws.spec.vcs.clone(),
        };
        let remote = self
            .platform
            .create_workspace(&ws.spec.organization, &options)
            .await?;
        tracing::info!(workspace_id = %remote.id, name = %remote.name, "created remote workspace");
        self.record(
            ws,
            Event::normal(
                Reason::WorkspaceCreated,
                format!("created workspace {} ({})", remote.name, remote.id),
            ),
        )
        .await;
        Ok(remote)
    }

    /// Converge SSH key, tool version and execution mode.
    ///
    /// Every setting is attempted even if an earlier one fails; the first
    /// failure is returned afterwards.
    async fn converge_settings(
        &self,
        spec: &WorkspaceSpec,
        mut remote: RemoteWorkspace,
    ) -> Result<RemoteWorkspace, ReconcileError> {
        let mut first_error = None;

        let outcome = self.converge_ssh_key(spec, &remote).await;
        absorb(outcome, "ssh_key", &mut remote, &mut first_error);

        let outcome = self.converge_terraform_version(spec, &remote).await;
        absorb(outcome, "terraform_version", &mut remote, &mut first_error);

        let outcome = self.converge_execution_mode(spec, &remote).await;
        absorb(outcome, "execution_mode", &mut remote, &mut first_error);

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(remote),
        }
    }

    async fn converge_ssh_key(&self, spec: &WorkspaceSpec, remote: &RemoteWorkspace) -> Converged {
        match (&spec.ssh_key_id, &remote.ssh_key_id) {
            (Some(wanted), current) if current.as_ref() != Some(wanted) => self
                .platform
                .assign_ssh_key(&remote.id, wanted)
                .await
                .map(Some),
            (None, Some(_)) => self.platform.unassign_ssh_key(&remote.id).await.map(Some),
            _ => Ok(None),
        }
    }

    /// Only an explicitly requested version is enforced.
    async fn converge_terraform_version(
        &self,
        spec: &WorkspaceSpec,
        remote: &RemoteWorkspace,
    ) -> Converged {
        match &spec.terraform_version {
            Some(wanted) if *wanted != remote.terraform_version => {
                let update = WorkspaceUpdate {
                    terraform_version: Some(wanted.clone()),
                    ..Default::default()
                };
                self.platform
                    .update_workspace(&remote.id, &update)
                    .await
                    .map(Some)
            }
            _ => Ok(None),
        }
    }

    async fn converge_execution_mode(
        &self,
        spec: &WorkspaceSpec,
        remote: &RemoteWorkspace,
    ) -> Converged {
        let wanted = ExecutionMode::for_agent_pool(spec.agent_pool_id.as_deref());
        if wanted == remote.execution_mode {
            return Ok(None);
        }
        let update = WorkspaceUpdate {
            execution_mode: Some(wanted),
            ..Default::default()
        };
        self.platform
            .update_workspace(&remote.id, &update)
            .await
            .map(Some)
    }
}
