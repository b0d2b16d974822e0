// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability of platform calls

use crate::platform::{PlatformAdapter, PlatformError, RunOptions};
use async_trait::async_trait;
use std::future::Future;
use std::path::Path;
use tfsync_core::{
    ConfigVersionId, ConfigurationVersion, NotificationConfig, NotificationId, Organization,
    OrganizationMember, RemoteNotification, RemoteVariable, RemoteWorkspace, Run, RunId,
    VariableId, VariableRequest, WorkspaceId, WorkspaceOptions, WorkspaceUpdate,
};
use tracing::{Instrument, Span};

/// Whether a call changes remote state; mutations log at info, reads at debug.
#[derive(Clone, Copy)]
enum Kind {
    Read,
    Mutation,
}

async fn observe<T, F>(span: Span, kind: Kind, call: F) -> Result<T, PlatformError>
where
    F: Future<Output = Result<T, PlatformError>>,
{
    async move {
        let start = std::time::Instant::now();
        let result = call.await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        match (&result, kind) {
            (Ok(_), Kind::Mutation) => tracing::info!(elapsed_ms, "completed"),
            (Ok(_), Kind::Read) => tracing::debug!(elapsed_ms, "completed"),
            (Err(e), _) if e.is_not_found() => tracing::debug!(elapsed_ms, "not found"),
            (Err(e), _) => tracing::error!(elapsed_ms, error = %e, "failed"),
        }
        result
    }
    .instrument(span)
    .await
}

/// Wrapper that adds tracing to any PlatformAdapter
///
/// Variable values are never logged; only key, category and sensitivity.
#[derive(Clone)]
pub struct TracedPlatform<P> {
    inner: P,
}

impl<P> TracedPlatform<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: PlatformAdapter> PlatformAdapter for TracedPlatform<P> {
    async fn read_organization(&self, name: &str) -> Result<Organization, PlatformError> {
        let span = tracing::debug_span!("platform.read_organization", name);
        observe(span, Kind::Read, self.inner.read_organization(name)).await
    }

    async fn list_organization_members(
        &self,
        organization: &str,
    ) -> Result<Vec<OrganizationMember>, PlatformError> {
        let span = tracing::debug_span!("platform.list_organization_members", organization);
        let result = observe(
            span,
            Kind::Read,
            self.inner.list_organization_members(organization),
        )
        .await;
        tracing::trace!(count = result.as_ref().map(Vec::len).ok(), "members listed");
        result
    }

    async fn read_workspace(
        &self,
        organization: &str,
        name: &str,
    ) -> Result<RemoteWorkspace, PlatformError> {
        let span = tracing::debug_span!("platform.read_workspace", organization, name);
        observe(span, Kind::Read, self.inner.read_workspace(organization, name)).await
    }

    async fn create_workspace(
        &self,
        organization: &str,
        options: &WorkspaceOptions,
    ) -> Result<RemoteWorkspace, PlatformError> {
        let span = tracing::info_span!(
            "platform.create_workspace",
            organization,
            name = %options.name,
            terraform_version = %options.terraform_version,
        );
        observe(
            span,
            Kind::Mutation,
            self.inner.create_workspace(organization, options),
        )
        .await
    }

    async fn update_workspace(
        &self,
        id: &WorkspaceId,
        update: &WorkspaceUpdate,
    ) -> Result<RemoteWorkspace, PlatformError> {
        let span = tracing::info_span!(
            "platform.update_workspace",
            workspace_id = %id,
            terraform_version = ?update.terraform_version,
            execution_mode = ?update.execution_mode,
        );
        observe(span, Kind::Mutation, self.inner.update_workspace(id, update)).await
    }

    async fn delete_workspace(&self, id: &WorkspaceId) -> Result<(), PlatformError> {
        let span = tracing::info_span!("platform.delete_workspace", workspace_id = %id);
        observe(span, Kind::Mutation, self.inner.delete_workspace(id)).await
    }

    async fn assign_ssh_key(
        &self,
        id: &WorkspaceId,
        ssh_key_id: &str,
    ) -> Result<RemoteWorkspace, PlatformError> {
        let span = tracing::info_span!("platform.assign_ssh_key", workspace_id = %id, ssh_key_id);
        observe(span, Kind::Mutation, self.inner.assign_ssh_key(id, ssh_key_id)).await
    }

    async fn unassign_ssh_key(&self, id: &WorkspaceId) -> Result<RemoteWorkspace, PlatformError> {
        let span = tracing::info_span!("platform.unassign_ssh_key", workspace_id = %id);
        observe(span, Kind::Mutation, self.inner.unassign_ssh_key(id)).await
    }

    async fn list_variables(&self, id: &WorkspaceId) -> Result<Vec<RemoteVariable>, PlatformError> {
        let span = tracing::debug_span!("platform.list_variables", workspace_id = %id);
        observe(span, Kind::Read, self.inner.list_variables(id)).await
    }

    async fn create_variable(
        &self,
        id: &WorkspaceId,
        request: &VariableRequest,
    ) -> Result<RemoteVariable, PlatformError> {
        let span = tracing::info_span!(
            "platform.create_variable",
            workspace_id = %id,
            key = %request.key,
            category = %request.category,
            sensitive = request.sensitive,
        );
        observe(span, Kind::Mutation, self.inner.create_variable(id, request)).await
    }

    async fn update_variable(
        &self,
        id: &WorkspaceId,
        variable_id: &VariableId,
        request: &VariableRequest,
    ) -> Result<RemoteVariable, PlatformError> {
        let span = tracing::info_span!(
            "platform.update_variable",
            workspace_id = %id,
            variable_id = %variable_id,
            key = %request.key,
            category = %request.category,
            sensitive = request.sensitive,
        );
        observe(
            span,
            Kind::Mutation,
            self.inner.update_variable(id, variable_id, request),
        )
        .await
    }

    async fn delete_variable(
        &self,
        id: &WorkspaceId,
        variable_id: &VariableId,
    ) -> Result<(), PlatformError> {
        let span = tracing::info_span!(
            "platform.delete_variable",
            workspace_id = %id,
            variable_id = %variable_id,
        );
        observe(span, Kind::Mutation, self.inner.delete_variable(id, variable_id)).await
    }

    async fn list_notifications(
        &self,
        id: &WorkspaceId,
    ) -> Result<Vec<RemoteNotification>, PlatformError> {
        let span = tracing::debug_span!("platform.list_notifications", workspace_id = %id);
        observe(span, Kind::Read, self.inner.list_notifications(id)).await
    }

    async fn create_notification(
        &self,
        id: &WorkspaceId,
        config: &NotificationConfig,
    ) -> Result<RemoteNotification, PlatformError> {
        let span = tracing::info_span!(
            "platform.create_notification",
            workspace_id = %id,
            name = %config.name,
            destination = %config.destination_type,
        );
        observe(span, Kind::Mutation, self.inner.create_notification(id, config)).await
    }

    async fn delete_notification(&self, id: &NotificationId) -> Result<(), PlatformError> {
        let span = tracing::info_span!("platform.delete_notification", notification_id = %id);
        observe(span, Kind::Mutation, self.inner.delete_notification(id)).await
    }

    async fn create_configuration_version(
        &self,
        id: &WorkspaceId,
    ) -> Result<ConfigurationVersion, PlatformError> {
        let span = tracing::info_span!("platform.create_configuration_version", workspace_id = %id);
        observe(span, Kind::Mutation, self.inner.create_configuration_version(id)).await
    }

    async fn upload_configuration(
        &self,
        upload_url: &str,
        path: &Path,
    ) -> Result<(), PlatformError> {
        let span = tracing::info_span!("platform.upload_configuration", path = %path.display());
        observe(
            span,
            Kind::Mutation,
            self.inner.upload_configuration(upload_url, path),
        )
        .await
    }

    async fn read_configuration_version(
        &self,
        id: &ConfigVersionId,
    ) -> Result<ConfigurationVersion, PlatformError> {
        let span = tracing::debug_span!("platform.read_configuration_version", config_version_id = %id);
        observe(span, Kind::Read, self.inner.read_configuration_version(id)).await
    }

    async fn list_configuration_versions(
        &self,
        id: &WorkspaceId,
    ) -> Result<Vec<ConfigurationVersion>, PlatformError> {
        let span = tracing::debug_span!("platform.list_configuration_versions", workspace_id = %id);
        observe(span, Kind::Read, self.inner.list_configuration_versions(id)).await
    }

    async fn create_run(
        &self,
        id: &WorkspaceId,
        options: &RunOptions,
    ) -> Result<Run, PlatformError> {
        let span = tracing::info_span!(
            "platform.create_run",
            workspace_id = %id,
            is_destroy = options.is_destroy,
            config_version_id = ?options.config_version_id,
        );
        observe(span, Kind::Mutation, self.inner.create_run(id, options)).await
    }

    async fn read_run(&self, id: &RunId) -> Result<Run, PlatformError> {
        let span = tracing::debug_span!("platform.read_run", run_id = %id);
        let result = observe(span, Kind::Read, self.inner.read_run(id)).await;
        if let Ok(run) = &result {
            tracing::trace!(run_id = %id, status = %run.status, "run read");
        }
        result
    }

    async fn list_runs(&self, id: &WorkspaceId) -> Result<Vec<Run>, PlatformError> {
        let span = tracing::debug_span!("platform.list_runs", workspace_id = %id);
        observe(span, Kind::Read, self.inner.list_runs(id)).await
    }

    async fn force_cancel_run(&self, id: &RunId, comment: &str) -> Result<(), PlatformError> {
        let span = tracing::info_span!("platform.force_cancel_run", run_id = %id);
        observe(span, Kind::Mutation, self.inner.force_cancel_run(id, comment)).await
    }

    async fn current_state_download_url(&self, id: &WorkspaceId) -> Result<String, PlatformError> {
        let span = tracing::debug_span!("platform.current_state_download_url", workspace_id = %id);
        observe(span, Kind::Read, self.inner.current_state_download_url(id)).await
    }

    async fn download_state(&self, url: &str) -> Result<Vec<u8>, PlatformError> {
        let span = tracing::debug_span!("platform.download_state");
        let result = observe(span, Kind::Read, self.inner.download_state(url)).await;
        tracing::trace!(bytes = result.as_ref().map(Vec::len).ok(), "state downloaded");
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
