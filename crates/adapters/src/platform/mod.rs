// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote execution platform adapter

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePlatform, PlatformCall};

use async_trait::async_trait;
use std::path::Path;
use tfsync_core::{
    ConfigVersionId, ConfigurationVersion, NotificationConfig, NotificationId, Organization,
    OrganizationMember, RemoteNotification, RemoteVariable, RemoteWorkspace, Run, RunId,
    VariableId, VariableRequest, WorkspaceId, WorkspaceOptions, WorkspaceUpdate,
};
use thiserror::Error;

/// Errors from platform operations
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("platform returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
}

impl PlatformError {
    /// Not-found is a branch condition for callers, not a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlatformError::NotFound(_))
    }
}

/// Parameters of a new run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Configuration version to run; `None` lets the platform pick the latest.
    pub config_version_id: Option<ConfigVersionId>,
    pub is_destroy: bool,
    pub message: String,
}

/// Adapter for the remote execution platform API.
///
/// Timeouts and retries of individual calls belong to the implementation.
#[async_trait]
pub trait PlatformAdapter: Clone + Send + Sync + 'static {
    async fn read_organization(&self, name: &str) -> Result<Organization, PlatformError>;

    async fn list_organization_members(
        &self,
        organization: &str,
    ) -> Result<Vec<OrganizationMember>, PlatformError>;

    /// Read a workspace by organization and name
    async fn read_workspace(
        &self,
        organization: &str,
        name: &str,
    ) -> Result<RemoteWorkspace, PlatformError>;

    async fn create_workspace(
        &self,
        organization: &str,
        options: &WorkspaceOptions,
    ) -> Result<RemoteWorkspace, PlatformError>;

    async fn update_workspace(
        &self,
        id: &WorkspaceId,
        update: &WorkspaceUpdate,
    ) -> Result<RemoteWorkspace, PlatformError>;

    async fn delete_workspace(&self, id: &WorkspaceId) -> Result<(), PlatformError>;

    async fn assign_ssh_key(
        &self,
        id: &WorkspaceId,
        ssh_key_id: &str,
    ) -> Result<RemoteWorkspace, PlatformError>;

    async fn unassign_ssh_key(&self, id: &WorkspaceId) -> Result<RemoteWorkspace, PlatformError>;

    async fn list_variables(&self, id: &WorkspaceId) -> Result<Vec<RemoteVariable>, PlatformError>;

    async fn create_variable(
        &self,
        id: &WorkspaceId,
        request: &VariableRequest,
    ) -> Result<RemoteVariable, PlatformError>;

    async fn update_variable(
        &self,
        id: &WorkspaceId,
        variable_id: &VariableId,
        request: &VariableRequest,
    ) -> Result<RemoteVariable, PlatformError>;

    async fn delete_variable(
        &self,
        id: &WorkspaceId,
        variable_id: &VariableId,
    ) -> Result<(), PlatformError>;

    async fn list_notifications(
        &self,
        id: &WorkspaceId,
    ) -> Result<Vec<RemoteNotification>, PlatformError>;

    async fn create_notification(
        &self,
        id: &WorkspaceId,
        config: &NotificationConfig,
    ) -> Result<RemoteNotification, PlatformError>;

    async fn delete_notification(&self, id: &NotificationId) -> Result<(), PlatformError>;

    async fn create_configuration_version(
        &self,
        id: &WorkspaceId,
    ) -> Result<ConfigurationVersion, PlatformError>;

    /// Upload the configuration directory at `path` to a configuration
    /// version's upload URL
    async fn upload_configuration(&self, upload_url: &str, path: &Path)
        -> Result<(), PlatformError>;

    async fn read_configuration_version(
        &self,
        id: &ConfigVersionId,
    ) -> Result<ConfigurationVersion, PlatformError>;

    async fn list_configuration_versions(
        &self,
        id: &WorkspaceId,
    ) -> Result<Vec<ConfigurationVersion>, PlatformError>;

    async fn create_run(&self, id: &WorkspaceId, options: &RunOptions)
        -> Result<Run, PlatformError>;

    async fn read_run(&self, id: &RunId) -> Result<Run, PlatformError>;

    async fn list_runs(&self, id: &WorkspaceId) -> Result<Vec<Run>, PlatformError>;

    async fn force_cancel_run(&self, id: &RunId, comment: &str) -> Result<(), PlatformError>;

    /// Download URL of the workspace's current state version
    async fn current_state_download_url(&self, id: &WorkspaceId) -> Result<String, PlatformError>;

    async fn download_state(&self, url: &str) -> Result<Vec<u8>, PlatformError>;
}
