// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake platform adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{PlatformAdapter, PlatformError, RunOptions};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::Arc;
use tfsync_core::{
    ConfigVersionId, ConfigVersionStatus, ConfigurationVersion, ExecutionMode, NotificationConfig,
    NotificationId, Organization, OrganizationMember, RemoteNotification, RemoteVariable,
    RemoteWorkspace, Run, RunId, RunStatus, SequentialIdGen, UserId, VariableId, VariableRequest,
    WorkspaceId, WorkspaceOptions, WorkspaceUpdate,
};

/// Recorded platform call
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    ReadOrganization { name: String },
    ListOrganizationMembers { organization: String },
    ReadWorkspace { organization: String, name: String },
    CreateWorkspace { organization: String, options: WorkspaceOptions },
    UpdateWorkspace { id: WorkspaceId, update: WorkspaceUpdate },
    DeleteWorkspace { id: WorkspaceId },
    AssignSshKey { id: WorkspaceId, ssh_key_id: String },
    UnassignSshKey { id: WorkspaceId },
    ListVariables { id: WorkspaceId },
    CreateVariable { id: WorkspaceId, request: VariableRequest },
    UpdateVariable { id: WorkspaceId, variable_id: VariableId, request: VariableRequest },
    DeleteVariable { id: WorkspaceId, variable_id: VariableId },
    ListNotifications { id: WorkspaceId },
    CreateNotification { id: WorkspaceId, config: NotificationConfig },
    DeleteNotification { id: NotificationId },
    CreateConfigurationVersion { id: WorkspaceId },
    UploadConfiguration { upload_url: String },
    ReadConfigurationVersion { id: ConfigVersionId },
    ListConfigurationVersions { id: WorkspaceId },
    CreateRun { id: WorkspaceId, options: RunOptions },
    ReadRun { id: RunId },
    ListRuns { id: WorkspaceId },
    ForceCancelRun { id: RunId, comment: String },
    CurrentStateDownloadUrl { id: WorkspaceId },
    DownloadState { url: String },
}

impl PlatformCall {
    /// Whether the call changes remote state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            PlatformCall::CreateWorkspace { .. }
                | PlatformCall::UpdateWorkspace { .. }
                | PlatformCall::DeleteWorkspace { .. }
                | PlatformCall::AssignSshKey { .. }
                | PlatformCall::UnassignSshKey { .. }
                | PlatformCall::CreateVariable { .. }
                | PlatformCall::UpdateVariable { .. }
                | PlatformCall::DeleteVariable { .. }
                | PlatformCall::CreateNotification { .. }
                | PlatformCall::DeleteNotification { .. }
                | PlatformCall::CreateConfigurationVersion { .. }
                | PlatformCall::UploadConfiguration { .. }
                | PlatformCall::CreateRun { .. }
                | PlatformCall::ForceCancelRun { .. }
        )
    }
}

struct StoredVariable {
    remote: RemoteVariable,
    value: String,
}

struct FakePlatformState {
    ids: SequentialIdGen,
    organizations: HashMap<String, Vec<OrganizationMember>>,
    workspaces: BTreeMap<WorkspaceId, RemoteWorkspace>,
    variables: Vec<StoredVariable>,
    notifications: Vec<(WorkspaceId, RemoteNotification)>,
    config_versions: Vec<(WorkspaceId, ConfigurationVersion)>,
    uploads: HashMap<ConfigVersionId, String>,
    runs: Vec<(WorkspaceId, Run)>,
    run_scripts: HashMap<RunId, VecDeque<RunStatus>>,
    next_run_script: Option<Vec<RunStatus>>,
    states: HashMap<WorkspaceId, Vec<u8>>,
    auto_upload: bool,
    failures: HashSet<String>,
    calls: Vec<PlatformCall>,
}

impl FakePlatformState {
    fn check(&self, op: &str) -> Result<(), PlatformError> {
        if self.failures.contains(op) {
            return Err(PlatformError::Api {
                status: 500,
                message: format!("injected failure in {op}"),
            });
        }
        Ok(())
    }

    fn workspace_mut(&mut self, id: &WorkspaceId) -> Result<&mut RemoteWorkspace, PlatformError> {
        self.workspaces
            .get_mut(id)
            .ok_or_else(|| PlatformError::NotFound(format!("workspace {id}")))
    }

    fn remote_variable(stored: &StoredVariable) -> RemoteVariable {
        let mut remote = stored.remote.clone();
        remote.value = if remote.sensitive {
            None
        } else {
            Some(stored.value.clone())
        };
        remote
    }

    fn insert_run(&mut self, workspace: &WorkspaceId, run: Run, script: Option<Vec<RunStatus>>) {
        if let Some(script) = script {
            self.run_scripts.insert(run.id.clone(), script.into_iter().collect());
        }
        if let Some(ws) = self.workspaces.get_mut(workspace) {
            ws.current_run = Some(run.id.clone());
        }
        self.runs.push((workspace.clone(), run));
    }
}

/// Fake platform adapter for testing
///
/// Holds workspaces, variables, notifications, configuration versions and
/// runs in memory and records every call.
#[derive(Clone)]
pub struct FakePlatform {
    inner: Arc<Mutex<FakePlatformState>>,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakePlatformState {
                ids: SequentialIdGen::new(),
                organizations: HashMap::new(),
                workspaces: BTreeMap::new(),
                variables: Vec::new(),
                notifications: Vec::new(),
                config_versions: Vec::new(),
                uploads: HashMap::new(),
                runs: Vec::new(),
                run_scripts: HashMap::new(),
                next_run_script: None,
                states: HashMap::new(),
                auto_upload: false,
                failures: HashSet::new(),
                calls: Vec::new(),
            })),
        }
    }
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_organization(&self, name: &str) {
        self.inner
            .lock()
            .organizations
            .entry(name.to_string())
            .or_default();
    }

    pub fn add_member(&self, organization: &str, email: &str, user_id: &str) {
        self.inner
            .lock()
            .organizations
            .entry(organization.to_string())
            .or_default()
            .push(OrganizationMember {
                email: email.to_string(),
                user_id: UserId::new(user_id),
            });
    }

    /// Add a pre-existing workspace
    pub fn add_workspace(&self, organization: &str, name: &str) -> WorkspaceId {
        let mut inner = self.inner.lock();
        let id = WorkspaceId::new(inner.ids.next("ws"));
        inner.workspaces.insert(
            id.clone(),
            RemoteWorkspace {
                id: id.clone(),
                name: name.to_string(),
                organization: organization.to_string(),
                terraform_version: "1.5.7".to_string(),
                auto_apply: true,
                ssh_key_id: None,
                execution_mode: ExecutionMode::Remote,
                vcs_repo: None,
                current_run: None,
            },
        );
        id
    }

    /// Add a run that was started outside the reconciler
    pub fn add_run(&self, workspace: &WorkspaceId, status: RunStatus) -> RunId {
        let mut inner = self.inner.lock();
        let id = RunId::new(inner.ids.next("run"));
        let run = Run {
            id: id.clone(),
            status,
            is_destroy: false,
            config_version_id: None,
            message: "triggered externally".to_string(),
        };
        inner.insert_run(workspace, run, None);
        id
    }

    pub fn set_run_status(&self, id: &RunId, status: RunStatus) {
        let mut inner = self.inner.lock();
        inner.run_scripts.remove(id);
        if let Some((_, run)) = inner.runs.iter_mut().find(|(_, r)| &r.id == id) {
            run.status = status;
        }
    }

    /// Statuses reported by successive reads of the next created run.
    /// The last status sticks.
    pub fn script_next_run(&self, statuses: Vec<RunStatus>) {
        self.inner.lock().next_run_script = Some(statuses);
    }

    /// Add a configuration version, as a VCS integration would
    pub fn add_configuration_version(
        &self,
        workspace: &WorkspaceId,
        status: ConfigVersionStatus,
    ) -> ConfigVersionId {
        let mut inner = self.inner.lock();
        let id = ConfigVersionId::new(inner.ids.next("cv"));
        inner.config_versions.push((
            workspace.clone(),
            ConfigurationVersion {
                id: id.clone(),
                upload_url: format!("https://archivist.test/{id}"),
                status,
            },
        ));
        id
    }

    pub fn set_config_version_status(&self, id: &ConfigVersionId, status: ConfigVersionStatus) {
        let mut inner = self.inner.lock();
        if let Some((_, cv)) = inner.config_versions.iter_mut().find(|(_, cv)| &cv.id == id) {
            cv.status = status;
        }
    }

    /// Mark configuration versions uploaded as soon as their upload completes
    pub fn set_auto_upload(&self, enabled: bool) {
        self.inner.lock().auto_upload = enabled;
    }

    /// Set the current state document of a workspace
    pub fn set_state(&self, workspace: &WorkspaceId, state: &serde_json::Value) {
        let bytes = state.to_string().into_bytes();
        self.inner.lock().states.insert(workspace.clone(), bytes);
    }

    /// Make every call of the named operation fail with a server error
    pub fn fail(&self, op: &str) {
        self.inner.lock().failures.insert(op.to_string());
    }

    pub fn clear_failures(&self) {
        self.inner.lock().failures.clear();
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.inner.lock().calls.clone()
    }

    /// Get recorded calls that changed remote state
    pub fn mutations(&self) -> Vec<PlatformCall> {
        self.calls().into_iter().filter(|c| c.is_mutation()).collect()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    pub fn workspace(&self, id: &WorkspaceId) -> Option<RemoteWorkspace> {
        self.inner.lock().workspaces.get(id).cloned()
    }

    pub fn workspace_by_name(&self, name: &str) -> Option<RemoteWorkspace> {
        self.inner
            .lock()
            .workspaces
            .values()
            .find(|ws| ws.name == name)
            .cloned()
    }

    /// Variables of a workspace with their stored values, sensitive included
    pub fn variables(&self, workspace: &WorkspaceId) -> Vec<(String, String, bool)> {
        self.inner
            .lock()
            .variables
            .iter()
            .filter(|v| &v.remote.workspace_id == workspace)
            .map(|v| (v.remote.key.clone(), v.value.clone(), v.remote.sensitive))
            .collect()
    }

    /// Seed a remote variable
    pub fn add_variable(&self, workspace: &WorkspaceId, key: &str, value: &str, sensitive: bool) {
        let mut inner = self.inner.lock();
        let id = VariableId::new(inner.ids.next("var"));
        inner.variables.push(StoredVariable {
            remote: RemoteVariable {
                id,
                workspace_id: workspace.clone(),
                key: key.to_string(),
                value: None,
                sensitive,
                hcl: false,
                category: Default::default(),
            },
            value: value.to_string(),
        });
    }

    pub fn notifications(&self, workspace: &WorkspaceId) -> Vec<RemoteNotification> {
        self.inner
            .lock()
            .notifications
            .iter()
            .filter(|(ws, _)| ws == workspace)
            .map(|(_, n)| n.clone())
            .collect()
    }

    /// Seed a remote notification
    pub fn add_notification(&self, workspace: &WorkspaceId, config: NotificationConfig) {
        let mut inner = self.inner.lock();
        let id = NotificationId::new(inner.ids.next("nc"));
        inner
            .notifications
            .push((workspace.clone(), RemoteNotification { id, config }));
    }

    pub fn runs(&self, workspace: &WorkspaceId) -> Vec<Run> {
        self.inner
            .lock()
            .runs
            .iter()
            .filter(|(ws, _)| ws == workspace)
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn config_versions(&self, workspace: &WorkspaceId) -> Vec<ConfigurationVersion> {
        self.inner
            .lock()
            .config_versions
            .iter()
            .filter(|(ws, _)| ws == workspace)
            .map(|(_, cv)| cv.clone())
            .collect()
    }

    /// Configuration text uploaded for a configuration version
    pub fn uploaded_config(&self, id: &ConfigVersionId) -> Option<String> {
        self.inner.lock().uploads.get(id).cloned()
    }
}

#[async_trait]
impl PlatformAdapter for FakePlatform {
    async fn read_organization(&self, name: &str) -> Result<Organization, PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::ReadOrganization {
            name: name.to_string(),
        });
        inner.check("read_organization")?;
        if inner.organizations.contains_key(name) {
            Ok(Organization {
                name: name.to_string(),
                email: format!("admin@{name}.test"),
            })
        } else {
            Err(PlatformError::NotFound(format!("organization {name}")))
        }
    }

    async fn list_organization_members(
        &self,
        organization: &str,
    ) -> Result<Vec<OrganizationMember>, PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::ListOrganizationMembers {
            organization: organization.to_string(),
        });
        inner.check("list_organization_members")?;
        inner
            .organizations
            .get(organization)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound(format!("organization {organization}")))
    }

    async fn read_workspace(
        &self,
        organization: &str,
        name: &str,
    ) -> Result<RemoteWorkspace, PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::ReadWorkspace {
            organization: organization.to_string(),
            name: name.to_string(),
        });
        inner.check("read_workspace")?;
        inner
            .workspaces
            .values()
            .find(|ws| ws.organization == organization && ws.name == name)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound(format!("workspace {organization}/{name}")))
    }

    async fn create_workspace(
        &self,
        organization: &str,
        options: &WorkspaceOptions,
    ) -> Result<RemoteWorkspace, PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::CreateWorkspace {
            organization: organization.to_string(),
            options: options.clone(),
        });
        inner.check("create_workspace")?;
        let id = WorkspaceId::new(inner.ids.next("ws"));
        let ws = RemoteWorkspace {
            id: id.clone(),
            name: options.name.clone(),
            organization: organization.to_string(),
            terraform_version: options.terraform_version.clone(),
            auto_apply: options.auto_apply,
            ssh_key_id: None,
            execution_mode: ExecutionMode::Remote,
            vcs_repo: options.vcs_repo.clone(),
            current_run: None,
        };
        inner.workspaces.insert(id, ws.clone());
        Ok(ws)
    }

    async fn update_workspace(
        &self,
        id: &WorkspaceId,
        update: &WorkspaceUpdate,
    ) -> Result<RemoteWorkspace, PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::UpdateWorkspace {
            id: id.clone(),
            update: update.clone(),
        });
        inner.check("update_workspace")?;
        let ws = inner.workspace_mut(id)?;
        if let Some(version) = &update.terraform_version {
            ws.terraform_version = version.clone();
        }
        if let Some(mode) = &update.execution_mode {
            ws.execution_mode = mode.clone();
        }
        Ok(ws.clone())
    }

    async fn delete_workspace(&self, id: &WorkspaceId) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::DeleteWorkspace { id: id.clone() });
        inner.check("delete_workspace")?;
        if inner.workspaces.remove(id).is_none() {
            return Err(PlatformError::NotFound(format!("workspace {id}")));
        }
        inner.variables.retain(|v| &v.remote.workspace_id != id);
        inner.notifications.retain(|(ws, _)| ws != id);
        Ok(())
    }

    async fn assign_ssh_key(
        &self,
        id: &WorkspaceId,
        ssh_key_id: &str,
    ) -> Result<RemoteWorkspace, PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::AssignSshKey {
            id: id.clone(),
            ssh_key_id: ssh_key_id.to_string(),
        });
        inner.check("assign_ssh_key")?;
        let ws = inner.workspace_mut(id)?;
        ws.ssh_key_id = Some(ssh_key_id.to_string());
        Ok(ws.clone())
    }

    async fn unassign_ssh_key(&self, id: &WorkspaceId) -> Result<RemoteWorkspace, PlatformError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(PlatformCall::UnassignSshKey { id: id.clone() });
        inner.check("unassign_ssh_key")?;
        let ws = inner.workspace_mut(id)?;
        ws.ssh_key_id = None;
        Ok(ws.clone())
    }

    async fn list_variables(&self, id: &WorkspaceId) -> Result<Vec<RemoteVariable>, PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::ListVariables { id: id.clone() });
        inner.check("list_variables")?;
        Ok(inner
            .variables
            .iter()
            .filter(|v| &v.remote.workspace_id == id)
            .map(FakePlatformState::remote_variable)
            .collect())
    }

    async fn create_variable(
        &self,
        id: &WorkspaceId,
        request: &VariableRequest,
    ) -> Result<RemoteVariable, PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::CreateVariable {
            id: id.clone(),
            request: request.clone(),
        });
        inner.check("create_variable")?;
        let variable_id = VariableId::new(inner.ids.next("var"));
        let stored = StoredVariable {
            remote: RemoteVariable {
                id: variable_id,
                workspace_id: id.clone(),
                key: request.key.clone(),
                value: None,
                sensitive: request.sensitive,
                hcl: request.hcl,
                category: request.category,
            },
            value: request.value.clone(),
        };
        let remote = FakePlatformState::remote_variable(&stored);
        inner.variables.push(stored);
        Ok(remote)
    }

    async fn update_variable(
        &self,
        id: &WorkspaceId,
        variable_id: &VariableId,
        request: &VariableRequest,
    ) -> Result<RemoteVariable, PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::UpdateVariable {
            id: id.clone(),
            variable_id: variable_id.clone(),
            request: request.clone(),
        });
        inner.check("update_variable")?;
        let stored = inner
            .variables
            .iter_mut()
            .find(|v| &v.remote.id == variable_id)
            .ok_or_else(|| PlatformError::NotFound(format!("variable {variable_id}")))?;
        stored.remote.key = request.key.clone();
        stored.remote.sensitive = request.sensitive;
        stored.remote.hcl = request.hcl;
        stored.remote.category = request.category;
        stored.value = request.value.clone();
        Ok(FakePlatformState::remote_variable(stored))
    }

    async fn delete_variable(
        &self,
        id: &WorkspaceId,
        variable_id: &VariableId,
    ) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::DeleteVariable {
            id: id.clone(),
            variable_id: variable_id.clone(),
        });
        inner.check("delete_variable")?;
        inner.variables.retain(|v| &v.remote.id != variable_id);
        Ok(())
    }

    async fn list_notifications(
        &self,
        id: &WorkspaceId,
    ) -> Result<Vec<RemoteNotification>, PlatformError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(PlatformCall::ListNotifications { id: id.clone() });
        inner.check("list_notifications")?;
        Ok(inner
            .notifications
            .iter()
            .filter(|(ws, _)| ws == id)
            .map(|(_, n)| n.clone())
            .collect())
    }

    async fn create_notification(
        &self,
        id: &WorkspaceId,
        config: &NotificationConfig,
    ) -> Result<RemoteNotification, PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::CreateNotification {
            id: id.clone(),
            config: config.clone(),
        });
        inner.check("create_notification")?;
        let notification = RemoteNotification {
            id: NotificationId::new(inner.ids.next("nc")),
            config: config.clone(),
        };
        inner.notifications.push((id.clone(), notification.clone()));
        Ok(notification)
    }

    async fn delete_notification(&self, id: &NotificationId) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(PlatformCall::DeleteNotification { id: id.clone() });
        inner.check("delete_notification")?;
        inner.notifications.retain(|(_, n)| &n.id != id);
        Ok(())
    }

    async fn create_configuration_version(
        &self,
        id: &WorkspaceId,
    ) -> Result<ConfigurationVersion, PlatformError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(PlatformCall::CreateConfigurationVersion { id: id.clone() });
        inner.check("create_configuration_version")?;
        inner.workspace_mut(id)?;
        let cv_id = ConfigVersionId::new(inner.ids.next("cv"));
        let cv = ConfigurationVersion {
            upload_url: format!("https://archivist.test/{cv_id}"),
            id: cv_id,
            status: ConfigVersionStatus::Pending,
        };
        inner.config_versions.push((id.clone(), cv.clone()));
        Ok(cv)
    }

    async fn upload_configuration(
        &self,
        upload_url: &str,
        path: &Path,
    ) -> Result<(), PlatformError> {
        let text = std::fs::read_to_string(path.join("main.tf"))
            .map_err(|e| PlatformError::Transport(format!("read {}: {e}", path.display())))?;
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::UploadConfiguration {
            upload_url: upload_url.to_string(),
        });
        inner.check("upload_configuration")?;
        let auto_upload = inner.auto_upload;
        let cv = inner
            .config_versions
            .iter_mut()
            .map(|(_, cv)| cv)
            .find(|cv| cv.upload_url == upload_url)
            .ok_or_else(|| PlatformError::NotFound(format!("upload url {upload_url}")))?;
        if auto_upload {
            cv.status = ConfigVersionStatus::Uploaded;
        }
        let cv_id = cv.id.clone();
        inner.uploads.insert(cv_id, text);
        Ok(())
    }

    async fn read_configuration_version(
        &self,
        id: &ConfigVersionId,
    ) -> Result<ConfigurationVersion, PlatformError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(PlatformCall::ReadConfigurationVersion { id: id.clone() });
        inner.check("read_configuration_version")?;
        inner
            .config_versions
            .iter()
            .map(|(_, cv)| cv)
            .find(|cv| &cv.id == id)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound(format!("configuration version {id}")))
    }

    async fn list_configuration_versions(
        &self,
        id: &WorkspaceId,
    ) -> Result<Vec<ConfigurationVersion>, PlatformError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(PlatformCall::ListConfigurationVersions { id: id.clone() });
        inner.check("list_configuration_versions")?;
        Ok(inner
            .config_versions
            .iter()
            .filter(|(ws, _)| ws == id)
            .map(|(_, cv)| cv.clone())
            .collect())
    }

    async fn create_run(
        &self,
        id: &WorkspaceId,
        options: &RunOptions,
    ) -> Result<Run, PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::CreateRun {
            id: id.clone(),
            options: options.clone(),
        });
        inner.check("create_run")?;
        inner.workspace_mut(id)?;
        let script = inner.next_run_script.take();
        let status = script
            .as_ref()
            .and_then(|s| s.first().cloned())
            .unwrap_or(RunStatus::Pending);
        let run = Run {
            id: RunId::new(inner.ids.next("run")),
            status,
            is_destroy: options.is_destroy,
            config_version_id: options.config_version_id.clone(),
            message: options.message.clone(),
        };
        inner.insert_run(id, run.clone(), script);
        Ok(run)
    }

    async fn read_run(&self, id: &RunId) -> Result<Run, PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::ReadRun { id: id.clone() });
        inner.check("read_run")?;
        let next = match inner.run_scripts.get_mut(id) {
            Some(script) if script.len() > 1 => {
                script.pop_front();
                script.front().cloned()
            }
            Some(script) => script.front().cloned(),
            None => None,
        };
        let run = inner
            .runs
            .iter_mut()
            .map(|(_, r)| r)
            .find(|r| &r.id == id)
            .ok_or_else(|| PlatformError::NotFound(format!("run {id}")))?;
        if let Some(status) = next {
            run.status = status;
        }
        Ok(run.clone())
    }

    async fn list_runs(&self, id: &WorkspaceId) -> Result<Vec<Run>, PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::ListRuns { id: id.clone() });
        inner.check("list_runs")?;
        Ok(inner
            .runs
            .iter()
            .filter(|(ws, _)| ws == id)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn force_cancel_run(&self, id: &RunId, comment: &str) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::ForceCancelRun {
            id: id.clone(),
            comment: comment.to_string(),
        });
        inner.check("force_cancel_run")?;
        inner.run_scripts.remove(id);
        let run = inner
            .runs
            .iter_mut()
            .map(|(_, r)| r)
            .find(|r| &r.id == id)
            .ok_or_else(|| PlatformError::NotFound(format!("run {id}")))?;
        run.status = RunStatus::ForceCanceled;
        Ok(())
    }

    async fn current_state_download_url(&self, id: &WorkspaceId) -> Result<String, PlatformError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(PlatformCall::CurrentStateDownloadUrl { id: id.clone() });
        inner.check("current_state_download_url")?;
        if inner.states.contains_key(id) {
            Ok(format!("https://archivist.test/state/{id}"))
        } else {
            Err(PlatformError::NotFound(format!("state version of {id}")))
        }
    }

    async fn download_state(&self, url: &str) -> Result<Vec<u8>, PlatformError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PlatformCall::DownloadState {
            url: url.to_string(),
        });
        inner.check("download_state")?;
        let id = url
            .strip_prefix("https://archivist.test/state/")
            .map(WorkspaceId::new)
            .ok_or_else(|| PlatformError::NotFound(format!("state at {url}")))?;
        inner
            .states
            .get(&id)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound(format!("state at {url}")))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
