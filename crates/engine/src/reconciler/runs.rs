// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run lifecycle: configuration delivery, run start and polling
//!
//! At most one run is in flight per workspace. Module-backed workspaces
//! upload their rendered configuration first and start the run on a later
//! pass once the upload is processed. VCS-backed workspaces wait briefly for
//! the VCS integration to provide a configuration version.

use super::{Reconciler, Requeue};
use crate::error::ReconcileError;
use crate::render::{render_configuration, CONFIG_FILE};
use std::collections::BTreeMap;
use tfsync_adapters::{
    EventRecorder, MapStore, PlatformAdapter, ResourceStore, RunOptions, SecretSource,
};
use tfsync_core::{
    ConfigVersionId, ConfigVersionStatus, Event, MapRef, Reason, RemoteWorkspace, RunId,
    RunStatus, Workspace,
};

/// Key of the rendered text in the configuration map.
pub(crate) const CONFIG_KEY: &str = "terraform";

const RUN_MESSAGE: &str = "Triggered by tfsync";

/// How configuration reaches the platform for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Rendered module configuration uploaded by the reconciler.
    Module { text: String },
    /// Configuration fetched by the platform's VCS integration.
    Vcs,
}

impl ConfigSource {
    /// Select the source from the spec; `None` when neither is set.
    pub fn for_workspace(ws: &Workspace) -> Result<Option<Self>, hcl::Error> {
        match (&ws.spec.module, &ws.spec.vcs) {
            (Some(module), _) => Ok(Some(ConfigSource::Module {
                text: render_configuration(ws, module)?,
            })),
            (None, Some(_)) => Ok(Some(ConfigSource::Vcs)),
            (None, None) => Ok(None),
        }
    }
}

/// Outcome of an attempt to start a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RunStart {
    Started(RunId),
    /// Fresh configuration was uploaded; the run starts once it is processed.
    Uploaded,
    /// An earlier upload is still processing, or a run is in flight.
    NotReady,
}

impl RunStart {
    /// Whether the rendered configuration reached the platform.
    pub(crate) fn delivered_config(&self) -> bool {
        matches!(self, RunStart::Started(_) | RunStart::Uploaded)
    }
}

/// State of module configuration delivery.
enum ModuleConfig {
    Ready(ConfigVersionId),
    Uploaded,
    Processing,
}

/// Map holding the last rendered configuration of a workspace.
fn config_map(ws: &Workspace) -> MapRef {
    MapRef::new(&ws.meta.namespace, &ws.meta.name)
}

impl<P, S, M, K, R> Reconciler<P, S, M, K, R>
where
    P: PlatformAdapter,
    S: ResourceStore,
    M: MapStore,
    K: SecretSource,
    R: EventRecorder,
{
    /// Observe the workspace's current run.
    ///
    /// Returns a requeue while the run is pending so the pass stops early.
    pub(crate) async fn poll_run(
        &self,
        ws: &mut Workspace,
        remote: &RemoteWorkspace,
    ) -> Result<Option<Requeue>, ReconcileError> {
        // The platform's current run also covers runs started elsewhere
        let mut candidates: Vec<RunId> = remote.current_run.iter().cloned().collect();
        if let Some(id) = &ws.status.run_id {
            if !candidates.contains(id) {
                candidates.push(id.clone());
            }
        }

        let mut observed = None;
        for run_id in candidates {
            match self.platform.read_run(&run_id).await {
                Ok(run) => {
                    observed = Some(run);
                    break;
                }
                Err(e) if e.is_not_found() => {
                    tracing::warn!(run_id = %run_id, "run not found");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let Some(run) = observed else {
            // A vanished run can no longer block a new one
            if ws.status.run_id.is_some() || ws.status.run_status.is_some() {
                ws.status.run_id = None;
                ws.status.run_status = None;
                self.persist_status(ws).await?;
            }
            return Ok(None);
        };

        if ws.status.run_id.as_ref() != Some(&run.id)
            || ws.status.run_status.as_ref() != Some(&run.status)
        {
            tracing::info!(run_id = %run.id, status = %run.status, "run status changed");
            ws.status.run_id = Some(run.id.clone());
            ws.status.run_status = Some(run.status.clone());
            self.persist_status(ws).await?;

            if run.status == RunStatus::Errored {
                self.record(
                    ws,
                    Event::warning(Reason::RunErrored, format!("run {} errored", run.id)),
                )
                .await;
            }
        }

        if run.status.is_pending() {
            tracing::debug!(run_id = %run.id, status = %run.status, "run in flight");
            return Ok(Some(Requeue::After(self.config.short_requeue)));
        }
        Ok(None)
    }

    /// Whether the rendered configuration differs from the stored copy.
    /// VCS-backed configuration never drifts from the reconciler's view.
    pub(crate) async fn config_drifted(
        &self,
        ws: &Workspace,
        source: &ConfigSource,
    ) -> Result<bool, ReconcileError> {
        let ConfigSource::Module { text } = source else {
            return Ok(false);
        };
        let stored = match self.maps.get(&config_map(ws)).await {
            Ok(mut data) => data.remove(CONFIG_KEY),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e.into()),
        };
        let drifted = stored.as_deref() != Some(text.as_str());
        if drifted {
            tracing::info!("configuration changed");
        }
        Ok(drifted)
    }

    /// Remember the rendered configuration once a run for it is under way.
    pub(crate) async fn store_config(
        &self,
        ws: &Workspace,
        source: &ConfigSource,
    ) -> Result<(), ReconcileError> {
        if let ConfigSource::Module { text } = source {
            let data = BTreeMap::from([(CONFIG_KEY.to_string(), text.clone())]);
            self.maps.upsert(&config_map(ws), data).await?;
        }
        Ok(())
    }

    /// Start a run unless one is in flight or configuration is not ready.
    ///
    /// `config_changed` discards any configuration version still in flight,
    /// since it carries stale text.
    pub(crate) async fn start_run(
        &self,
        ws: &mut Workspace,
        remote: &RemoteWorkspace,
        source: &ConfigSource,
        config_changed: bool,
    ) -> Result<RunStart, ReconcileError> {
        if ws.status.is_run_pending() {
            tracing::debug!("run in flight, not starting another");
            return Ok(RunStart::NotReady);
        }

        let config_version_id = match source {
            ConfigSource::Module { text } => {
                match self
                    .prepare_module_config(ws, remote, text, config_changed)
                    .await?
                {
                    ModuleConfig::Ready(id) => Some(id),
                    ModuleConfig::Uploaded => return Ok(RunStart::Uploaded),
                    ModuleConfig::Processing => return Ok(RunStart::NotReady),
                }
            }
            ConfigSource::Vcs => {
                self.await_vcs_config(remote).await?;
                None
            }
        };

        let options = RunOptions {
            config_version_id,
            is_destroy: false,
            message: RUN_MESSAGE.to_string(),
        };
        let run = self.platform.create_run(&remote.id, &options).await?;

        ws.status.run_id = Some(run.id.clone());
        ws.status.run_status = Some(run.status.clone());
        ws.status.config_version_id = None;
        self.persist_status(ws).await?;

        tracing::info!(run_id = %run.id, "started run");
        self.record(
            ws,
            Event::normal(Reason::RunStarted, format!("started run {}", run.id)),
        )
        .await;
        Ok(RunStart::Started(run.id))
    }

    /// Returns the configuration version to run once its upload is processed.
    async fn prepare_module_config(
        &self,
        ws: &mut Workspace,
        remote: &RemoteWorkspace,
        text: &str,
        config_changed: bool,
    ) -> Result<ModuleConfig, ReconcileError> {
        if let (Some(id), false) = (ws.status.config_version_id.clone(), config_changed) {
            let version = match self.platform.read_configuration_version(&id).await {
                Ok(version) => Some(version),
                Err(e) if e.is_not_found() => None,
                Err(e) => return Err(e.into()),
            };
            match version.map(|v| v.status) {
                Some(ConfigVersionStatus::Uploaded) => return Ok(ModuleConfig::Ready(id)),
                Some(ConfigVersionStatus::Pending | ConfigVersionStatus::Fetching) => {
                    tracing::debug!(config_version_id = %id, "upload still processing");
                    return Ok(ModuleConfig::Processing);
                }
                Some(status) => {
                    tracing::warn!(config_version_id = %id, %status, "configuration version unusable, uploading again");
                }
                None => {
                    tracing::warn!(config_version_id = %id, "configuration version vanished, uploading again");
                }
            }
        }

        self.upload_config(ws, remote, text).await?;
        Ok(ModuleConfig::Uploaded)
    }

    async fn upload_config(
        &self,
        ws: &mut Workspace,
        remote: &RemoteWorkspace,
        text: &str,
    ) -> Result<(), ReconcileError> {
        let version = self
            .platform
            .create_configuration_version(&remote.id)
            .await?;

        let dir = self.config.work_dir.join(ws.meta.remote_workspace_name());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| ReconcileError::Io {
                path: dir.clone(),
                source,
            })?;
        let path = dir.join(CONFIG_FILE);
        tokio::fs::write(&path, text)
            .await
            .map_err(|source| ReconcileError::Io {
                path: path.clone(),
                source,
            })?;
        self.platform
            .upload_configuration(&version.upload_url, &dir)
            .await?;

        ws.status.config_version_id = Some(version.id.clone());
        self.persist_status(ws).await?;
        tracing::info!(config_version_id = %version.id, "uploaded configuration");
        Ok(())
    }

    /// Wait, bounded, for the VCS integration to produce a configuration version.
    async fn await_vcs_config(&self, remote: &RemoteWorkspace) -> Result<(), ReconcileError> {
        let attempts = self.config.vcs_config_retries.max(1);
        for attempt in 1..=attempts {
            let versions = self
                .platform
                .list_configuration_versions(&remote.id)
                .await?;
            if !versions.is_empty() {
                return Ok(());
            }
            tracing::debug!(attempt, attempts, "no configuration version yet");
            if attempt < attempts {
                tokio::time::sleep(self.config.vcs_config_retry_delay).await;
            }
        }
        Err(ReconcileError::ConfigVersionMissing(remote.id.clone()))
    }
}
