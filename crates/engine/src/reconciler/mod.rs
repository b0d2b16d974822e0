// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciler for workspace resources
//!
//! One pass converges a single resource. Passes are idempotent: a second pass
//! without external drift makes no remote mutations.

mod deletion;
mod notifications;
mod outputs;
mod runs;
mod variables;
mod workspace;

pub use runs::ConfigSource;
pub use variables::{plan_variables, VariablePlan};

use crate::config::EngineConfig;
use crate::error::ReconcileError;
use runs::RunStart;
use std::time::Duration;
use tfsync_adapters::{EventRecorder, MapStore, PlatformAdapter, ResourceStore, SecretSource};
use tfsync_core::{Event, Reason, ResourceKey, Workspace, FINALIZER};
use tracing::Instrument;

/// When the caller should invoke the reconciler again for the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requeue {
    /// Nothing left to do until the resource changes.
    Done,
    /// Work was started that should be observed right away.
    Immediately,
    After(Duration),
}

/// Reconciler adapter dependencies
pub struct ReconcilerDeps<P, S, M, K, R> {
    pub platform: P,
    pub store: S,
    pub maps: M,
    pub secrets: K,
    pub recorder: R,
}

/// Converges declared workspaces against the remote platform
pub struct Reconciler<P, S, M, K, R> {
    pub(crate) platform: P,
    pub(crate) store: S,
    pub(crate) maps: M,
    pub(crate) secrets: K,
    pub(crate) recorder: R,
    pub(crate) config: EngineConfig,
}

impl<P, S, M, K, R> Reconciler<P, S, M, K, R>
where
    P: PlatformAdapter,
    S: ResourceStore,
    M: MapStore,
    K: SecretSource,
    R: EventRecorder,
{
    pub fn new(deps: ReconcilerDeps<P, S, M, K, R>, config: EngineConfig) -> Self {
        Self {
            platform: deps.platform,
            store: deps.store,
            maps: deps.maps,
            secrets: deps.secrets,
            recorder: deps.recorder,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one reconcile pass for `key`.
    ///
    /// Errors abort the pass; the caller is expected to retry.
    pub async fn reconcile(&self, key: &ResourceKey) -> Result<Requeue, ReconcileError> {
        let span = tracing::info_span!("reconcile", key = %key);
        async {
            let result = self.reconcile_pass(key).await;
            match &result {
                Ok(requeue) => tracing::debug!(?requeue, "pass complete"),
                Err(e) => tracing::warn!(error = %e, "pass failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn reconcile_pass(&self, key: &ResourceKey) -> Result<Requeue, ReconcileError> {
        let Some(mut ws) = self.store.get(key).await? else {
            tracing::debug!("resource not found, nothing to do");
            return Ok(Requeue::Done);
        };

        if ws.is_marked_for_deletion() {
            if ws.meta.has_finalizer(FINALIZER) {
                self.finalize(&mut ws).await?;
            }
            return Ok(Requeue::Done);
        }

        self.validate(&ws).await?;

        // The finalizer must be in place before a remote workspace can exist
        if !ws.meta.has_finalizer(FINALIZER) {
            ws = self.store.add_finalizer(&ws).await?;
            tracing::info!("finalizer added");
        }

        let remote = self.sync_workspace(&mut ws).await?;
        self.sync_notifications(&ws, &remote).await?;

        if let Some(requeue) = self.poll_run(&mut ws, &remote).await? {
            return Ok(requeue);
        }

        if ws.status.last_run_succeeded() {
            self.publish_outputs(&mut ws, &remote).await?;
        }

        let source = ConfigSource::for_workspace(&ws)?;
        let config_changed = match &source {
            Some(source) => self.config_drifted(&ws, source).await?,
            None => false,
        };
        let variables_changed = self.sync_variables(&ws, &remote).await?;

        let Some(source) = source else {
            return Ok(Requeue::After(self.config.steady_requeue));
        };

        let needs_run = config_changed
            || variables_changed
            || ws.status.run_id.is_none()
            || ws.status.config_version_id.is_some();
        if !needs_run {
            tracing::debug!("workspace converged");
            return Ok(Requeue::After(self.config.steady_requeue));
        }

        tracing::info!(config_changed, variables_changed, "starting run");
        let start = self
            .start_run(&mut ws, &remote, &source, config_changed)
            .await?;
        if config_changed && start.delivered_config() {
            self.store_config(&ws, &source).await?;
        }
        match start {
            RunStart::Started(_) => Ok(Requeue::Immediately),
            RunStart::Uploaded | RunStart::NotReady => {
                Ok(Requeue::After(self.config.short_requeue))
            }
        }
    }

    /// Check preconditions that make a pass meaningful.
    async fn validate(&self, ws: &Workspace) -> Result<(), ReconcileError> {
        let spec = &ws.spec;

        match self.platform.read_organization(&spec.organization).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                return self
                    .reject(ws, format!("organization {} not found", spec.organization))
                    .await;
            }
            Err(e) => return Err(e.into()),
        }

        if !spec.secrets_mount_path.as_os_str().is_empty()
            && !self.secrets.exists(&spec.secrets_mount_path).await
        {
            return self
                .reject(
                    ws,
                    format!(
                        "secrets mount {} does not exist",
                        spec.secrets_mount_path.display()
                    ),
                )
                .await;
        }

        match (&spec.module, &spec.vcs) {
            (Some(_), Some(_)) => {
                self.reject(ws, "module and vcs are mutually exclusive".to_string())
                    .await
            }
            (None, None) => {
                tracing::warn!("neither module nor vcs is set, skipping runs");
                self.record(
                    ws,
                    Event::warning(
                        Reason::ValidationFailed,
                        "neither module nor vcs is set; no runs will be started",
                    ),
                )
                .await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    async fn reject(&self, ws: &Workspace, message: String) -> Result<(), ReconcileError> {
        tracing::warn!(%message, "validation failed");
        self.record(ws, Event::warning(Reason::ValidationFailed, message.clone()))
            .await;
        Err(ReconcileError::Validation(message))
    }

    /// Record a user-visible event. Recording failures never fail the pass.
    pub(crate) async fn record(&self, ws: &Workspace, event: Event) {
        if let Err(e) = self.recorder.record(&ws.key(), &event).await {
            tracing::warn!(reason = %event.reason, error = %e, "failed to record event");
        }
    }

    /// Write `ws.status` and adopt the stored copy.
    pub(crate) async fn persist_status(&self, ws: &mut Workspace) -> Result<(), ReconcileError> {
        *ws = self.store.update_status(ws).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../reconciler_tests/mod.rs"]
mod tests;
