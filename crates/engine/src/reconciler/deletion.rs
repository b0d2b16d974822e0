// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deletion sequence: cancel, destroy, delete, release

use super::Reconciler;
use crate::error::ReconcileError;
use tfsync_adapters::{
    EventRecorder, MapStore, PlatformAdapter, ResourceStore, RunOptions, SecretSource,
};
use tfsync_core::{Event, Reason, RemoteWorkspace, RunId, RunStatus, Workspace, FINALIZER};

const CANCEL_COMMENT: &str = "Canceled by tfsync: workspace is being deleted";
const DESTROY_MESSAGE: &str = "Destroy triggered by tfsync before workspace deletion";

impl<P, S, M, K, R> Reconciler<P, S, M, K, R>
where
    P: PlatformAdapter,
    S: ResourceStore,
    M: MapStore,
    K: SecretSource,
    R: EventRecorder,
{
    /// Tear down the remote workspace, then release the resource.
    pub(crate) async fn finalize(&self, ws: &mut Workspace) -> Result<(), ReconcileError> {
        match self.find_remote_workspace(ws).await? {
            Some(remote) => self.tear_down(ws, &remote).await?,
            None => tracing::debug!("remote workspace already gone"),
        }

        if ws.meta.has_finalizer(FINALIZER) {
            *ws = self.store.remove_finalizer(ws).await?;
            tracing::info!("finalizer removed");
        }
        Ok(())
    }

    async fn tear_down(
        &self,
        ws: &Workspace,
        remote: &RemoteWorkspace,
    ) -> Result<(), ReconcileError> {
        let runs = self.platform.list_runs(&remote.id).await?;

        // A destroy run from an earlier pass is resumed, not canceled
        let mut destroy = None;
        for run in runs.iter().filter(|r| r.status.is_pending()) {
            if run.is_destroy {
                destroy = Some(run.id.clone());
                continue;
            }
            self.platform.force_cancel_run(&run.id, CANCEL_COMMENT).await?;
            tracing::info!(run_id = %run.id, status = %run.status, "canceled pending run");
        }

        let current = remote
            .current_run
            .as_ref()
            .and_then(|id| runs.iter().find(|r| &r.id == id));
        let already_destroyed =
            current.is_some_and(|r| r.is_destroy && r.status == RunStatus::Applied);

        if destroy.is_none() && remote.current_run.is_some() && !already_destroyed {
            destroy = Some(self.start_destroy(ws, remote).await?);
        }
        if let Some(run_id) = destroy {
            self.await_destroy(ws, &run_id).await?;
        }

        match self.platform.delete_workspace(&remote.id).await {
            Ok(()) => tracing::info!(workspace_id = %remote.id, "deleted remote workspace"),
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                tracing::warn!(workspace_id = %remote.id, error = %e, "failed to delete remote workspace");
                self.record(
                    ws,
                    Event::warning(
                        Reason::WorkspaceDeleteFailed,
                        format!("failed to delete workspace {}: {e}", remote.id),
                    ),
                )
                .await;
            }
        }
        Ok(())
    }

    async fn start_destroy(
        &self,
        ws: &Workspace,
        remote: &RemoteWorkspace,
    ) -> Result<RunId, ReconcileError> {
        let options = RunOptions {
            config_version_id: None,
            is_destroy: true,
            message: DESTROY_MESSAGE.to_string(),
        };
        let run = self.platform.create_run(&remote.id, &options).await?;
        tracing::info!(run_id = %run.id, "started destroy run");
        self.record(
            ws,
            Event::normal(Reason::DestroyStarted, format!("started destroy run {}", run.id)),
        )
        .await;
        Ok(run.id)
    }

    /// Poll a destroy run until it is terminal or the configured bound passes.
    async fn await_destroy(&self, ws: &Workspace, run_id: &RunId) -> Result<(), ReconcileError> {
        let started = tokio::time::Instant::now();
        loop {
            let run = self.platform.read_run(run_id).await?;
            match run.status {
                RunStatus::Errored => {
                    self.record(
                        ws,
                        Event::warning(
                            Reason::RunErrored,
                            format!("destroy run {run_id} errored"),
                        ),
                    )
                    .await;
                    return Err(ReconcileError::DestroyFailed(run_id.clone()));
                }
                status if status.is_terminal() => {
                    tracing::info!(run_id = %run_id, %status, "destroy run finished");
                    return Ok(());
                }
                status => tracing::debug!(run_id = %run_id, %status, "destroy run in progress"),
            }

            if let Some(timeout) = self.config.destroy_deadline() {
                if started.elapsed() >= timeout {
                    return Err(ReconcileError::DestroyTimeout {
                        run_id: run_id.clone(),
                        timeout,
                    });
                }
            }
            tokio::time::sleep(self.config.destroy_poll_interval).await;
        }
    }
}
