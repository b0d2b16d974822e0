// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output extraction and publishing

use super::Reconciler;
use crate::error::ReconcileError;
use std::collections::BTreeMap;
use tfsync_adapters::{EventRecorder, MapStore, PlatformAdapter, ResourceStore, SecretSource};
use tfsync_core::{parse_state_outputs, Event, MapRef, OutputStatus, Reason, RemoteWorkspace, Workspace};

/// Map the outputs of `ws` are published to.
pub(crate) fn outputs_map(ws: &Workspace) -> MapRef {
    let name = ws
        .spec
        .outputs_map
        .clone()
        .unwrap_or_else(|| format!("{}-outputs", ws.meta.name));
    MapRef::new(&ws.meta.namespace, name)
}

impl<P, S, M, K, R> Reconciler<P, S, M, K, R>
where
    P: PlatformAdapter,
    S: ResourceStore,
    M: MapStore,
    K: SecretSource,
    R: EventRecorder,
{
    /// Publish the outputs of the current state after a successful run.
    pub(crate) async fn publish_outputs(
        &self,
        ws: &mut Workspace,
        remote: &RemoteWorkspace,
    ) -> Result<(), ReconcileError> {
        let outputs = self.read_outputs(remote).await?;
        let target = outputs_map(ws);

        if ws.status.outputs == outputs && ws.status.outputs_map.as_ref() == Some(&target) {
            tracing::debug!(map = %target, "outputs unchanged");
            return Ok(());
        }

        if let Some(previous) = ws.status.outputs_map.clone().filter(|p| *p != target) {
            match self.maps.delete(&previous).await {
                Ok(()) => tracing::info!(map = %previous, "deleted previous outputs map"),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e.into()),
            }
        }

        let data: BTreeMap<String, String> = outputs
            .iter()
            .map(|o| (o.key.clone(), o.value.clone()))
            .collect();
        self.maps.upsert(&target, data).await?;

        let count = outputs.len();
        ws.status.outputs = outputs;
        ws.status.outputs_map = Some(target.clone());
        self.persist_status(ws).await?;

        tracing::info!(map = %target, count, "published outputs");
        self.record(
            ws,
            Event::normal(
                Reason::OutputsPublished,
                format!("published {count} outputs to {target}"),
            ),
        )
        .await;
        Ok(())
    }

    /// Stringified non-empty outputs of the current state, sorted by key.
    async fn read_outputs(
        &self,
        remote: &RemoteWorkspace,
    ) -> Result<Vec<OutputStatus>, ReconcileError> {
        let url = match self.platform.current_state_download_url(&remote.id).await {
            Ok(url) => url,
            Err(e) if e.is_not_found() => {
                tracing::debug!("no state version yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let state = self.platform.download_state(&url).await?;

        let mut outputs: Vec<OutputStatus> = parse_state_outputs(&state)?
            .into_iter()
            .map(|(key, value)| OutputStatus {
                key,
                value: value.to_output_string(),
            })
            .filter(|o| !o.value.is_empty())
            .collect();
        outputs.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(outputs)
    }
}
