// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification convergence
//!
//! Entries are matched by name. A mismatched entry is deleted and recreated.

use super::Reconciler;
use crate::error::ReconcileError;
use std::collections::{HashMap, HashSet};
use tfsync_adapters::{EventRecorder, MapStore, PlatformAdapter, ResourceStore, SecretSource};
use tfsync_core::{
    Event, NotificationConfig, Reason, RemoteWorkspace, UserId, Workspace,
};

impl<P, S, M, K, R> Reconciler<P, S, M, K, R>
where
    P: PlatformAdapter,
    S: ResourceStore,
    M: MapStore,
    K: SecretSource,
    R: EventRecorder,
{
    pub(crate) async fn sync_notifications(
        &self,
        ws: &Workspace,
        remote: &RemoteWorkspace,
    ) -> Result<(), ReconcileError> {
        let current = self.platform.list_notifications(&remote.id).await?;
        if current.is_empty() && ws.spec.notifications.is_empty() {
            return Ok(());
        }

        let wanted = self.resolve_notifications(ws).await?;
        let by_name: HashMap<&str, &NotificationConfig> =
            wanted.iter().map(|c| (c.name.as_str(), c)).collect();

        let mut in_place = HashSet::new();
        for existing in &current {
            let name = existing.config.name.as_str();
            match by_name.get(name) {
                Some(config) if existing.config.matches(config) && in_place.insert(name) => {
                    tracing::debug!(name, "notification up to date");
                }
                _ => {
                    self.platform.delete_notification(&existing.id).await?;
                    tracing::info!(name, "deleted notification");
                }
            }
        }

        for config in &wanted {
            if in_place.contains(config.name.as_str()) {
                continue;
            }
            self.platform.create_notification(&remote.id, config).await?;
            tracing::info!(name = %config.name, destination = %config.destination_type, "created notification");
        }
        Ok(())
    }

    /// Build remote configurations, resolving recipients to member user ids.
    async fn resolve_notifications(
        &self,
        ws: &Workspace,
    ) -> Result<Vec<NotificationConfig>, ReconcileError> {
        let desired = &ws.spec.notifications;
        let members = if desired.iter().any(|n| !n.recipients.is_empty()) {
            self.platform
                .list_organization_members(&ws.spec.organization)
                .await?
        } else {
            Vec::new()
        };
        let by_email: HashMap<String, &UserId> = members
            .iter()
            .map(|m| (m.email.to_lowercase(), &m.user_id))
            .collect();

        let mut configs = Vec::with_capacity(desired.len());
        for notification in desired {
            let mut resolved = notification.clone();
            resolved.recipients.clear();
            let mut user_ids = Vec::new();
            for email in &notification.recipients {
                match by_email.get(&email.to_lowercase()) {
                    Some(user_id) => {
                        resolved.recipients.push(email.clone());
                        user_ids.push((*user_id).clone());
                    }
                    None => {
                        tracing::warn!(notification = %notification.name, %email, "recipient is not an organization member");
                        self.record(
                            ws,
                            Event::warning(
                                Reason::NotificationSkipped,
                                format!(
                                    "recipient {email} of notification {} is not a member of {}",
                                    notification.name, ws.spec.organization
                                ),
                            ),
                        )
                        .await;
                    }
                }
            }
            configs.push(NotificationConfig::from_desired(&resolved, user_ids));
        }
        Ok(configs)
    }
}
