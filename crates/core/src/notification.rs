// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Webhook-style notification subscriptions on a workspace.
//!
//! Notifications are identified by name. A remote entry that differs from
//! its desired counterpart is replaced rather than patched.

use crate::id::{NotificationId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery channel of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DestinationType {
    #[default]
    Generic,
    Email,
    Slack,
    MicrosoftTeams,
}

impl fmt::Display for DestinationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DestinationType::Generic => "generic",
            DestinationType::Email => "email",
            DestinationType::Slack => "slack",
            DestinationType::MicrosoftTeams => "microsoft-teams",
        };
        f.write_str(s)
    }
}

/// A desired notification subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub name: String,
    #[serde(rename = "type", default)]
    pub destination_type: DestinationType,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub token: String,
    /// Run events that fire the notification, e.g. `run:completed`.
    #[serde(default)]
    pub triggers: Vec<String>,
    /// Email addresses of organization members to notify.
    #[serde(default)]
    pub recipients: Vec<String>,
}

/// Full attribute set of a notification configuration on the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub name: String,
    pub destination_type: DestinationType,
    pub enabled: bool,
    pub url: String,
    pub token: String,
    pub triggers: Vec<String>,
    pub email_addresses: Vec<String>,
    pub email_user_ids: Vec<UserId>,
}

impl NotificationConfig {
    /// Build the remote configuration for a desired notification.
    pub fn from_desired(desired: &Notification, email_user_ids: Vec<UserId>) -> Self {
        Self {
            name: desired.name.clone(),
            destination_type: desired.destination_type,
            enabled: desired.enabled,
            url: desired.url.clone(),
            token: desired.token.clone(),
            triggers: desired.triggers.clone(),
            email_addresses: desired.recipients.clone(),
            email_user_ids,
        }
    }

    /// Attribute equality with list fields compared as sets.
    pub fn matches(&self, other: &NotificationConfig) -> bool {
        self.name == other.name
            && self.token == other.token
            && self.url == other.url
            && self.destination_type == other.destination_type
            && self.enabled == other.enabled
            && same_members(&self.email_addresses, &other.email_addresses)
            && same_members(&self.triggers, &other.triggers)
            && same_members(&self.email_user_ids, &other.email_user_ids)
    }
}

fn same_members<T: Ord + Clone>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort();
    b.sort();
    a == b
}

/// A notification configuration as stored on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteNotification {
    pub id: NotificationId,
    #[serde(flatten)]
    pub config: NotificationConfig,
}

/// Organization membership entry used to resolve recipients to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMember {
    pub email: String,
    pub user_id: UserId,
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
