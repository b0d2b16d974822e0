// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runs and configuration versions.
//!
//! A run is one provisioning job executed by the platform. Statuses split into
//! pending (the platform may still move the run) and terminal.

use crate::id::{ConfigVersionId, RunId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a remote run.
///
/// Serialized as the platform's status string. Strings this build does not
/// know are kept verbatim so the observed value is never lost.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunStatus {
    Pending,
    Fetching,
    PlanQueued,
    Planning,
    Planned,
    CostEstimating,
    CostEstimated,
    PolicyChecking,
    PolicyChecked,
    Confirmed,
    ApplyQueued,
    Applying,
    PlannedAndFinished,
    Applied,
    Errored,
    Canceled,
    ForceCanceled,
    Discarded,
    /// Status string this build does not know; treated as pending.
    Unknown(String),
}

impl RunStatus {
    /// Whether the platform is done with the run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::PlannedAndFinished
                | RunStatus::Applied
                | RunStatus::Errored
                | RunStatus::Canceled
                | RunStatus::ForceCanceled
                | RunStatus::Discarded
        )
    }

    pub fn is_pending(&self) -> bool {
        !self.is_terminal()
    }

    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Fetching => "fetching",
            RunStatus::PlanQueued => "plan_queued",
            RunStatus::Planning => "planning",
            RunStatus::Planned => "planned",
            RunStatus::CostEstimating => "cost_estimating",
            RunStatus::CostEstimated => "cost_estimated",
            RunStatus::PolicyChecking => "policy_checking",
            RunStatus::PolicyChecked => "policy_checked",
            RunStatus::Confirmed => "confirmed",
            RunStatus::ApplyQueued => "apply_queued",
            RunStatus::Applying => "applying",
            RunStatus::PlannedAndFinished => "planned_and_finished",
            RunStatus::Applied => "applied",
            RunStatus::Errored => "errored",
            RunStatus::Canceled => "canceled",
            RunStatus::ForceCanceled => "force_canceled",
            RunStatus::Discarded => "discarded",
            RunStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for RunStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => RunStatus::Pending,
            "fetching" => RunStatus::Fetching,
            "plan_queued" => RunStatus::PlanQueued,
            "planning" => RunStatus::Planning,
            "planned" => RunStatus::Planned,
            "cost_estimating" => RunStatus::CostEstimating,
            "cost_estimated" => RunStatus::CostEstimated,
            "policy_checking" => RunStatus::PolicyChecking,
            "policy_checked" => RunStatus::PolicyChecked,
            "confirmed" => RunStatus::Confirmed,
            "apply_queued" => RunStatus::ApplyQueued,
            "applying" => RunStatus::Applying,
            "planned_and_finished" => RunStatus::PlannedAndFinished,
            "applied" => RunStatus::Applied,
            "errored" => RunStatus::Errored,
            "canceled" => RunStatus::Canceled,
            "force_canceled" => RunStatus::ForceCanceled,
            "discarded" => RunStatus::Discarded,
            _ => RunStatus::Unknown(raw),
        }
    }
}

impl From<RunStatus> for String {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub id: RunId,
    pub status: RunStatus,
    #[serde(default)]
    pub is_destroy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_version_id: Option<ConfigVersionId>,
    #[serde(default)]
    pub message: String,
}

/// Status of an uploaded configuration snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigVersionStatus {
    Pending,
    Fetching,
    Uploaded,
    Errored,
    Archived,
}

impl fmt::Display for ConfigVersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConfigVersionStatus::Pending => "pending",
            ConfigVersionStatus::Fetching => "fetching",
            ConfigVersionStatus::Uploaded => "uploaded",
            ConfigVersionStatus::Errored => "errored",
            ConfigVersionStatus::Archived => "archived",
        };
        f.write_str(s)
    }
}

/// An immutable configuration snapshot a run can reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationVersion {
    pub id: ConfigVersionId,
    pub upload_url: String,
    pub status: ConfigVersionStatus,
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
