// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration with environment overrides.

use std::path::PathBuf;
use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

fn parse_count(var: &str) -> Option<u32> {
    std::env::var(var).ok().and_then(|s| s.parse::<u32>().ok())
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.trim().is_empty())
}

/// Timing and placement knobs of the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Requeue delay while a run or upload is in flight (`TFSYNC_SHORT_REQUEUE_MS`).
    pub short_requeue: Duration,
    /// Requeue delay once converged (`TFSYNC_STEADY_REQUEUE_MS`).
    pub steady_requeue: Duration,
    /// Interval between destroy-run polls (`TFSYNC_DESTROY_POLL_MS`).
    pub destroy_poll_interval: Duration,
    /// Bound on the destroy-run wait; zero waits forever (`TFSYNC_DESTROY_TIMEOUT_MS`).
    pub destroy_timeout: Duration,
    /// Attempts to find a VCS-provided configuration version (`TFSYNC_VCS_RETRIES`).
    pub vcs_config_retries: u32,
    /// Delay between those attempts (`TFSYNC_VCS_RETRY_MS`).
    pub vcs_config_retry_delay: Duration,
    /// Tool version for newly created workspaces (`TFSYNC_TERRAFORM_VERSION`).
    pub default_terraform_version: String,
    /// Root of per-workspace configuration directories (`TFSYNC_WORK_DIR`).
    pub work_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            short_requeue: Duration::from_secs(10),
            steady_requeue: Duration::from_secs(60),
            destroy_poll_interval: Duration::from_secs(10),
            destroy_timeout: Duration::from_secs(30 * 60),
            vcs_config_retries: 10,
            vcs_config_retry_delay: Duration::from_secs(2),
            default_terraform_version: "latest".to_string(),
            work_dir: std::env::temp_dir().join("tfsync"),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any `TFSYNC_*` variables that are set and parse.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            short_requeue: parse_duration_ms("TFSYNC_SHORT_REQUEUE_MS")
                .unwrap_or(defaults.short_requeue),
            steady_requeue: parse_duration_ms("TFSYNC_STEADY_REQUEUE_MS")
                .unwrap_or(defaults.steady_requeue),
            destroy_poll_interval: parse_duration_ms("TFSYNC_DESTROY_POLL_MS")
                .unwrap_or(defaults.destroy_poll_interval),
            destroy_timeout: parse_duration_ms("TFSYNC_DESTROY_TIMEOUT_MS")
                .unwrap_or(defaults.destroy_timeout),
            vcs_config_retries: parse_count("TFSYNC_VCS_RETRIES")
                .unwrap_or(defaults.vcs_config_retries),
            vcs_config_retry_delay: parse_duration_ms("TFSYNC_VCS_RETRY_MS")
                .unwrap_or(defaults.vcs_config_retry_delay),
            default_terraform_version: non_empty("TFSYNC_TERRAFORM_VERSION")
                .unwrap_or(defaults.default_terraform_version),
            work_dir: non_empty("TFSYNC_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
        }
    }

    /// Whether the destroy wait is bounded.
    pub fn destroy_deadline(&self) -> Option<Duration> {
        (!self.destroy_timeout.is_zero()).then_some(self.destroy_timeout)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
