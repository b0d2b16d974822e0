// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    pending              = { RunStatus::Pending,            false },
    planning             = { RunStatus::Planning,           false },
    applying             = { RunStatus::Applying,           false },
    apply_queued         = { RunStatus::ApplyQueued,        false },
    unknown              = { RunStatus::Unknown("post_plan_running".to_string()), false },
    planned_and_finished = { RunStatus::PlannedAndFinished, true },
    applied              = { RunStatus::Applied,            true },
    errored              = { RunStatus::Errored,            true },
    canceled             = { RunStatus::Canceled,           true },
    force_canceled       = { RunStatus::ForceCanceled,      true },
    discarded            = { RunStatus::Discarded,          true },
)]
fn run_status_partition(status: RunStatus, terminal: bool) {
    assert_eq!(status.is_terminal(), terminal);
    assert_eq!(status.is_pending(), !terminal);
}

#[test]
fn run_status_string_matches_wire_form() {
    for status in [
        RunStatus::Pending,
        RunStatus::PlannedAndFinished,
        RunStatus::PolicyChecked,
        RunStatus::ForceCanceled,
    ] {
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, format!("\"{}\"", status));
    }
}

#[test]
fn unrecognized_run_status_is_pending() {
    let status: RunStatus = serde_json::from_str("\"post_plan_running\"").unwrap();
    assert_eq!(status, RunStatus::Unknown("post_plan_running".to_string()));
    assert!(status.is_pending());
}

#[test]
fn unrecognized_run_status_keeps_platform_string() {
    let status: RunStatus = serde_json::from_str("\"post_plan_awaiting_decision\"").unwrap();

    assert_eq!(status.to_string(), "post_plan_awaiting_decision");
    assert_eq!(
        serde_json::to_string(&status).unwrap(),
        "\"post_plan_awaiting_decision\""
    );
}

#[test]
fn config_version_status_display() {
    assert_eq!(ConfigVersionStatus::Uploaded.to_string(), "uploaded");
    assert_eq!(ConfigVersionStatus::Pending.to_string(), "pending");
    let parsed: ConfigVersionStatus = serde_json::from_str("\"archived\"").unwrap();
    assert_eq!(parsed, ConfigVersionStatus::Archived);
}
