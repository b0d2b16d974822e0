// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-visible events recorded against a workspace resource.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Normal,
    Warning,
}

/// Machine-readable cause of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reason {
    ValidationFailed,
    WorkspaceCreated,
    RunStarted,
    RunErrored,
    OutputsPublished,
    NotificationSkipped,
    DestroyStarted,
    WorkspaceDeleteFailed,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::ValidationFailed => "ValidationFailed",
            Reason::WorkspaceCreated => "WorkspaceCreated",
            Reason::RunStarted => "RunStarted",
            Reason::RunErrored => "RunErrored",
            Reason::OutputsPublished => "OutputsPublished",
            Reason::NotificationSkipped => "NotificationSkipped",
            Reason::DestroyStarted => "DestroyStarted",
            Reason::WorkspaceDeleteFailed => "WorkspaceDeleteFailed",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event attached to a workspace resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub reason: Reason,
    pub message: String,
}

impl Event {
    pub fn normal(reason: Reason, message: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Normal,
            reason,
            message: message.into(),
        }
    }

    pub fn warning(reason: Reason, message: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Warning,
            reason,
            message: message.into(),
        }
    }
}
