// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tfsync-core: domain types shared by the workspace reconciler

pub mod event;
pub mod id;
pub mod notification;
pub mod output;
pub mod resource;
pub mod run;
pub mod state;
pub mod variable;
pub mod workspace;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use event::{Event, EventKind, Reason};
pub use id::{ConfigVersionId, NotificationId, RunId, SequentialIdGen, UserId, VariableId, WorkspaceId};
pub use notification::{
    DestinationType, Notification, NotificationConfig, OrganizationMember, RemoteNotification,
};
pub use output::{OutputType, OutputValue};
pub use resource::{ResourceKey, ResourceMeta, FINALIZER};
pub use run::{ConfigVersionStatus, ConfigurationVersion, Run, RunStatus};
pub use state::{parse_state_outputs, StateParseError};
pub use variable::{RemoteVariable, Variable, VariableCategory, VariableRequest};
pub use workspace::{
    ExecutionMode, MapRef, ModuleSource, Organization, OutputSelector, OutputStatus,
    RemoteWorkspace, VcsRepo, Workspace, WorkspaceOptions, WorkspaceSpec, WorkspaceStatus,
    WorkspaceUpdate,
};
