// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tfsync reconciliation engine

mod config;
mod error;
mod reconciler;
pub mod render;

pub use config::EngineConfig;
pub use error::ReconcileError;
pub use reconciler::{
    plan_variables, ConfigSource, Reconciler, ReconcilerDeps, Requeue, VariablePlan,
};

#[cfg(test)]
mod test_helpers;
