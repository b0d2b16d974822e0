// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the reconciler's external collaborators

pub mod maps;
pub mod platform;
pub mod recorder;
pub mod secrets;
pub mod store;
pub mod traced;

#[cfg(any(test, feature = "test-support"))]
pub mod test_logs;

pub use maps::{MapStore, MapStoreError, MemoryMapStore};
pub use platform::{PlatformAdapter, PlatformError, RunOptions};
pub use recorder::{EventRecorder, LogRecorder, NoOpRecorder, RecordError};
pub use secrets::{MountedSecrets, SecretError, SecretSource};
pub use store::{MemoryResourceStore, ResourceStore, StoreError};
pub use traced::TracedPlatform;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use platform::{FakePlatform, PlatformCall};
#[cfg(any(test, feature = "test-support"))]
pub use recorder::FakeRecorder;
#[cfg(any(test, feature = "test-support"))]
pub use secrets::FakeSecrets;
