// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Secrets mounted as files, one file per key

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSecrets;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from secret lookups
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret {key} not found under {}", mount.display())]
    NotFound { mount: PathBuf, key: String },
    #[error("invalid secret key {0:?}: keys name a file directly under the mount")]
    InvalidKey(String),
    #[error("failed to read secret {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Adapter for reading sensitive values
#[async_trait]
pub trait SecretSource: Clone + Send + Sync + 'static {
    /// Read the plaintext of `key` under `mount`
    async fn read(&self, mount: &Path, key: &str) -> Result<String, SecretError>;

    /// Whether the mount is present
    async fn exists(&self, mount: &Path) -> bool;
}

/// Secrets read from a mounted directory
#[derive(Clone, Copy, Debug, Default)]
pub struct MountedSecrets;

impl MountedSecrets {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SecretSource for MountedSecrets {
    async fn read(&self, mount: &Path, key: &str) -> Result<String, SecretError> {
        if !is_plain_key(key) {
            return Err(SecretError::InvalidKey(key.to_string()));
        }
        let path = mount.join(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(mut value) => {
                // Secret files conventionally end with a single newline
                if value.ends_with('\n') {
                    value.pop();
                    if value.ends_with('\r') {
                        value.pop();
                    }
                }
                Ok(value)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SecretError::NotFound {
                mount: mount.to_path_buf(),
                key: key.to_string(),
            }),
            Err(source) => Err(SecretError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    async fn exists(&self, mount: &Path) -> bool {
        tokio::fs::metadata(mount)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }
}

/// A key must name one file inside the mount.
fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && !key.contains(['/', '\\'])
        && !Path::new(key).is_absolute()
}

#[cfg(test)]
#[path = "secrets_tests.rs"]
mod tests;
