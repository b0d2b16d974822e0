// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    plain = { "s3cret", "s3cret" },
    trailing_newline = { "s3cret\n", "s3cret" },
    crlf = { "s3cret\r\n", "s3cret" },
    only_one_newline_trimmed = { "s3cret\n\n", "s3cret\n" },
    inner_newline_kept = { "line1\nline2", "line1\nline2" },
)]
#[test_macro(tokio::test)]
async fn mounted_secret_trims_one_trailing_newline(contents: &str, expected: &str) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("token"), contents).unwrap();

    let value = MountedSecrets::new().read(dir.path(), "token").await.unwrap();
    assert_eq!(value, expected);
}

#[tokio::test]
async fn missing_secret_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = MountedSecrets::new().read(dir.path(), "absent").await.unwrap_err();
    assert!(matches!(err, SecretError::NotFound { ref key, .. } if key == "absent"));
}

#[parameterized(
    parent = { "../token" },
    nested = { "nested/token" },
    absolute = { "/etc/passwd" },
    backslash = { "..\\token" },
    dot_dot = { ".." },
    empty = { "" },
)]
#[test_macro(tokio::test)]
async fn mounted_secret_rejects_keys_outside_mount(key: &str) {
    let root = tempfile::tempdir().unwrap();
    let mount = root.path().join("mount");
    std::fs::create_dir_all(mount.join("nested")).unwrap();
    std::fs::write(root.path().join("token"), "outside").unwrap();
    std::fs::write(mount.join("nested/token"), "nested").unwrap();

    let err = MountedSecrets::new().read(&mount, key).await.unwrap_err();
    assert!(matches!(err, SecretError::InvalidKey(ref k) if k == key), "{err}");
}

#[tokio::test]
async fn exists_requires_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("file");
    std::fs::write(&file, "x").unwrap();
    let secrets = MountedSecrets::new();

    assert!(secrets.exists(dir.path()).await);
    assert!(!secrets.exists(&file).await);
    assert!(!secrets.exists(&dir.path().join("missing")).await);
}

#[tokio::test]
async fn fake_secrets_are_scoped_by_mount() {
    let secrets = FakeSecrets::new();
    secrets.set(Path::new("/a"), "token", "x");

    assert_eq!(secrets.read(Path::new("/a"), "token").await.unwrap(), "x");
    assert!(secrets.read(Path::new("/b"), "token").await.is_err());
    assert!(secrets.exists(Path::new("/a")).await);
    assert!(!secrets.exists(Path::new("/b")).await);
    assert_eq!(secrets.reads(), vec!["token", "token"]);
}
