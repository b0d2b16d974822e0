// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn entry(key: &str, value: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(key.to_string(), value.to_string())])
}

#[tokio::test]
async fn upsert_replaces_contents() {
    let store = MemoryMapStore::new();
    let map = MapRef::new("default", "app-outputs");

    store.upsert(&map, entry("a", "1")).await.unwrap();
    store.upsert(&map, entry("b", "2")).await.unwrap();

    assert_eq!(store.get(&map).await.unwrap(), entry("b", "2"));
    assert_eq!(store.writes(), 2);
}

#[tokio::test]
async fn missing_map_is_not_found() {
    let store = MemoryMapStore::new();
    let map = MapRef::new("default", "gone");

    assert!(store.get(&map).await.unwrap_err().is_not_found());
    assert!(store.delete(&map).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn maps_are_namespaced() {
    let store = MemoryMapStore::new();
    store.upsert(&MapRef::new("a", "m"), entry("k", "a")).await.unwrap();
    store.upsert(&MapRef::new("b", "m"), entry("k", "b")).await.unwrap();

    store.delete(&MapRef::new("a", "m")).await.unwrap();

    assert!(store.snapshot(&MapRef::new("a", "m")).is_none());
    assert_eq!(store.snapshot(&MapRef::new("b", "m")), Some(entry("k", "b")));
}
