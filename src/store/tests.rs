// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StoreError, WriteDurability};

struct StoreTestCtx {
    tmp: TempDir,
    store: FileKeyValueStore,
}

impl StoreTestCtx {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(tmp.path().join("data"));
        Self { tmp, store }
    }
}

#[fixture]
fn ctx() -> StoreTestCtx {
    StoreTestCtx::new()
}

#[rstest]
#[tokio::test]
async fn get_missing_key_is_none(ctx: StoreTestCtx) {
    assert_eq!(ctx.store.get("quote_intake_v3").await.unwrap(), None);
}

#[rstest]
#[tokio::test]
async fn set_creates_data_dir_and_round_trips(ctx: StoreTestCtx) {
    ctx.store.set("quote_intake_v3", "{\"a\":1}").await.unwrap();

    let path = ctx.tmp.path().join("data").join("quote_intake_v3.json");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"a\":1}");
    assert_eq!(
        ctx.store.get("quote_intake_v3").await.unwrap().as_deref(),
        Some("{\"a\":1}")
    );
}

#[rstest]
#[tokio::test]
async fn set_replaces_and_leaves_no_temp_files(ctx: StoreTestCtx) {
    ctx.store.set("k", "first").await.unwrap();
    ctx.store.set("k", "second").await.unwrap();

    assert_eq!(ctx.store.get("k").await.unwrap().as_deref(), Some("second"));
    let names: Vec<String> = std::fs::read_dir(ctx.store.root())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["k.json".to_owned()]);
}

#[rstest]
#[tokio::test]
async fn durable_writes_round_trip(ctx: StoreTestCtx) {
    let store = ctx.store.clone().with_durability(WriteDurability::Durable);
    assert_eq!(store.durability(), WriteDurability::Durable);

    store.set("k", "v").await.unwrap();
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
}

#[rstest]
#[tokio::test]
async fn remove_is_idempotent(ctx: StoreTestCtx) {
    ctx.store.set("quote_intake_v2", "{}").await.unwrap();
    ctx.store.remove("quote_intake_v2").await.unwrap();
    ctx.store.remove("quote_intake_v2").await.unwrap();
    assert_eq!(ctx.store.get("quote_intake_v2").await.unwrap(), None);
}

#[rstest]
#[case("")]
#[case("../escape")]
#[case("a/b")]
#[case("dotted.key")]
#[tokio::test]
async fn invalid_keys_are_rejected(ctx: StoreTestCtx, #[case] key: &str) {
    let err = ctx.store.set(key, "{}").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidKey { .. }), "{err}");
    assert!(!ctx.tmp.path().join("escape.json").exists());
}

#[cfg(unix)]
#[rstest]
#[tokio::test]
async fn set_refuses_writing_through_symlink(ctx: StoreTestCtx) {
    use std::os::unix::fs::symlink;

    let outside = ctx.tmp.path().join("outside.json");
    std::fs::write(&outside, "keep").unwrap();
    std::fs::create_dir_all(ctx.store.root()).unwrap();
    symlink(&outside, ctx.store.root().join("k.json")).unwrap();

    let err = ctx.store.set("k", "overwrite").await.unwrap_err();
    assert!(matches!(err, StoreError::SymlinkRefused { .. }), "{err}");
    assert_eq!(std::fs::read_to_string(&outside).unwrap(), "keep");
}

#[tokio::test]
async fn memory_store_counts_writes_and_injects_failures() {
    let store = MemoryKeyValueStore::new().with_entry("seed", "x");
    let handle = store.clone();
    assert_eq!(handle.writes(), 0);

    store.set("k", "v").await.unwrap();
    assert_eq!(handle.writes(), 1);
    assert_eq!(handle.peek("k").as_deref(), Some("v"));

    handle.set_fail_writes(true);
    let err = store.set("k", "w").await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable { .. }));
    assert_eq!(handle.peek("k").as_deref(), Some("v"));
    assert_eq!(handle.writes(), 1);

    store.remove("seed").await.unwrap();
    assert_eq!(handle.keys(), vec!["k".to_owned()]);
}
