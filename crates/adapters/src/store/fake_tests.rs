// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn seeded_files_are_readable() {
    let store = FakeStore::new();
    let version = store.put("reports/a.json", "hello");
    store.put("reports/nested/b.json", "x");
    store.put("other/c.json", "y");

    let object = store.read("reports/a.json").await.unwrap().unwrap();
    assert_eq!(object.content, b"hello");
    assert_eq!(object.version, version);
    assert_eq!(store.paths(), vec!["other/c.json", "reports/a.json", "reports/nested/b.json"]);
}

#[tokio::test]
async fn conditional_write_checks_version() {
    let store = FakeStore::new();
    let v1 = store.put("reports/a.json", "one");
    store.put("reports/a.json", "two");

    let err = store
        .write_if("reports/a.json", b"three", &Precondition::Matches(v1), "")
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(store.get("reports/a.json").unwrap(), b"two");
}

#[tokio::test]
async fn injected_failures_are_consumed() {
    let store = FakeStore::new();
    store.fail_reads(1);
    store.fail_writes(1);
    store.conflict_writes(1);

    assert!(matches!(store.read("a").await, Err(StoreError::Unavailable(_))));
    assert!(store.read("a").await.is_ok());

    let absent = Precondition::Absent;
    let write = || store.write_if("a", b"x", &absent, "");
    assert!(matches!(write().await, Err(StoreError::Unavailable(_))));
    assert!(matches!(write().await, Err(StoreError::Conflict(_))));
    assert!(write().await.is_ok());
    assert_eq!(store.write_attempts(), 3);
}

#[tokio::test]
async fn raced_write_lands_first() {
    let store = FakeStore::new();
    store.race_next_write("a", "theirs");

    let err = store.write_if("a", b"ours", &Precondition::Absent, "").await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(store.get("a").unwrap(), b"theirs");
}

#[tokio::test]
async fn rejection_and_permanent_conflict() {
    let store = FakeStore::new();
    store.always_conflict();
    for _ in 0..3 {
        assert!(store.write_if("a", b"x", &Precondition::Absent, "").await.unwrap_err().is_conflict());
    }

    let store = FakeStore::new();
    store.reject_writes("404 Not Found");
    let err = store.write_if("a", b"x", &Precondition::Absent, "").await.unwrap_err();
    assert_eq!(err, StoreError::Rejected("404 Not Found".into()));
}

#[tokio::test]
async fn calls_are_recorded_in_order() {
    let store = FakeStore::new();
    let _ = store.read("reports/a.json").await;
    let _ = store.write_if("reports/a.json", b"x", &Precondition::Absent, "add a").await;
    assert_eq!(
        store.calls(),
        vec![
            StoreCall::Read { path: "reports/a.json".into() },
            StoreCall::Write {
                path: "reports/a.json".into(),
                precondition: Precondition::Absent,
                message: "add a".into(),
            },
        ]
    );
}
