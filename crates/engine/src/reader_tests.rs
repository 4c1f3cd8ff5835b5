// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tofui_adapters::{FakeStore, StoreCall};
use tofui_core::test_support::{base_time, report_at, slot, test_key};
use tofui_core::{ReportKind, SlotState};

fn reader(store: &FakeStore) -> SlotStateReader<FakeStore> {
    SlotStateReader::new(store.clone(), Duration::from_secs(30))
}

fn seed(store: &FakeStore, key: &RotationKey, n: u8, minutes: i64) {
    let report = report_at(key, slot(n), base_time() + chrono::Duration::minutes(minutes));
    store.put(&key.slot_path(slot(n)), report.to_json().unwrap());
}

fn reads(store: &FakeStore) -> Vec<String> {
    store
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            StoreCall::Read { path } => Some(path),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn empty_store_is_vacant_after_reading_each_slot() {
    let store = FakeStore::new();
    let key = test_key();
    let occupancy = reader(&store).read(&key).await.unwrap();
    assert_eq!(occupancy, Occupancy::vacant());
    let expected: Vec<String> = SlotNumber::all().map(|s| key.slot_path(s)).collect();
    assert_eq!(reads(&store), expected);
    assert_eq!(store.calls().len(), 7);
}

#[tokio::test]
async fn reads_only_this_keys_slot_files() {
    let store = FakeStore::new();
    let key = test_key();
    let other = RotationKey::resolve("acme/infra", None, ReportKind::Test).unwrap();
    seed(&store, &key, 2, 0);
    seed(&store, &key, 5, 1);
    seed(&store, &other, 1, 2);
    store.put("reports/README.md", "not a slot");

    let occupancy = reader(&store).read(&key).await.unwrap();

    assert_eq!(occupancy.occupied_count(), 2);
    assert!(!occupancy.get(slot(2)).is_empty());
    assert!(!occupancy.get(slot(5)).is_empty());
    assert!(reads(&store).iter().all(|p| p.starts_with("reports/acme-infra-_root-build-")));
}

#[tokio::test]
async fn crowded_reports_directory_does_not_hide_slot_files() {
    let store = FakeStore::new();
    let key = test_key();
    for i in 0..1500 {
        store.put(&format!("reports/aaa-{i:04}-_root-build-001.json"), "{}");
    }
    for n in 1..=7 {
        seed(&store, &key, n, i64::from(n));
    }

    let occupancy = reader(&store).read(&key).await.unwrap();

    assert_eq!(occupancy.occupied_count(), 7);
    assert_eq!(store.calls().len(), 7);
}

#[tokio::test]
async fn records_version_and_last_modified() {
    let store = FakeStore::new();
    let key = test_key();
    seed(&store, &key, 1, 0);
    store.set_last_modified(&key.slot_path(slot(1)), base_time());

    let occupancy = reader(&store).read(&key).await.unwrap();
    let record = occupancy.get(slot(1));
    assert!(record.version.is_some());
    let SlotState::Occupied { last_modified, report } = &record.state else {
        panic!("slot 1 should be occupied");
    };
    assert_eq!(*last_modified, Some(base_time()));
    assert_eq!(report.slot_number, slot(1));
}

#[tokio::test]
async fn corrupt_file_reads_empty_but_keeps_version() {
    let store = FakeStore::new();
    let key = test_key();
    let version = store.put(&key.slot_path(slot(3)), "{ not json");

    let occupancy = reader(&store).read(&key).await.unwrap();
    let record = occupancy.get(slot(3));
    assert!(record.is_empty());
    assert_eq!(record.version, Some(version));
}

#[tokio::test]
async fn misplaced_report_reads_empty() {
    let store = FakeStore::new();
    let key = test_key();
    let report = report_at(&key, slot(6), base_time());
    let version = store.put(&key.slot_path(slot(4)), report.to_json().unwrap());

    let occupancy = reader(&store).read(&key).await.unwrap();
    assert!(occupancy.get(slot(4)).is_empty());
    assert_eq!(occupancy.get(slot(4)).version, Some(version));
    assert_eq!(occupancy.occupied_count(), 0);
}

#[test]
fn inspect_explains_mismatch() {
    let key = test_key();
    let report = report_at(&key, slot(6), base_time());
    let object = RemoteObject {
        content: report.to_json().unwrap(),
        version: tofui_core::ObjectVersion::new("v"),
        last_modified: None,
    };
    let (_, warning) = inspect(slot(4), "reports/x.json", object).unwrap_err();
    assert_eq!(warning.to_string(), "reports/x.json: report claims slot 6");
}

#[tokio::test]
async fn repeated_reads_agree() {
    let store = FakeStore::new();
    let key = test_key();
    for n in 1..=4 {
        seed(&store, &key, n, i64::from(n));
    }
    store.put(&key.slot_path(slot(7)), "garbage");

    let reader = reader(&store);
    let first = reader.read(&key).await.unwrap();
    let second = reader.read(&key).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn store_failures_propagate() {
    let store = FakeStore::new();
    store.fail_reads(1);
    let err = reader(&store).read(&test_key()).await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

#[tokio::test(start_paused = true)]
async fn hung_call_times_out_as_unavailable() {
    let result: Result<(), _> =
        within(Duration::from_secs(30), "reports", std::future::pending()).await;
    let err = result.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
    assert!(err.to_string().contains("timed out"));
}
