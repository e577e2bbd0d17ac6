//! Persistence round trips across backends and through CSV export.

mod common;

use common::fixtures::sample_records;
use common::{all_stores, reopen};
use demand_tracker::DemandError;
use demand_tracker::export::{ExportFormat, export_to_path};
use demand_tracker::model::Records;
use demand_tracker::storage::{CsvStore, JsonStore, RecordStore, SqliteStore};
use std::fs;
use tempfile::TempDir;

#[test]
fn missing_locations_load_as_empty() {
    let dir = TempDir::new().unwrap();
    for store in all_stores(&dir) {
        assert_eq!(store.load().unwrap(), Records::default(), "{}", store.backend());
    }
}

#[test]
fn save_then_load_returns_the_same_records() {
    let dir = TempDir::new().unwrap();
    for mut store in all_stores(&dir) {
        let records = sample_records();
        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), records, "{}", store.backend());

        if let Some(fresh) = reopen(store.as_ref(), &dir) {
            assert_eq!(fresh.load().unwrap(), records, "{} (reopened)", store.backend());
        }
    }
}

#[test]
fn load_preserves_save_order_when_ids_are_out_of_order() {
    let dir = TempDir::new().unwrap();
    for mut store in all_stores(&dir) {
        let mut records = sample_records();
        records.demands.reverse();
        records.clients.reverse();
        records.team_members.reverse();
        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), records, "{}", store.backend());

        if let Some(fresh) = reopen(store.as_ref(), &dir) {
            assert_eq!(fresh.load().unwrap(), records, "{} (reopened)", store.backend());
        }
    }
}

#[test]
fn save_of_load_is_idempotent() {
    let dir = TempDir::new().unwrap();
    for mut store in all_stores(&dir) {
        store.save(&sample_records()).unwrap();

        let first = store.load().unwrap();
        store.save(&first).unwrap();
        let second = store.load().unwrap();
        store.save(&second).unwrap();

        assert_eq!(first, second, "{}", store.backend());
        assert_eq!(store.load().unwrap(), second, "{}", store.backend());
    }
}

#[test]
fn file_stores_write_byte_identical_output_on_resave() {
    let dir = TempDir::new().unwrap();
    let csv_dir = dir.path().join("csv");
    let json_path = dir.path().join("demands.json");

    let mut csv = CsvStore::new(&csv_dir);
    let mut json = JsonStore::new(&json_path);
    csv.save(&sample_records()).unwrap();
    json.save(&sample_records()).unwrap();

    let csv_before = fs::read(csv_dir.join("demands.csv")).unwrap();
    let json_before = fs::read(&json_path).unwrap();

    csv.save(&csv.load().unwrap()).unwrap();
    json.save(&json.load().unwrap()).unwrap();

    assert_eq!(fs::read(csv_dir.join("demands.csv")).unwrap(), csv_before);
    assert_eq!(fs::read(&json_path).unwrap(), json_before);
}

#[test]
fn atomic_saves_leave_no_temp_files() {
    let dir = TempDir::new().unwrap();
    let csv_dir = dir.path().join("csv");
    CsvStore::new(&csv_dir).save(&sample_records()).unwrap();

    let mut names: Vec<String> = fs::read_dir(&csv_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["clients.csv", "demands.csv", "team_members.csv"]);
}

#[test]
fn exported_csv_loads_back_through_the_csv_store() {
    let dir = TempDir::new().unwrap();
    let records = sample_records();
    let store_dir = dir.path().join("imported");
    fs::create_dir_all(&store_dir).unwrap();

    let result = export_to_path(
        &records.demands,
        ExportFormat::Csv,
        &store_dir.join("demands.csv"),
    )
    .unwrap();
    assert_eq!(result.exported_count, records.demands.len());

    let loaded = CsvStore::new(&store_dir).load().unwrap();
    assert_eq!(loaded.demands.len(), records.demands.len());
    for (position, (got, want)) in loaded.demands.iter().zip(&records.demands).enumerate() {
        assert_eq!(got.id, i64::try_from(position).unwrap() + 1);
        assert_eq!(got.fields(), want.fields());
        assert!(got.created_at.is_none());
    }
    assert!(loaded.clients.is_empty());
}

#[test]
fn corrupt_json_reports_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("demands.json");
    fs::write(&path, "{\n  \"demands\": [\n    {\"id\": 1,\n").unwrap();

    let err = JsonStore::new(&path).load().unwrap_err();
    match err {
        DemandError::Corrupt { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected Corrupt, got {other:?}"),
    }
}

#[test]
fn sqlite_row_level_changes_match_snapshot_saves() {
    use demand_tracker::Repository;
    use demand_tracker::model::{DemandFields, Priority, Status};

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("demands.db");
    let json_path = dir.path().join("demands.json");

    let mut via_rows = Repository::open(Box::new(SqliteStore::open(&db_path).unwrap())).unwrap();
    let mut via_snapshot = Repository::open(Box::new(JsonStore::new(&json_path))).unwrap();

    for repo in [&mut via_rows, &mut via_snapshot] {
        for description in ["um", "dois", "três"] {
            repo.create_demand(DemandFields {
                team_member: "Ana".to_string(),
                client: "Acme".to_string(),
                description: description.to_string(),
                priority: Priority::Medium,
                status: Status::NotStarted,
            })
            .unwrap();
        }
        repo.delete_demand(2).unwrap();
        repo.create_client("Acme").unwrap();
    }

    let rows = SqliteStore::open(&db_path).unwrap().load().unwrap();
    let snapshot = JsonStore::new(&json_path).load().unwrap();
    let strip = |records: Records| -> Vec<(i64, DemandFields)> {
        records.demands.iter().map(|d| (d.id, d.fields())).collect()
    };
    assert_eq!(strip(rows.clone()), strip(snapshot.clone()));
    assert_eq!(rows.clients, snapshot.clients);
}
