#![allow(dead_code)]

use demand_tracker::Repository;
use demand_tracker::storage::{CsvStore, JsonStore, MemoryStore, RecordStore, SqliteStore};
use std::sync::Once;
use tempfile::TempDir;

pub mod cli;
pub mod fixtures;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        demand_tracker::logging::init_test_logging();
    });
}

pub fn memory_repo() -> Repository {
    init_test_logging();
    Repository::open(Box::new(MemoryStore::new())).expect("open memory repository")
}

/// One fresh store per on-disk backend, each rooted in its own subdirectory
/// of `dir`. The in-memory store is included last.
pub fn all_stores(dir: &TempDir) -> Vec<Box<dyn RecordStore>> {
    init_test_logging();
    vec![
        Box::new(CsvStore::new(dir.path().join("csv"))),
        Box::new(JsonStore::new(dir.path().join("json").join("demands.json"))),
        Box::new(
            SqliteStore::open(&dir.path().join("sqlite").join("demands.db"))
                .expect("open sqlite store"),
        ),
        Box::new(MemoryStore::new()),
    ]
}

/// A second handle on the same location as `store`, as a later process
/// would open it. `None` for the memory backend.
pub fn reopen(store: &dyn RecordStore, dir: &TempDir) -> Option<Box<dyn RecordStore>> {
    use demand_tracker::storage::Backend;
    match store.backend() {
        Backend::Csv => Some(Box::new(CsvStore::new(dir.path().join("csv")))),
        Backend::Json => Some(Box::new(JsonStore::new(
            dir.path().join("json").join("demands.json"),
        ))),
        Backend::Sqlite => Some(Box::new(
            SqliteStore::open(&dir.path().join("sqlite").join("demands.db"))
                .expect("reopen sqlite store"),
        )),
        Backend::Memory => None,
    }
}
