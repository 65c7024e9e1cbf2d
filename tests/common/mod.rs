#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use pocket_ledger::{
    core::{LedgerManager, LoadMetadata},
    storage::JsonStorage,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a manager backed by a unique, empty data directory.
pub fn setup_manager() -> (LedgerManager, PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let dir = temp.path().join("data");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let (manager, _) = open_manager(&dir);
    (manager, dir)
}

/// Opens (or reopens) a manager over `dir`.
pub fn open_manager(dir: &Path) -> (LedgerManager, LoadMetadata) {
    let storage = JsonStorage::new(Some(dir.to_path_buf())).expect("create json storage backend");
    LedgerManager::open(Box::new(storage))
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}
