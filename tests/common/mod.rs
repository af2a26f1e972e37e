#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use fintel_core::{
    config::Config,
    core::{session::FinanceSession, time::FixedClock},
    domain::entry::EntryDraft,
    ledger::CollectionKind,
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a fresh base directory that is removed when the test binary exits.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Opens a JSON-backed session under `base` with the clock pinned to `today`.
pub fn open_session(base: &PathBuf, today: NaiveDate) -> FinanceSession {
    let storage = JsonStorage::new(Some(base.clone())).expect("create json storage backend");
    FinanceSession::open(Box::new(storage), Config::default(), Box::new(FixedClock::on(today)))
        .expect("open session")
}

/// Session holding the reference ledger: Income 1000 on 2024-01-05 and Needs 150 on 2024-01-10.
pub fn reference_session() -> FinanceSession {
    let base = temp_base();
    let mut session = open_session(&base, date(2024, 1, 12));
    session
        .add_entry(
            CollectionKind::Budget,
            &EntryDraft::new("Income", "1000", "Salary", "2024-01-05"),
        )
        .expect("add income");
    session
        .add_entry(
            CollectionKind::Budget,
            &EntryDraft::new("Needs", "150", "Rent", "2024-01-10"),
        )
        .expect("add needs");
    session
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
