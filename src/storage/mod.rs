pub mod json_backend;
pub mod memory;

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    domain::entry::{LedgerEntry, TypePolicy},
    errors::LedgerError,
    ledger::{CollectionKind, EntryCollection},
};

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over stores that keep one named text blob per collection.
pub trait StorageBackend: Send + Sync {
    /// Returns the blob stored under `key`, or `None` when nothing was saved yet.
    fn load_blob(&self, key: &str) -> Result<Option<String>>;
    fn save_blob(&self, key: &str, data: &str) -> Result<()>;

    /// Reads and sanitizes a collection. Missing or corrupted blobs load as empty.
    fn load_collection(&self, kind: CollectionKind) -> Result<(EntryCollection, LoadReport)> {
        let raw = match self.load_blob(kind.storage_key()) {
            Err(LedgerError::Encoding(err)) => {
                warn!(collection = %kind, error = %err, "stored collection is not text; resetting");
                return Ok(reset_collection(kind, "could not be decoded"));
            }
            other => other?,
        };
        Ok(match raw {
            Some(raw) => decode_collection(kind, &raw),
            None => (EntryCollection::new(kind), LoadReport::new(kind)),
        })
    }

    fn save_collection(&self, collection: &EntryCollection) -> Result<()> {
        let json = serde_json::to_string_pretty(collection.entries())?;
        self.save_blob(collection.kind().storage_key(), &json)?;
        debug!(
            collection = %collection.kind(),
            entries = collection.len(),
            "collection persisted"
        );
        Ok(())
    }
}

/// Outcome of decoding a stored collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub kind: CollectionKind,
    pub loaded: usize,
    pub dropped: usize,
    pub reset: bool,
    pub warnings: Vec<String>,
}

impl LoadReport {
    fn new(kind: CollectionKind) -> Self {
        Self {
            kind,
            loaded: 0,
            dropped: 0,
            reset: false,
            warnings: Vec::new(),
        }
    }
}

/// Parses a stored blob, dropping rows that fail the entry invariants and
/// renumbering the survivors.
pub fn decode_collection(kind: CollectionKind, raw: &str) -> (EntryCollection, LoadReport) {
    let mut report = LoadReport::new(kind);

    let rows = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(rows)) => rows,
        Ok(_) => {
            warn!(collection = %kind, "stored collection is not an array; resetting");
            return reset_collection(kind, "was not a list");
        }
        Err(err) => {
            warn!(collection = %kind, error = %err, "stored collection is corrupted; resetting");
            return reset_collection(kind, "could not be parsed");
        }
    };

    let mut entries = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<LedgerEntry>(row) {
            Ok(entry) if row_is_acceptable(kind, &entry) => entries.push(entry),
            Ok(_) => {
                report.dropped += 1;
                report
                    .warnings
                    .push(format!("dropped invalid {kind} row at position {index}"));
            }
            Err(err) => {
                report.dropped += 1;
                report
                    .warnings
                    .push(format!("dropped unreadable {kind} row at position {index}: {err}"));
            }
        }
    }

    if report.dropped > 0 {
        warn!(collection = %kind, dropped = report.dropped, "invalid rows removed on load");
    }

    report.loaded = entries.len();
    (EntryCollection::from_entries(kind, entries), report)
}

fn reset_collection(kind: CollectionKind, reason: &str) -> (EntryCollection, LoadReport) {
    let mut report = LoadReport::new(kind);
    report.reset = true;
    report
        .warnings
        .push(format!("{kind} data {reason} and has been reset"));
    (EntryCollection::new(kind), report)
}

fn row_is_acceptable(kind: CollectionKind, entry: &LedgerEntry) -> bool {
    if !entry.is_well_formed() || entry.kind.as_str().is_empty() {
        return false;
    }
    kind.type_policy() == TypePolicy::AnyLabel || entry.kind.is_budget_kind()
}
