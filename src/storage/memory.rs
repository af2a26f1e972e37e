use std::{collections::HashMap, sync::Mutex};

use crate::errors::LedgerError;

use super::{Result, StorageBackend};

/// In-process blob store, used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a blob directly, bypassing any encoding.
    pub fn with_blob(self, key: impl Into<String>, data: impl Into<String>) -> Self {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.insert(key.into(), data.into());
        }
        self
    }
}

impl StorageBackend for MemoryStorage {
    fn load_blob(&self, key: &str) -> Result<Option<String>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| LedgerError::Io(poisoned()))?;
        Ok(blobs.get(key).cloned())
    }

    fn save_blob(&self, key: &str, data: &str) -> Result<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| LedgerError::Io(poisoned()))?;
        blobs.insert(key.to_string(), data.to_string());
        Ok(())
    }
}

fn poisoned() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, "memory store poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::CollectionKind;

    #[test]
    fn seeded_blob_is_decoded() {
        let storage = MemoryStorage::new().with_blob(
            "expenseEntries",
            r#"[{"id":7,"type":"Groceries","amount":42.5,"category":"Food","date":"2024-02-01"}]"#,
        );
        let (collection, report) = storage.load_collection(CollectionKind::Expense).unwrap();
        assert_eq!(report.loaded, 1);
        assert_eq!(collection.get(1).unwrap().amount, 42.5);
    }

    #[test]
    fn save_overwrites_previous_blob() {
        let storage = MemoryStorage::new();
        storage.save_blob("k", "[1]").unwrap();
        storage.save_blob("k", "[2]").unwrap();
        assert_eq!(storage.load_blob("k").unwrap().as_deref(), Some("[2]"));
    }
}
