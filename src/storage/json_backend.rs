use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::utils::persistence::{app_data_dir, data_dir_in, ensure_dir, write_atomic};

use super::{Result, StorageBackend};

const BLOB_EXTENSION: &str = "json";

/// Filesystem-backed store keeping one `<key>.json` file per blob.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    data_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        let data_dir = data_dir_in(&root);
        ensure_dir(&data_dir)?;
        Ok(Self { root, data_dir })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn blob_path(&self, key: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", canonical_key(key), BLOB_EXTENSION))
    }
}

impl StorageBackend for JsonStorage {
    fn load_blob(&self, key: &str) -> Result<Option<String>> {
        let path = self.blob_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = String::from_utf8(fs::read(&path)?)?;
        debug!(path = %path.display(), bytes = data.len(), "blob read");
        Ok(Some(data))
    }

    fn save_blob(&self, key: &str, data: &str) -> Result<()> {
        let path = self.blob_path(key);
        write_atomic(&path, data)?;
        debug!(path = %path.display(), bytes = data.len(), "blob written");
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    let cleaned: String = key
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "blob".into()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::entry::{EntryDraft, EntryType},
        ledger::{CollectionKind, EntryCollection},
    };
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().unwrap();
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();
        (storage, temp)
    }

    #[test]
    fn blob_keys_map_to_json_files() {
        let (storage, temp) = storage_with_temp_dir();
        assert_eq!(
            storage.blob_path("budgetEntries"),
            temp.path().join("data").join("budgetEntries.json")
        );
        assert_eq!(
            storage.blob_path("../escape"),
            temp.path().join("data").join("___escape.json")
        );
    }

    #[test]
    fn missing_blob_loads_as_none() {
        let (storage, _temp) = storage_with_temp_dir();
        assert!(storage.load_blob("expenseEntries").unwrap().is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _temp) = storage_with_temp_dir();
        let mut collection = EntryCollection::new(CollectionKind::Budget);
        let valid = EntryDraft::new("Income", "1000", "Salary", "2024-01-05")
            .validate(CollectionKind::Budget.type_policy())
            .unwrap();
        collection.insert(valid);
        storage.save_collection(&collection).unwrap();

        let (loaded, report) = storage.load_collection(CollectionKind::Budget).unwrap();
        assert_eq!(report.dropped, 0);
        assert_eq!(loaded.entries(), collection.entries());
        assert_eq!(loaded.get(1).unwrap().kind, EntryType::Income);
    }

    #[test]
    fn non_utf8_blob_loads_as_reset_collection() {
        let (storage, _temp) = storage_with_temp_dir();
        fs::write(storage.blob_path("budgetEntries"), [0x5b, 0xff, 0xfe, 0x5d]).unwrap();

        assert!(matches!(
            storage.load_blob("budgetEntries"),
            Err(crate::errors::LedgerError::Encoding(_))
        ));
        let (loaded, report) = storage.load_collection(CollectionKind::Budget).unwrap();
        assert!(loaded.is_empty());
        assert!(report.reset);
    }
}
