// SPDX-License-Identifier: Apache-2.0

use crate::gateway::{Collection, StorageGateway, StoreError, StoreErrorCode};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One pretty-printed JSON document per collection under `data_dir`.
///
/// Writes are plain overwrites with no locking; concurrent writers race and
/// the last write wins, which the storage contract accepts.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn collection_path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }
}

impl StorageGateway for JsonFileStore {
    fn read(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let path = self.collection_path(collection);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::new(
                    StoreErrorCode::Io,
                    format!("reading {}: {e}", path.display()),
                ))
            }
        };
        serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::new(
                StoreErrorCode::Corrupt,
                format!("parsing {}: {e}", path.display()),
            )
        })
    }

    fn write(&self, collection: Collection, records: &[Value]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| {
            StoreError::new(
                StoreErrorCode::Io,
                format!("creating {}: {e}", self.data_dir.display()),
            )
        })?;
        let path = self.collection_path(collection);
        let body = serde_json::to_vec_pretty(records)
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        fs::write(&path, body).map_err(|e| {
            StoreError::new(
                StoreErrorCode::Io,
                format!("writing {}: {e}", path.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absent_collection_reads_as_empty() {
        let dir = tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path());
        assert_eq!(store.read(Collection::Todos).expect("read"), Vec::<Value>::new());
    }

    #[test]
    fn write_creates_data_dir_and_round_trips() {
        let dir = tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("nested").join("data"));
        let records = vec![serde_json::json!({"id": "todo-001"})];
        store.write(Collection::Todos, &records).expect("write");
        assert_eq!(store.read(Collection::Todos).expect("read"), records);
        // Collections are independent documents.
        assert!(store.read(Collection::TodoTypes).expect("read").is_empty());
    }

    #[test]
    fn corrupt_document_is_reported_not_swallowed() {
        let dir = tempdir().expect("tempdir");
        std::fs::write(dir.path().join("todo.json"), b"{not json").expect("seed file");
        let store = JsonFileStore::new(dir.path());
        let err = store.read(Collection::Todos).expect_err("corrupt");
        assert_eq!(err.code, StoreErrorCode::Corrupt);
    }
}
