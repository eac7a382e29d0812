// SPDX-License-Identifier: Apache-2.0

use crate::gateway::{Collection, StorageGateway, StoreError, StoreErrorCode};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// In-memory gateway for tests. Tracks write counts so tests can assert on
/// write-on-read behavior.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<Collection, Vec<Value>>>,
    writes: AtomicU64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, collection: Collection, records: Vec<Value>) {
        self.lock().insert(collection, records);
    }

    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Collection, Vec<Value>>> {
        self.collections
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl StorageGateway for MemoryStore {
    fn read(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        Ok(self.lock().get(&collection).cloned().unwrap_or_default())
    }

    fn write(&self, collection: Collection, records: &[Value]) -> Result<(), StoreError> {
        if records.iter().any(|r| !r.is_object()) {
            return Err(StoreError::new(
                StoreErrorCode::Internal,
                "collection records must be JSON objects",
            ));
        }
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.lock().insert(collection, records.to_vec());
        Ok(())
    }
}
