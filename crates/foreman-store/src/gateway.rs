// SPDX-License-Identifier: Apache-2.0

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Todos,
    TodoTypes,
}

impl Collection {
    /// File name matches the original service's on-disk layout.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Todos => "todo.json",
            Self::TodoTypes => "todotype.json",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todos => "todos",
            Self::TodoTypes => "todotypes",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    Io,
    Corrupt,
    Internal,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Io => "io_error",
            Self::Corrupt => "corrupt_record",
            Self::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

/// Abstract read/write of whole collections.
///
/// A missing collection reads as empty rather than erroring; storage for a
/// collection is created on first write.
pub trait StorageGateway: Send + Sync {
    fn read(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;
    fn write(&self, collection: Collection, records: &[Value]) -> Result<(), StoreError>;
}

/// Decodes raw records into typed ones, validating at the storage boundary.
pub fn decode_records<T: DeserializeOwned>(
    collection: Collection,
    records: Vec<Value>,
) -> Result<Vec<T>, StoreError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record).map_err(|e| {
                StoreError::new(
                    StoreErrorCode::Corrupt,
                    format!("{collection} record at index {index} is invalid: {e}"),
                )
            })
        })
        .collect()
}

pub fn encode_records<T: Serialize>(records: &[T]) -> Result<Vec<Value>, StoreError> {
    records
        .iter()
        .map(|record| {
            serde_json::to_value(record)
                .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: String,
    }

    #[test]
    fn decode_reports_collection_and_index() {
        let records = vec![
            serde_json::json!({"id": "a"}),
            serde_json::json!({"wrong": true}),
        ];
        let err = decode_records::<Row>(Collection::Todos, records).expect_err("bad record");
        assert_eq!(err.code, StoreErrorCode::Corrupt);
        assert!(err.message.contains("todos record at index 1"));
    }

    #[test]
    fn collection_file_names_are_stable() {
        assert_eq!(Collection::Todos.file_name(), "todo.json");
        assert_eq!(Collection::TodoTypes.file_name(), "todotype.json");
    }
}
