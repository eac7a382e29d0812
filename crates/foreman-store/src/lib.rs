// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Storage gateway for the two persisted collections.
//!
//! Each collection is one JSON document (an array of records). Reads of an
//! absent collection yield an empty list; writes overwrite the whole
//! document, last write wins.

mod gateway;
mod json_file;
mod memory;

pub use gateway::{
    decode_records, encode_records, Collection, StorageGateway, StoreError, StoreErrorCode,
};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

pub const CRATE_NAME: &str = "foreman-store";
