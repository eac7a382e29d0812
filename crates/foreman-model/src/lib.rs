// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Foreman model SSOT.
//!
//! Wire-compatible records for the two persisted collections (todos and
//! todo types). Field names are camelCase on the wire; timestamps are
//! RFC 3339.

mod ids;
mod todo;
mod todo_type;

pub use ids::{ParseError, TodoId, TypeId, UserId, ID_MAX_LEN};
pub use todo::{Priority, Snooze, Todo, TodoStatus};
pub use todo_type::{
    CodeLabel, CompletionField, CompletionMethod, DismissalCodes, FieldType, TodoType,
};

pub const CRATE_NAME: &str = "foreman-model";
