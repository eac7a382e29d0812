// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! The todo lifecycle and visibility engine.
//!
//! Three services share one storage gateway: [`TodoService`] (lifecycle
//! mutations and the visible-list read path), [`TypeRegistry`] (validated
//! CRUD over todo types), and [`ResetService`] (seed restore with dates
//! rebased to now). All of them go through [`foreman_store::StorageGateway`]
//! with whole-collection read-modify-write.

mod clock;
mod facade;
mod lifecycle;
mod persist;
mod registry;
mod reset;
mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use facade::{EnrichedTodo, ListQuery, TodoWithType, VisibleList};
pub use registry::{TodoTypeDraft, TypeRegistry};
pub use reset::ResetService;
pub use service::{SnoozeOutcome, TodoService, UpsertOutcome};

use foreman_store::StoreError;
use std::fmt::{Display, Formatter};

pub const CRATE_NAME: &str = "foreman-engine";

/// Engine error taxonomy. The api crate maps these onto HTTP statuses;
/// messages are wire-visible and match the original service.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    NotFound(String),
    Validation(String),
    Conflict(String),
    Store(StoreError),
}

impl EngineError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation_error",
            Self::Conflict(_) => "conflict",
            Self::Store(_) => "storage_error",
        }
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(msg) | Self::Validation(msg) | Self::Conflict(msg) => {
                f.write_str(msg)
            }
            Self::Store(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
