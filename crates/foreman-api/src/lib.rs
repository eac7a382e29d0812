// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Wire-level response envelopes and the engine-error → HTTP status mapping.
//!
//! This crate is transport-agnostic: it knows JSON shapes and status codes
//! but has no dependency on the HTTP framework.

mod envelopes;
mod error_mapping;

pub use envelopes::{
    HealthBody, ListEnvelope, MessageOnly, ResetOutcome, TodoMutation, TypeListEnvelope,
    TypeMutation,
};
pub use error_mapping::{map_engine_error, ErrorBody};

pub const CRATE_NAME: &str = "foreman-api";
