// SPDX-License-Identifier: Apache-2.0

use crate::clock::Clock;
use crate::persist::save_todos;
use crate::EngineError;
use chrono::{DateTime, Duration, Utc};
use foreman_model::{Todo, TodoStatus};
use foreman_store::{Collection, StorageGateway, StoreError, StoreErrorCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

const TODO_SEED: &str = include_str!("../seeds/todo.json");
const TODO_TYPE_SEED: &str = include_str!("../seeds/todotype.json");

/// Restores both collections to seed data with dates rebased to "now".
/// Used by demos and tests; the server only mounts it behind a config flag.
pub struct ResetService {
    store: Arc<dyn StorageGateway>,
    clock: Arc<dyn Clock>,
}

impl ResetService {
    #[must_use]
    pub fn new(store: Arc<dyn StorageGateway>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Loads seed todos, rebases every date so `createdAt = now - 2h` while
    /// preserving each seed's `dueTime - createdAt` offset, strips terminal
    /// state, and writes the collection. Every todo without surviving
    /// snoozes ends with an explicit empty `snoozes` array.
    pub fn reset_todos(&self) -> Result<usize, EngineError> {
        let seeds: Vec<Todo> = parse_seed(Collection::Todos, TODO_SEED)?;
        let base = self.clock.now() - Duration::hours(2);
        let todos: Vec<Todo> = seeds.into_iter().map(|t| rebase_todo(t, base)).collect();
        save_todos(self.store.as_ref(), &todos)?;
        info!(count = todos.len(), "reset todos to seed data");
        Ok(todos.len())
    }

    /// Verbatim copy of the seed types.
    pub fn reset_todo_types(&self) -> Result<usize, EngineError> {
        let types: Vec<Value> = parse_seed(Collection::TodoTypes, TODO_TYPE_SEED)?;
        self.store.write(Collection::TodoTypes, &types)?;
        info!(count = types.len(), "reset todo types to seed data");
        Ok(types.len())
    }

    /// Types first, then todos, so restored todos never reference a type id
    /// that is not yet present.
    pub fn reset_all(&self) -> Result<(), EngineError> {
        self.reset_todo_types()?;
        self.reset_todos()?;
        Ok(())
    }
}

fn parse_seed<T: serde::de::DeserializeOwned>(
    collection: Collection,
    raw: &str,
) -> Result<Vec<T>, EngineError> {
    serde_json::from_str(raw).map_err(|e| {
        EngineError::Store(StoreError::new(
            StoreErrorCode::Corrupt,
            format!("{collection} seed data is invalid: {e}"),
        ))
    })
}

fn rebase_todo(mut todo: Todo, base: DateTime<Utc>) -> Todo {
    let seed_created = todo.created_at;

    if todo.status.is_terminal() {
        todo.status = TodoStatus::Open;
        todo.completed_at = None;
        todo.completed_by = None;
        todo.completion_data = None;
        todo.dismissed_at = None;
        todo.dismissed_by = None;
        todo.dismissal_reason = None;
    }

    let due_offset = todo.due_time - seed_created;
    todo.created_at = base;
    todo.due_time = base + due_offset;

    todo.snoozes = match todo.snoozes.take() {
        Some(snoozes) if !snoozes.is_empty() => Some(
            snoozes
                .into_iter()
                .map(|mut snooze| {
                    let offset = snooze.snoozed_until - seed_created;
                    snooze.snoozed_until = base + offset;
                    snooze.snoozed_at = snooze.snoozed_until - Duration::minutes(15);
                    snooze
                })
                .collect(),
        ),
        _ => Some(Vec::new()),
    };
    todo.snoozed_until = None;

    todo
}
