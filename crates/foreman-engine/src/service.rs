// SPDX-License-Identifier: Apache-2.0

use crate::clock::Clock;
use crate::facade::{sort_visible, EnrichedTodo, ListQuery, TodoWithType, VisibleList};
use crate::lifecycle::scrub_snoozes;
use crate::persist::{load_todos, load_types, save_todos};
use crate::EngineError;
use chrono::{DateTime, Duration, Utc};
use foreman_model::{Snooze, Todo, TodoStatus, UserId};
use foreman_store::StorageGateway;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

const MISSING_TODO_FIELDS: &str = "Missing required fields: id, typeId, title";

/// Outcome of a snooze mutation; `minutes <= 0` unsnoozes.
#[derive(Debug, Clone)]
pub enum SnoozeOutcome {
    Snoozed { todo: Todo, until: DateTime<Utc> },
    Unsnoozed { todo: Todo },
}

impl SnoozeOutcome {
    #[must_use]
    pub fn todo(&self) -> &Todo {
        match self {
            Self::Snoozed { todo, .. } | Self::Unsnoozed { todo } => todo,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    pub todo: Todo,
    pub created: bool,
}

/// Lifecycle engine and list façade over the todos collection.
///
/// Every operation is a whole-collection read-modify-write through the
/// gateway. Mutations (including the read path's migration write-back) are
/// serialized behind an in-process lock; the storage contract itself stays
/// last-write-wins.
pub struct TodoService {
    store: Arc<dyn StorageGateway>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl TodoService {
    #[must_use]
    pub fn new(store: Arc<dyn StorageGateway>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// The authoritative visible/enriched/sorted list for one requester.
    ///
    /// Expired snoozes and legacy fields found along the way are corrected
    /// and persisted before the response is built, so reads can write.
    pub fn list_visible(&self, query: &ListQuery) -> Result<VisibleList, EngineError> {
        let _guard = self.guard();
        let mut todos = load_todos(self.store.as_ref())?;
        let types = load_types(self.store.as_ref())?;
        let now = self.clock.now();

        let in_base = |todo: &Todo| query.include_all || !todo.status.is_terminal();

        let mut dirty = false;
        for todo in todos.iter_mut().filter(|t| in_base(t)) {
            dirty |= scrub_snoozes(todo, now);
        }
        if dirty {
            debug!("persisting migrated/pruned snooze state");
            save_todos(self.store.as_ref(), &todos)?;
        }

        let base: Vec<&Todo> = todos.iter().filter(|t| in_base(t)).collect();

        let snoozed_count = match &query.requester {
            Some(user) => base.iter().filter(|t| t.is_snoozed_for(user, now)).count(),
            None => 0,
        };

        let visible: Vec<&Todo> = match (&query.requester, query.include_all) {
            (_, true) | (None, false) => base,
            (Some(user), false) => {
                let (snoozed, open): (Vec<&Todo>, Vec<&Todo>) = base
                    .into_iter()
                    .partition(|t| t.is_snoozed_for(user, now));
                if query.include_snoozed {
                    open.into_iter().chain(snoozed).collect()
                } else {
                    open
                }
            }
        };

        let mut data: Vec<EnrichedTodo> = visible
            .into_iter()
            .map(|todo| {
                let user_snooze = query
                    .requester
                    .as_ref()
                    .and_then(|user| todo.active_snooze_for(user, now))
                    .cloned();
                EnrichedTodo {
                    todo_type: types.iter().find(|t| t.id == todo.type_id).cloned(),
                    is_snoozed_by_user: user_snooze.is_some(),
                    user_snooze_info: user_snooze,
                    todo: todo.clone(),
                }
            })
            .collect();
        sort_visible(&mut data);

        Ok(VisibleList {
            count: data.len(),
            snoozed_count,
            data,
        })
    }

    pub fn get(&self, todo_id: &str) -> Result<TodoWithType, EngineError> {
        let todos = load_todos(self.store.as_ref())?;
        let todo = todos
            .iter()
            .find(|t| t.id.as_str() == todo_id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound("Todo not found".to_string()))?;
        let types = load_types(self.store.as_ref())?;
        let todo_type = types.iter().find(|t| t.id == todo.type_id).cloned();
        Ok(TodoWithType { todo, todo_type })
    }

    /// Marks a todo Completed. Already-terminal todos are overwritten again
    /// rather than rejected (idempotent-by-overwrite). Completion data is
    /// stored as-is; the completion-form contract is enforced by the client.
    pub fn complete(
        &self,
        todo_id: &str,
        user_id: Option<UserId>,
        completion_data: Option<Value>,
    ) -> Result<Todo, EngineError> {
        let _guard = self.guard();
        let mut todos = load_todos(self.store.as_ref())?;
        let todo = find_mut(&mut todos, todo_id)?;
        todo.status = TodoStatus::Completed;
        todo.completed_at = Some(self.clock.now());
        if let Some(user) = user_id {
            todo.completed_by = Some(user);
        }
        if let Some(data) = completion_data {
            todo.completion_data = Some(data);
        }
        let completed = todo.clone();
        save_todos(self.store.as_ref(), &todos)?;
        info!(todo_id, "todo completed");
        Ok(completed)
    }

    /// Upserts the requester's snooze (`minutes > 0`) or removes it
    /// (`minutes <= 0`). Terminal todos cannot be snoozed.
    pub fn snooze(
        &self,
        todo_id: &str,
        user_id: Option<&str>,
        minutes: Option<f64>,
    ) -> Result<SnoozeOutcome, EngineError> {
        let Some(minutes) = minutes.filter(|m| m.is_finite()) else {
            return Err(EngineError::Validation("Valid minutes required".to_string()));
        };
        let user = user_id
            .filter(|u| !u.is_empty())
            .and_then(|u| UserId::parse(u).ok())
            .ok_or_else(|| EngineError::Validation("userId is required".to_string()))?;

        let _guard = self.guard();
        let mut todos = load_todos(self.store.as_ref())?;
        let todo = find_mut(&mut todos, todo_id)?;
        if todo.status.is_terminal() {
            return Err(EngineError::Conflict(
                "Cannot snooze completed or dismissed todos".to_string(),
            ));
        }

        // Legacy single-value snoozes are scrubbed by every snooze write.
        todo.snoozed_until = None;

        if minutes <= 0.0 {
            if let Some(snoozes) = todo.snoozes.as_mut() {
                snoozes.retain(|s| s.user_id != user);
                if snoozes.is_empty() {
                    todo.snoozes = None;
                }
            }
            let unsnoozed = todo.clone();
            save_todos(self.store.as_ref(), &todos)?;
            info!(todo_id, user = %user, "todo unsnoozed");
            return Ok(SnoozeOutcome::Unsnoozed { todo: unsnoozed });
        }

        let now = self.clock.now();
        // Absurdly large (but finite) minutes overflow the timestamp range;
        // they get the same rejection as non-numeric input.
        let until = now
            .checked_add_signed(Duration::milliseconds((minutes * 60_000.0) as i64))
            .ok_or_else(|| EngineError::Validation("Valid minutes required".to_string()))?;
        let entry = Snooze {
            user_id: user.clone(),
            snoozed_until: until,
            snoozed_at: now,
        };
        let snoozes = todo.snoozes.get_or_insert_with(Vec::new);
        match snoozes.iter_mut().find(|s| s.user_id == user) {
            Some(existing) => *existing = entry,
            None => snoozes.push(entry),
        }
        let snoozed = todo.clone();
        save_todos(self.store.as_ref(), &todos)?;
        info!(todo_id, user = %user, until = %until, "todo snoozed");
        Ok(SnoozeOutcome::Snoozed {
            todo: snoozed,
            until,
        })
    }

    /// Marks a todo Dismissed. The reason is stored as a code; resolving it
    /// to a label via the type's dismissal codes is presentation-side.
    pub fn dismiss(
        &self,
        todo_id: &str,
        user_id: Option<UserId>,
        dismissal_reason: Option<String>,
    ) -> Result<Todo, EngineError> {
        let _guard = self.guard();
        let mut todos = load_todos(self.store.as_ref())?;
        let todo = find_mut(&mut todos, todo_id)?;
        todo.status = TodoStatus::Dismissed;
        todo.dismissed_at = Some(self.clock.now());
        if let Some(user) = user_id {
            todo.dismissed_by = Some(user);
        }
        if let Some(reason) = dismissal_reason {
            todo.dismissal_reason = Some(reason);
        }
        let dismissed = todo.clone();
        save_todos(self.store.as_ref(), &todos)?;
        info!(todo_id, "todo dismissed");
        Ok(dismissed)
    }

    /// Creates or patches a todo from a JSON object. Updates shallow-merge
    /// the provided fields over the stored record; inserts default `status`
    /// to Open and `createdAt` to now, then validate the full record.
    pub fn upsert(&self, patch: &Value) -> Result<UpsertOutcome, EngineError> {
        let Some(fields) = patch.as_object() else {
            return Err(EngineError::Validation(MISSING_TODO_FIELDS.to_string()));
        };
        let id = require_str(fields, "id")?;
        require_str(fields, "typeId")?;
        require_str(fields, "title")?;
        let id = id.to_string();

        let _guard = self.guard();
        let mut todos = load_todos(self.store.as_ref())?;
        match todos.iter().position(|t| t.id.as_str() == id) {
            Some(index) => {
                let mut merged = serde_json::to_value(&todos[index])
                    .map_err(|e| EngineError::Validation(e.to_string()))?;
                let target = merged
                    .as_object_mut()
                    .ok_or_else(|| EngineError::Validation(MISSING_TODO_FIELDS.to_string()))?;
                for (key, value) in fields {
                    target.insert(key.clone(), value.clone());
                }
                let todo: Todo = serde_json::from_value(merged)
                    .map_err(|e| EngineError::Validation(format!("Invalid todo: {e}")))?;
                todos[index] = todo.clone();
                save_todos(self.store.as_ref(), &todos)?;
                info!(todo_id = %id, "todo updated");
                Ok(UpsertOutcome {
                    todo,
                    created: false,
                })
            }
            None => {
                let mut fresh = fields.clone();
                fresh
                    .entry("status".to_string())
                    .or_insert_with(|| Value::String("Open".to_string()));
                fresh
                    .entry("createdAt".to_string())
                    .or_insert_with(|| serde_json::json!(self.clock.now()));
                let todo: Todo = serde_json::from_value(Value::Object(fresh))
                    .map_err(|e| EngineError::Validation(format!("Invalid todo: {e}")))?;
                todos.push(todo.clone());
                save_todos(self.store.as_ref(), &todos)?;
                info!(todo_id = %id, "todo created");
                Ok(UpsertOutcome {
                    todo,
                    created: true,
                })
            }
        }
    }

    pub fn remove(&self, todo_id: &str) -> Result<(), EngineError> {
        let _guard = self.guard();
        let mut todos = load_todos(self.store.as_ref())?;
        let before = todos.len();
        todos.retain(|t| t.id.as_str() != todo_id);
        if todos.len() == before {
            return Err(EngineError::NotFound("Todo not found".to_string()));
        }
        save_todos(self.store.as_ref(), &todos)?;
        info!(todo_id, "todo deleted");
        Ok(())
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn find_mut<'a>(todos: &'a mut [Todo], todo_id: &str) -> Result<&'a mut Todo, EngineError> {
    todos
        .iter_mut()
        .find(|t| t.id.as_str() == todo_id)
        .ok_or_else(|| EngineError::NotFound("Todo not found".to_string()))
}

fn require_str<'a>(fields: &'a Map<String, Value>, key: &str) -> Result<&'a str, EngineError> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| EngineError::Validation(MISSING_TODO_FIELDS.to_string()))
}
