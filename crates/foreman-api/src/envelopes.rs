// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, SecondsFormat, Utc};
use foreman_engine::{EnrichedTodo, SnoozeOutcome, UpsertOutcome, VisibleList};
use foreman_model::{Todo, TodoType};
use serde::Serialize;

/// GET /todos response: `{timestamp, count, snoozedCount, data}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvelope {
    pub timestamp: DateTime<Utc>,
    pub count: usize,
    pub snoozed_count: usize,
    pub data: Vec<EnrichedTodo>,
}

impl ListEnvelope {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, list: VisibleList) -> Self {
        Self {
            timestamp,
            count: list.count,
            snoozed_count: list.snoozed_count,
            data: list.data,
        }
    }
}

/// GET /todo-types response: `{timestamp, count, data}`.
#[derive(Debug, Clone, Serialize)]
pub struct TypeListEnvelope {
    pub timestamp: DateTime<Utc>,
    pub count: usize,
    pub data: Vec<TodoType>,
}

impl TypeListEnvelope {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, data: Vec<TodoType>) -> Self {
        Self {
            timestamp,
            count: data.len(),
            data,
        }
    }
}

/// Todo mutation response: a human-readable message plus the updated record.
#[derive(Debug, Clone, Serialize)]
pub struct TodoMutation {
    pub message: String,
    pub todo: Todo,
}

impl TodoMutation {
    #[must_use]
    pub fn completed(todo: Todo) -> Self {
        Self {
            message: "Todo completed".to_string(),
            todo,
        }
    }

    #[must_use]
    pub fn dismissed(todo: Todo) -> Self {
        Self {
            message: "Todo dismissed".to_string(),
            todo,
        }
    }

    #[must_use]
    pub fn snoozed(outcome: SnoozeOutcome) -> Self {
        match outcome {
            SnoozeOutcome::Snoozed { todo, until } => Self {
                message: format!(
                    "Todo snoozed until {}",
                    until.to_rfc3339_opts(SecondsFormat::Millis, true)
                ),
                todo,
            },
            SnoozeOutcome::Unsnoozed { todo } => Self {
                message: "Todo unsnoozed".to_string(),
                todo,
            },
        }
    }

    #[must_use]
    pub fn upserted(outcome: UpsertOutcome) -> Self {
        Self {
            message: if outcome.created {
                "Todo created".to_string()
            } else {
                "Todo updated".to_string()
            },
            todo: outcome.todo,
        }
    }
}

/// Todo-type mutation response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMutation {
    pub message: String,
    pub todo_type: TodoType,
}

impl TypeMutation {
    #[must_use]
    pub fn created(todo_type: TodoType) -> Self {
        Self {
            message: "Todo type created".to_string(),
            todo_type,
        }
    }

    #[must_use]
    pub fn updated(todo_type: TodoType) -> Self {
        Self {
            message: "Todo type updated".to_string(),
            todo_type,
        }
    }
}

/// Delete responses carry only the message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageOnly {
    pub message: String,
}

impl MessageOnly {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// POST /reset* response.
#[derive(Debug, Clone, Serialize)]
pub struct ResetOutcome {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// GET /health response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl HealthBody {
    #[must_use]
    pub fn running(timestamp: DateTime<Utc>) -> Self {
        Self {
            status: "Server running",
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_todo() -> Todo {
        serde_json::from_value(serde_json::json!({
            "id": "todo-1",
            "typeId": "pick_exception",
            "title": "Short pick",
            "dueTime": "2026-03-02T12:00:00Z",
            "createdAt": "2026-03-02T08:00:00Z"
        }))
        .expect("decode todo")
    }

    #[test]
    fn snooze_messages_include_the_until_timestamp() {
        let until = Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap();
        let body = TodoMutation::snoozed(SnoozeOutcome::Snoozed {
            todo: sample_todo(),
            until,
        });
        assert_eq!(body.message, "Todo snoozed until 2026-03-02T09:30:00.000Z");

        let body = TodoMutation::snoozed(SnoozeOutcome::Unsnoozed {
            todo: sample_todo(),
        });
        assert_eq!(body.message, "Todo unsnoozed");
    }

    #[test]
    fn list_envelope_uses_camel_case_field_names() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let body = ListEnvelope::new(
            ts,
            VisibleList {
                count: 0,
                snoozed_count: 2,
                data: Vec::new(),
            },
        );
        let out = serde_json::to_value(&body).expect("encode");
        assert_eq!(out["snoozedCount"], serde_json::json!(2));
        assert_eq!(out["count"], serde_json::json!(0));
        assert!(out["data"].as_array().expect("data").is_empty());
    }
}
