// SPDX-License-Identifier: Apache-2.0

use crate::ids::{TodoId, TypeId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Todo priority, 1 (Critical) through 4 (Low). Values outside the range are
/// rejected at the storage boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const CRITICAL: Priority = Priority(1);
    pub const HIGH: Priority = Priority(2);
    pub const MEDIUM: Priority = Priority(3);
    pub const LOW: Priority = Priority(4);

    pub fn new(value: u8) -> Result<Self, String> {
        Self::try_from(value)
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=4).contains(&value) {
            Ok(Self(value))
        } else {
            Err("priority must be between 1 and 4".to_string())
        }
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        value.0
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status. Completed and Dismissed are terminal. A snoozed todo is
/// NOT a status: snoozing is a per-user overlay carried in [`Todo::snoozes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TodoStatus {
    #[default]
    Open,
    Completed,
    Dismissed,
}

impl TodoStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Dismissed)
    }
}

/// Per-user, time-bounded visibility suppression. At most one per
/// (todo, userId); active iff `now < snoozedUntil`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snooze {
    pub user_id: UserId,
    pub snoozed_until: DateTime<Utc>,
    pub snoozed_at: DateTime<Utc>,
}

impl Snooze {
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.snoozed_until
    }
}

/// A unit of supervisor work.
///
/// `snoozes` distinguishes "field absent" from "explicit empty list" because
/// both shapes exist in stored documents: the migration pass removes the
/// field when it empties out, while reset writes an explicit empty array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub type_id: TypeId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    pub due_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: TodoStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snoozes: Option<Vec<Snooze>>,
    /// Deprecated single-value snooze. It carries no user attribution, so
    /// every read/write path deletes it instead of converting it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snoozed_until: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissed_by: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissal_reason: Option<String>,
}

impl Todo {
    #[must_use]
    pub fn snoozes(&self) -> &[Snooze] {
        self.snoozes.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn snooze_for(&self, user: &UserId) -> Option<&Snooze> {
        self.snoozes().iter().find(|s| &s.user_id == user)
    }

    #[must_use]
    pub fn active_snooze_for(&self, user: &UserId, now: DateTime<Utc>) -> Option<&Snooze> {
        self.snooze_for(user).filter(|s| s.is_active(now))
    }

    #[must_use]
    pub fn is_snoozed_for(&self, user: &UserId, now: DateTime<Utc>) -> bool {
        self.active_snooze_for(user, now).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "id": "todo-001",
            "typeId": "trailer_check_in",
            "title": "Check in trailer 4417",
            "priority": 2,
            "dueTime": "2026-03-01T14:00:00Z",
            "createdAt": "2026-03-01T12:00:00Z",
            "status": "Open",
            "details": {"externalLink": "https://wms.example/trailers/4417"},
            "snoozes": [{
                "userId": "sup-1",
                "snoozedUntil": "2026-03-01T13:00:00Z",
                "snoozedAt": "2026-03-01T12:45:00Z"
            }]
        })
    }

    #[test]
    fn wire_field_names_are_camel_case() {
        let todo: Todo = serde_json::from_value(sample_json()).expect("decode todo");
        assert_eq!(todo.type_id.as_str(), "trailer_check_in");
        assert_eq!(todo.priority, Priority::HIGH);
        let out = serde_json::to_value(&todo).expect("encode todo");
        assert!(out.get("typeId").is_some());
        assert!(out.get("dueTime").is_some());
        assert!(out.get("type_id").is_none());
        assert!(out.get("completedAt").is_none(), "absent fields stay absent");
    }

    #[test]
    fn priority_out_of_range_is_rejected() {
        let mut raw = sample_json();
        raw["priority"] = serde_json::json!(5);
        let err = serde_json::from_value::<Todo>(raw).expect_err("priority 5");
        assert!(err.to_string().contains("priority must be between 1 and 4"));
    }

    #[test]
    fn missing_priority_and_status_take_defaults() {
        let mut raw = sample_json();
        raw.as_object_mut().expect("object").remove("priority");
        raw.as_object_mut().expect("object").remove("status");
        let todo: Todo = serde_json::from_value(raw).expect("decode todo");
        assert_eq!(todo.priority, Priority::MEDIUM);
        assert_eq!(todo.status, TodoStatus::Open);
    }

    #[test]
    fn legacy_snoozed_until_round_trips_until_scrubbed() {
        let mut raw = sample_json();
        raw["snoozedUntil"] = serde_json::json!("2026-03-01T13:30:00Z");
        let mut todo: Todo = serde_json::from_value(raw).expect("decode todo");
        assert!(todo.snoozed_until.is_some());
        todo.snoozed_until = None;
        let out = serde_json::to_value(&todo).expect("encode todo");
        assert!(out.get("snoozedUntil").is_none());
    }

    #[test]
    fn snooze_activity_is_strict_now_before_until() {
        let until = Utc.with_ymd_and_hms(2026, 3, 1, 13, 0, 0).unwrap();
        let snooze = Snooze {
            user_id: UserId::parse("sup-1").unwrap(),
            snoozed_until: until,
            snoozed_at: until - chrono::Duration::minutes(15),
        };
        assert!(snooze.is_active(until - chrono::Duration::seconds(1)));
        assert!(!snooze.is_active(until));
    }

    #[test]
    fn empty_vs_absent_snoozes_are_distinct_on_the_wire() {
        let mut todo: Todo = serde_json::from_value(sample_json()).expect("decode todo");
        todo.snoozes = Some(Vec::new());
        let out = serde_json::to_value(&todo).expect("encode");
        assert_eq!(out["snoozes"], serde_json::json!([]));
        todo.snoozes = None;
        let out = serde_json::to_value(&todo).expect("encode");
        assert!(out.get("snoozes").is_none());
    }
}
