// SPDX-License-Identifier: Apache-2.0

use foreman_model::{Snooze, Todo, TodoType, UserId};
use serde::Serialize;

/// Query flags for the visible-list read path.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Whose snoozes govern visibility. Without a requester no snooze
    /// filtering happens at all.
    pub requester: Option<UserId>,
    /// Re-include the requester's actively-snoozed todos (tagged, appended
    /// after the non-snoozed ones before sorting).
    pub include_snoozed: bool,
    /// Show every todo regardless of status or snoozes (the wall-board
    /// view); skips snooze filtering entirely.
    pub include_all: bool,
}

/// A todo as the client sees it: record fields flattened, resolved type,
/// and the requester's snooze overlay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedTodo {
    #[serde(flatten)]
    pub todo: Todo,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub todo_type: Option<TodoType>,
    pub is_snoozed_by_user: bool,
    pub user_snooze_info: Option<Snooze>,
}

/// GET-by-id shape: the record plus its resolved type, no snooze overlay.
#[derive(Debug, Clone, Serialize)]
pub struct TodoWithType {
    #[serde(flatten)]
    pub todo: Todo,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub todo_type: Option<TodoType>,
}

/// Output of the list façade: visible todos plus the requester's snoozed
/// badge count (counted over the base set, before visibility filtering).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleList {
    pub count: usize,
    pub snoozed_count: usize,
    pub data: Vec<EnrichedTodo>,
}

/// Comparator order: non-snoozed before snoozed-by-requester, then ascending
/// priority (1 = Critical first), then ascending due time. The sort is
/// stable, so equal keys keep their stored order.
pub(crate) fn sort_visible(data: &mut [EnrichedTodo]) {
    data.sort_by(|a, b| {
        a.is_snoozed_by_user
            .cmp(&b.is_snoozed_by_user)
            .then_with(|| a.todo.priority.cmp(&b.todo.priority))
            .then_with(|| a.todo.due_time.cmp(&b.todo.due_time))
    });
}
