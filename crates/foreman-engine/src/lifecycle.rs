// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use foreman_model::Todo;

/// Migration/prune pass for one stored todo. Returns true when the stored
/// representation changed and the collection must be written back.
///
/// Three corrections, matching the read-path contract:
/// - the legacy `snoozedUntil` field is deleted (no user attribution, so it
///   cannot be converted into a per-user snooze);
/// - expired snoozes (`snoozedUntil <= now`) are pruned;
/// - an empty `snoozes` list is removed from the record entirely.
pub(crate) fn scrub_snoozes(todo: &mut Todo, now: DateTime<Utc>) -> bool {
    let mut dirty = false;
    if todo.snoozed_until.take().is_some() {
        dirty = true;
    }
    if let Some(snoozes) = todo.snoozes.as_mut() {
        let before = snoozes.len();
        snoozes.retain(|s| s.is_active(now));
        if snoozes.len() != before {
            dirty = true;
        }
        if snoozes.is_empty() {
            todo.snoozes = None;
            dirty = true;
        }
    }
    dirty
}
