use chrono::{DateTime, Duration, TimeZone, Utc};
use foreman_engine::{
    EngineError, FixedClock, ListQuery, SnoozeOutcome, TodoService,
};
use foreman_model::{TodoStatus, UserId};
use foreman_store::{Collection, MemoryStore, StorageGateway};
use serde_json::{json, Value};
use std::sync::Arc;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

fn seed_todo(id: &str, priority: u8, due: &str) -> Value {
    json!({
        "id": id,
        "typeId": "pick_exception",
        "title": format!("todo {id}"),
        "priority": priority,
        "dueTime": due,
        "createdAt": "2026-03-02T08:00:00Z",
        "status": "Open"
    })
}

fn seed_types() -> Vec<Value> {
    vec![json!({
        "id": "pick_exception",
        "name": "Pick Exception",
        "priority": 1,
        "completionMethod": "auto",
        "completionFields": [],
        "dismissalCodes": [{"code": "SHORT_SHIP", "label": "Approved short ship"}]
    })]
}

fn service_with(todos: Vec<Value>) -> (Arc<MemoryStore>, Arc<FixedClock>, TodoService) {
    let store = Arc::new(MemoryStore::new());
    store.seed(Collection::Todos, todos);
    store.seed(Collection::TodoTypes, seed_types());
    let clock = Arc::new(FixedClock::new(start()));
    let service = TodoService::new(store.clone(), clock.clone());
    (store, clock, service)
}

fn user(id: &str) -> UserId {
    UserId::parse(id).expect("user id")
}

fn query_for(requester: &str) -> ListQuery {
    ListQuery {
        requester: Some(user(requester)),
        include_snoozed: false,
        include_all: false,
    }
}

#[test]
fn migration_is_idempotent_and_writes_back_once() {
    let mut dirty_todo = seed_todo("todo-1", 2, "2026-03-02T12:00:00Z");
    dirty_todo["snoozedUntil"] = json!("2026-03-02T10:00:00Z");
    dirty_todo["snoozes"] = json!([{
        "userId": "sup-1",
        "snoozedUntil": "2026-03-02T08:30:00Z",
        "snoozedAt": "2026-03-02T08:15:00Z"
    }]);
    let (store, _clock, service) = service_with(vec![dirty_todo]);

    let first = service.list_visible(&query_for("sup-1")).expect("first list");
    assert_eq!(store.write_count(), 1, "migration persists the fixups");
    assert_eq!(first.count, 1, "expired snooze no longer hides the todo");

    let second = service.list_visible(&query_for("sup-1")).expect("second list");
    assert_eq!(store.write_count(), 1, "second pass has nothing to fix");
    assert_eq!(
        serde_json::to_value(&first).expect("encode"),
        serde_json::to_value(&second).expect("encode"),
    );

    let stored = store.read(Collection::Todos).expect("raw todos");
    assert!(stored[0].get("snoozedUntil").is_none(), "legacy field scrubbed");
    assert!(stored[0].get("snoozes").is_none(), "empty snooze list removed");
}

#[test]
fn snooze_hides_todo_until_unsnoozed_or_expired() {
    let (_store, clock, service) =
        service_with(vec![seed_todo("todo-1", 2, "2026-03-02T12:00:00Z")]);

    let outcome = service
        .snooze("todo-1", Some("sup-1"), Some(30.0))
        .expect("snooze");
    let SnoozeOutcome::Snoozed { until, .. } = outcome else {
        panic!("expected a snoozed outcome");
    };
    assert_eq!(until, start() + Duration::minutes(30));

    // Hidden from the snoozing user, still counted in the badge.
    let list = service.list_visible(&query_for("sup-1")).expect("list");
    assert_eq!(list.count, 0);
    assert_eq!(list.snoozed_count, 1);

    // Visible and tagged when the client asks for snoozed todos.
    let with_snoozed = service
        .list_visible(&ListQuery {
            requester: Some(user("sup-1")),
            include_snoozed: true,
            include_all: false,
        })
        .expect("list with snoozed");
    assert_eq!(with_snoozed.count, 1);
    assert!(with_snoozed.data[0].is_snoozed_by_user);
    let info = with_snoozed.data[0]
        .user_snooze_info
        .as_ref()
        .expect("snooze info");
    assert_eq!(info.snoozed_until, until);

    // Other users are unaffected.
    let other = service.list_visible(&query_for("sup-2")).expect("other user");
    assert_eq!(other.count, 1);
    assert_eq!(other.snoozed_count, 0);
    assert!(!other.data[0].is_snoozed_by_user);

    // Unsnooze restores visibility immediately.
    let outcome = service
        .snooze("todo-1", Some("sup-1"), Some(0.0))
        .expect("unsnooze");
    assert!(matches!(outcome, SnoozeOutcome::Unsnoozed { .. }));
    let restored = service.list_visible(&query_for("sup-1")).expect("restored");
    assert_eq!(restored.count, 1);
    assert_eq!(restored.snoozed_count, 0);

    // A fresh snooze expires on its own once the clock passes it.
    service
        .snooze("todo-1", Some("sup-1"), Some(10.0))
        .expect("re-snooze");
    clock.advance(Duration::minutes(11));
    let expired = service.list_visible(&query_for("sup-1")).expect("expired");
    assert_eq!(expired.count, 1);
    assert_eq!(expired.snoozed_count, 0);
}

#[test]
fn repeated_snoozes_update_the_single_entry_per_user() {
    let (store, _clock, service) =
        service_with(vec![seed_todo("todo-1", 2, "2026-03-02T12:00:00Z")]);

    service
        .snooze("todo-1", Some("sup-1"), Some(15.0))
        .expect("first snooze");
    service
        .snooze("todo-1", Some("sup-1"), Some(45.0))
        .expect("second snooze");
    service
        .snooze("todo-1", Some("sup-2"), Some(20.0))
        .expect("other user snooze");

    let stored = store.read(Collection::Todos).expect("raw todos");
    let snoozes = stored[0]["snoozes"].as_array().expect("snoozes array");
    assert_eq!(snoozes.len(), 2, "one entry per user");
    let sup1 = snoozes
        .iter()
        .find(|s| s["userId"] == "sup-1")
        .expect("sup-1 entry");
    let until: DateTime<Utc> = sup1["snoozedUntil"]
        .as_str()
        .expect("until")
        .parse()
        .expect("timestamp");
    assert_eq!(until, start() + Duration::minutes(45));
}

#[test]
fn snooze_validation_and_lifecycle_guards() {
    let (_store, _clock, service) = service_with(vec![
        seed_todo("todo-1", 2, "2026-03-02T12:00:00Z"),
        seed_todo("todo-2", 2, "2026-03-02T12:00:00Z"),
    ]);

    let err = service.snooze("todo-1", Some("sup-1"), None).expect_err("no minutes");
    assert_eq!(err, EngineError::Validation("Valid minutes required".to_string()));

    let err = service
        .snooze("todo-1", Some("sup-1"), Some(f64::NAN))
        .expect_err("nan minutes");
    assert_eq!(err, EngineError::Validation("Valid minutes required".to_string()));

    // Finite but past the representable timestamp range: rejected, not a crash.
    let err = service
        .snooze("todo-1", Some("sup-1"), Some(1e13))
        .expect_err("overflowing minutes");
    assert_eq!(err, EngineError::Validation("Valid minutes required".to_string()));

    let err = service.snooze("todo-1", None, Some(5.0)).expect_err("no user");
    assert_eq!(err, EngineError::Validation("userId is required".to_string()));

    let err = service
        .snooze("todo-missing", Some("sup-1"), Some(5.0))
        .expect_err("missing todo");
    assert!(matches!(err, EngineError::NotFound(_)));

    service
        .complete("todo-2", Some(user("sup-1")), None)
        .expect("complete");
    let err = service
        .snooze("todo-2", Some("sup-1"), Some(5.0))
        .expect_err("snooze terminal");
    assert_eq!(
        err,
        EngineError::Conflict("Cannot snooze completed or dismissed todos".to_string())
    );
}

#[test]
fn complete_and_dismiss_set_terminal_fields_and_hide_from_list() {
    let (_store, _clock, service) = service_with(vec![
        seed_todo("todo-1", 2, "2026-03-02T12:00:00Z"),
        seed_todo("todo-2", 3, "2026-03-02T13:00:00Z"),
        seed_todo("todo-3", 3, "2026-03-02T14:00:00Z"),
    ]);

    let completed = service
        .complete(
            "todo-1",
            Some(user("sup-1")),
            Some(json!({"sealIntact": "Yes"})),
        )
        .expect("complete");
    assert_eq!(completed.status, TodoStatus::Completed);
    assert_eq!(completed.completed_at, Some(start()));
    assert_eq!(completed.completion_data, Some(json!({"sealIntact": "Yes"})));

    let dismissed = service
        .dismiss("todo-2", Some(user("sup-1")), Some("SHORT_SHIP".to_string()))
        .expect("dismiss");
    assert_eq!(dismissed.status, TodoStatus::Dismissed);
    assert_eq!(dismissed.dismissal_reason, Some("SHORT_SHIP".to_string()));

    let list = service.list_visible(&query_for("sup-1")).expect("list");
    assert_eq!(list.count, 1, "terminal todos drop out of the default view");

    let all = service
        .list_visible(&ListQuery {
            requester: Some(user("sup-1")),
            include_snoozed: false,
            include_all: true,
        })
        .expect("list all");
    assert_eq!(all.count, 3, "includeAll keeps terminal todos");

    // Re-completing is an overwrite, not an error.
    let again = service.complete("todo-1", Some(user("sup-2")), None).expect("re-complete");
    assert_eq!(again.completed_by, Some(user("sup-2")));

    let err = service.complete("todo-missing", None, None).expect_err("missing");
    assert!(matches!(err, EngineError::NotFound(_)));
    let err = service.dismiss("todo-missing", None, None).expect_err("missing");
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[test]
fn sort_orders_by_snoozed_then_priority_then_due_time() {
    let (_store, _clock, service) = service_with(vec![
        seed_todo("todo-p3", 3, "2026-03-02T10:00:00Z"),
        seed_todo("todo-p1-late", 1, "2026-03-02T15:00:00Z"),
        seed_todo("todo-p2", 2, "2026-03-02T11:00:00Z"),
        seed_todo("todo-p1-early", 1, "2026-03-02T09:30:00Z"),
    ]);

    let list = service
        .list_visible(&ListQuery::default())
        .expect("list");
    let order: Vec<&str> = list.data.iter().map(|t| t.todo.id.as_str()).collect();
    assert_eq!(
        order,
        vec!["todo-p1-early", "todo-p1-late", "todo-p2", "todo-p3"]
    );
}

#[test]
fn snoozed_todos_sort_after_open_ones_when_included() {
    let (_store, _clock, service) = service_with(vec![
        seed_todo("todo-a", 1, "2026-03-02T09:30:00Z"),
        seed_todo("todo-b", 3, "2026-03-02T10:00:00Z"),
    ]);
    service
        .snooze("todo-a", Some("sup-1"), Some(60.0))
        .expect("snooze");

    let list = service
        .list_visible(&ListQuery {
            requester: Some(user("sup-1")),
            include_snoozed: true,
            include_all: false,
        })
        .expect("list");
    let order: Vec<&str> = list.data.iter().map(|t| t.todo.id.as_str()).collect();
    assert_eq!(
        order,
        vec!["todo-b", "todo-a"],
        "priority 1 sorts last once snoozed by the requester"
    );
}

#[test]
fn enrichment_resolves_type_and_tolerates_unknown_type_ids() {
    let mut orphan = seed_todo("todo-orphan", 2, "2026-03-02T12:00:00Z");
    orphan["typeId"] = json!("ghost_type");
    let (_store, _clock, service) =
        service_with(vec![seed_todo("todo-1", 2, "2026-03-02T11:00:00Z"), orphan]);

    let list = service.list_visible(&ListQuery::default()).expect("list");
    let enriched = serde_json::to_value(&list.data).expect("encode data");
    let known = enriched
        .as_array()
        .expect("array")
        .iter()
        .find(|t| t["id"] == "todo-1")
        .expect("known todo");
    assert_eq!(known["type"]["name"], "Pick Exception");
    assert_eq!(known["isSnoozedByUser"], json!(false));
    assert_eq!(known["userSnoozeInfo"], Value::Null);
    let unknown = enriched
        .as_array()
        .expect("array")
        .iter()
        .find(|t| t["id"] == "todo-orphan")
        .expect("orphan todo");
    assert!(unknown.get("type").is_none(), "unresolved type stays absent");
}

#[test]
fn get_returns_todo_with_type_or_not_found() {
    let (_store, _clock, service) =
        service_with(vec![seed_todo("todo-1", 2, "2026-03-02T12:00:00Z")]);

    let found = service.get("todo-1").expect("get");
    assert_eq!(found.todo.id.as_str(), "todo-1");
    assert_eq!(
        found.todo_type.as_ref().map(|t| t.name.as_str()),
        Some("Pick Exception")
    );

    let err = service.get("todo-missing").expect_err("missing");
    assert_eq!(err, EngineError::NotFound("Todo not found".to_string()));
}

#[test]
fn upsert_creates_with_defaults_and_merges_patches() {
    let (_store, _clock, service) = service_with(Vec::new());

    let err = service
        .upsert(&json!({"id": "todo-new", "title": "missing type"}))
        .expect_err("missing typeId");
    assert_eq!(
        err,
        EngineError::Validation("Missing required fields: id, typeId, title".to_string())
    );

    let created = service
        .upsert(&json!({
            "id": "todo-new",
            "typeId": "pick_exception",
            "title": "Check dock 3",
            "description": "First pass",
            "priority": 2,
            "dueTime": "2026-03-02T12:00:00Z"
        }))
        .expect("create");
    assert!(created.created);
    assert_eq!(created.todo.status, TodoStatus::Open);
    assert_eq!(created.todo.created_at, start(), "createdAt defaults to now");

    let updated = service
        .upsert(&json!({
            "id": "todo-new",
            "typeId": "pick_exception",
            "title": "Check dock 3 (updated)",
            "priority": 1
        }))
        .expect("update");
    assert!(!updated.created);
    assert_eq!(updated.todo.title, "Check dock 3 (updated)");
    assert_eq!(updated.todo.priority.get(), 1);
    assert_eq!(
        updated.todo.description.as_deref(),
        Some("First pass"),
        "fields absent from the patch are preserved"
    );
    assert_eq!(updated.todo.created_at, start(), "createdAt untouched by merge");

    let err = service
        .upsert(&json!({
            "id": "todo-new",
            "typeId": "pick_exception",
            "title": "bad patch",
            "priority": 9
        }))
        .expect_err("bad priority");
    assert!(matches!(err, EngineError::Validation(_)));
}

#[test]
fn remove_deletes_or_reports_not_found() {
    let (store, _clock, service) =
        service_with(vec![seed_todo("todo-1", 2, "2026-03-02T12:00:00Z")]);

    service.remove("todo-1").expect("delete");
    assert!(store.read(Collection::Todos).expect("raw").is_empty());
    let err = service.remove("todo-1").expect_err("already gone");
    assert_eq!(err, EngineError::NotFound("Todo not found".to_string()));
}

#[test]
fn include_all_skips_snooze_filtering_but_keeps_badge_count() {
    let (_store, _clock, service) = service_with(vec![
        seed_todo("todo-1", 2, "2026-03-02T12:00:00Z"),
        seed_todo("todo-2", 3, "2026-03-02T13:00:00Z"),
    ]);
    service
        .snooze("todo-1", Some("sup-1"), Some(60.0))
        .expect("snooze");

    let all = service
        .list_visible(&ListQuery {
            requester: Some(user("sup-1")),
            include_snoozed: false,
            include_all: true,
        })
        .expect("list all");
    assert_eq!(all.count, 2, "snoozed todo still listed");
    assert_eq!(all.snoozed_count, 1);
    let snoozed_entry = all
        .data
        .iter()
        .find(|t| t.todo.id.as_str() == "todo-1")
        .expect("snoozed todo");
    assert!(snoozed_entry.is_snoozed_by_user, "tagging still applies");
}
