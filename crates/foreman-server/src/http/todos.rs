// SPDX-License-Identifier: Apache-2.0

use crate::http::support::{
    body_user, bool_query_flag, engine_error_response, propagated_request_id, requester,
    with_request_id,
};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use foreman_api::{ListEnvelope, MessageOnly, TodoMutation};
use foreman_engine::ListQuery;
use foreman_model::UserId;
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

pub(crate) async fn list_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let query = ListQuery {
        requester: requester(&params, &headers),
        include_snoozed: bool_query_flag(&params, "includeSnoozed"),
        include_all: bool_query_flag(&params, "includeAll"),
    };
    info!(request_id = %request_id, route = "/todos", "request start");
    let resp = match state.todos.list_visible(&query) {
        Ok(list) => Json(ListEnvelope::new(state.clock.now(), list)).into_response(),
        Err(err) => engine_error_response("/todos", &err),
    };
    with_request_id(resp, &request_id)
}

pub(crate) async fn get_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let resp = match state.todos.get(&id) {
        Ok(found) => Json(found).into_response(),
        Err(err) => engine_error_response("/todos/:id", &err),
    };
    with_request_id(resp, &request_id)
}

pub(crate) async fn create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let patch = body.map_or(Value::Null, |Json(v)| v);
    let resp = match state.todos.upsert(&patch) {
        Ok(outcome) => Json(TodoMutation::upserted(outcome)).into_response(),
        Err(err) => engine_error_response("/todos", &err),
    };
    with_request_id(resp, &request_id)
}

pub(crate) async fn complete_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Option<Json<Value>>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let body = body.map_or(Value::Null, |Json(v)| v);
    let user = body_user(&body, &headers).and_then(|u| UserId::parse(&u).ok());
    let completion_data = body
        .get("completionData")
        .filter(|v| !v.is_null())
        .cloned();
    let resp = match state.todos.complete(&id, user, completion_data) {
        Ok(todo) => Json(TodoMutation::completed(todo)).into_response(),
        Err(err) => engine_error_response("/todos/:id/complete", &err),
    };
    with_request_id(resp, &request_id)
}

pub(crate) async fn snooze_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Option<Json<Value>>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let body = body.map_or(Value::Null, |Json(v)| v);
    let minutes = body.get("minutes").and_then(Value::as_f64);
    let user = body_user(&body, &headers);
    let resp = match state.todos.snooze(&id, user.as_deref(), minutes) {
        Ok(outcome) => Json(TodoMutation::snoozed(outcome)).into_response(),
        Err(err) => engine_error_response("/todos/:id/snooze", &err),
    };
    with_request_id(resp, &request_id)
}

pub(crate) async fn dismiss_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Option<Json<Value>>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let body = body.map_or(Value::Null, |Json(v)| v);
    let user = body_user(&body, &headers).and_then(|u| UserId::parse(&u).ok());
    let reason = body
        .get("dismissalReason")
        .and_then(Value::as_str)
        .map(ToString::to_string);
    let resp = match state.todos.dismiss(&id, user, reason) {
        Ok(todo) => Json(TodoMutation::dismissed(todo)).into_response(),
        Err(err) => engine_error_response("/todos/:id/dismiss", &err),
    };
    with_request_id(resp, &request_id)
}

pub(crate) async fn delete_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let resp = match state.todos.remove(&id) {
        Ok(()) => Json(MessageOnly::new("Todo deleted")).into_response(),
        Err(err) => engine_error_response("/todos/:id", &err),
    };
    with_request_id(resp, &request_id)
}
