// SPDX-License-Identifier: Apache-2.0

use crate::http::support::{
    engine_error_response, error_response, propagated_request_id, with_request_id,
};
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use foreman_api::{ErrorBody, MessageOnly, TypeListEnvelope, TypeMutation};
use foreman_engine::TodoTypeDraft;
use serde_json::Value;

fn parse_draft(body: Option<Json<Value>>) -> Result<TodoTypeDraft, Response> {
    let raw = body.map_or(Value::Null, |Json(v)| v);
    if raw.is_null() {
        return Ok(TodoTypeDraft::default());
    }
    serde_json::from_value(raw)
        .map_err(|e| error_response(400, ErrorBody::new(format!("Invalid todo type: {e}"))))
}

pub(crate) async fn list_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let resp = match state.types.list() {
        Ok(types) => Json(TypeListEnvelope::new(state.clock.now(), types)).into_response(),
        Err(err) => engine_error_response("/todo-types", &err),
    };
    with_request_id(resp, &request_id)
}

pub(crate) async fn get_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let resp = match state.types.get(&id) {
        Ok(todo_type) => Json(todo_type).into_response(),
        Err(err) => engine_error_response("/todo-types/:id", &err),
    };
    with_request_id(resp, &request_id)
}

pub(crate) async fn create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let resp = match parse_draft(body) {
        Ok(draft) => match state.types.create(draft) {
            Ok(todo_type) => {
                (StatusCode::CREATED, Json(TypeMutation::created(todo_type))).into_response()
            }
            Err(err) => engine_error_response("/todo-types", &err),
        },
        Err(resp) => resp,
    };
    with_request_id(resp, &request_id)
}

pub(crate) async fn update_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Option<Json<Value>>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let resp = match parse_draft(body) {
        Ok(draft) => match state.types.update(&id, draft) {
            Ok(todo_type) => Json(TypeMutation::updated(todo_type)).into_response(),
            Err(err) => engine_error_response("/todo-types/:id", &err),
        },
        Err(resp) => resp,
    };
    with_request_id(resp, &request_id)
}

pub(crate) async fn delete_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let resp = match state.types.delete(&id) {
        Ok(()) => Json(MessageOnly::new("Todo type deleted")).into_response(),
        Err(err) => engine_error_response("/todo-types/:id", &err),
    };
    with_request_id(resp, &request_id)
}
