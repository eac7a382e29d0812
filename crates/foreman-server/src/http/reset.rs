// SPDX-License-Identifier: Apache-2.0

use crate::http::support::{engine_error_response, propagated_request_id, with_request_id};
use crate::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use foreman_api::ResetOutcome;
use foreman_engine::EngineError;
use tracing::info;

fn reset_response(
    state: &AppState,
    request_id: &str,
    route: &str,
    message: &str,
    result: Result<(), EngineError>,
) -> Response {
    let resp = match result {
        Ok(()) => {
            info!(request_id, route, "reset complete");
            Json(ResetOutcome {
                success: true,
                message: message.to_string(),
                timestamp: state.clock.now(),
            })
            .into_response()
        }
        Err(err) => engine_error_response(route, &err),
    };
    with_request_id(resp, request_id)
}

pub(crate) async fn reset_all_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = state.reset.reset_all();
    reset_response(
        &state,
        &request_id,
        "/reset",
        "All data reset to defaults",
        result,
    )
}

pub(crate) async fn reset_todos_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = state.reset.reset_todos().map(|_| ());
    reset_response(
        &state,
        &request_id,
        "/reset/todos",
        "Todos reset to defaults",
        result,
    )
}

pub(crate) async fn reset_todo_types_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = state.reset.reset_todo_types().map(|_| ());
    reset_response(
        &state,
        &request_id,
        "/reset/todo-types",
        "Todo types reset to defaults",
        result,
    )
}
