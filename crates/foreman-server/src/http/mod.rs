// SPDX-License-Identifier: Apache-2.0

use crate::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use foreman_api::{ErrorBody, HealthBody};

pub(crate) mod reset;
pub(crate) mod support;
pub(crate) mod todo_types;
pub(crate) mod todos;

pub(crate) async fn health_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let request_id = support::propagated_request_id(&headers, &state);
    let resp = Json(HealthBody::running(state.clock.now())).into_response();
    support::with_request_id(resp, &request_id)
}

pub(crate) async fn not_found_handler() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Route not found"))).into_response()
}
