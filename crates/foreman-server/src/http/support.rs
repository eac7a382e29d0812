// SPDX-License-Identifier: Apache-2.0

use crate::AppState;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use foreman_api::{map_engine_error, ErrorBody};
use foreman_engine::EngineError;
use foreman_model::UserId;
use serde_json::Value;
use std::collections::HashMap;
use tracing::error;

pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| {
            let id = state
                .request_id_seed
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            format!("req-{id:016x}")
        })
}

pub(crate) fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Boolean query flags match the original service: the exact string "true"
/// and nothing else.
pub(crate) fn bool_query_flag(params: &HashMap<String, String>, name: &str) -> bool {
    params.get(name).is_some_and(|v| v == "true")
}

/// The acting user: `userId` query parameter first, `x-user-id` header as
/// the fallback. Unparseable ids are treated as absent.
pub(crate) fn requester(params: &HashMap<String, String>, headers: &HeaderMap) -> Option<UserId> {
    requester_str(params, headers).and_then(|raw| UserId::parse(&raw).ok())
}

pub(crate) fn requester_str(
    params: &HashMap<String, String>,
    headers: &HeaderMap,
) -> Option<String> {
    params
        .get("userId")
        .filter(|v| !v.is_empty())
        .cloned()
        .or_else(|| header_user(headers))
}

pub(crate) fn header_user(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// The acting user for body-carrying mutations: `userId` in the body first,
/// the `x-user-id` header as the fallback.
pub(crate) fn body_user(body: &Value, headers: &HeaderMap) -> Option<String> {
    body.get("userId")
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .or_else(|| header_user(headers))
}

pub(crate) fn error_response(status: u16, body: ErrorBody) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}

pub(crate) fn engine_error_response(route: &str, err: &EngineError) -> Response {
    if let EngineError::Store(store_err) = err {
        error!(route, error = %store_err, "storage failure");
    }
    let (status, body) = map_engine_error(err);
    error_response(status, body)
}

/// Permissive CORS in the manner of the original service: any origin unless
/// the config narrows the list, with preflights answered inline.
pub(crate) async fn cors_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    let allow = allowed_origin(&state.config.cors_allowed_origins, origin.as_deref());

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    if let Some(allow) = allow {
        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(&allow) {
            headers.insert("access-control-allow-origin", value);
        }
        headers.insert(
            "access-control-allow-methods",
            HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
        );
        headers.insert(
            "access-control-allow-headers",
            HeaderValue::from_static("content-type, x-user-id, x-request-id"),
        );
    }
    response
}

fn allowed_origin(allowed: &[String], origin: Option<&str>) -> Option<String> {
    if allowed.is_empty() {
        return Some("*".to_string());
    }
    origin
        .filter(|o| allowed.iter().any(|a| a == o))
        .map(ToString::to_string)
}
