// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! HTTP surface for the foreman todo service.
//!
//! The router mirrors the original API: todo lifecycle under `/todos`,
//! type CRUD under `/todo-types`, a health check, and reset endpoints that
//! are only mounted when [`ServerConfig::enable_reset`] is set.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use foreman_engine::{Clock, ResetService, TodoService, TypeRegistry};
use foreman_store::StorageGateway;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

mod config;
mod http;

pub use config::ServerConfig;

pub const CRATE_NAME: &str = "foreman-server";

#[derive(Clone)]
pub struct AppState {
    pub todos: Arc<TodoService>,
    pub types: Arc<TypeRegistry>,
    pub reset: Arc<ResetService>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<ServerConfig>,
    pub request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(
        store: Arc<dyn StorageGateway>,
        clock: Arc<dyn Clock>,
        config: ServerConfig,
    ) -> Self {
        Self {
            todos: Arc::new(TodoService::new(store.clone(), clock.clone())),
            types: Arc::new(TypeRegistry::new(store.clone())),
            reset: Arc::new(ResetService::new(store, clock.clone())),
            clock,
            config: Arc::new(config),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;
    let mut router = Router::new()
        .route(
            "/todos",
            get(http::todos::list_handler).post(http::todos::create_handler),
        )
        .route(
            "/todos/:id",
            get(http::todos::get_handler).delete(http::todos::delete_handler),
        )
        .route("/todos/:id/complete", put(http::todos::complete_handler))
        .route("/todos/:id/snooze", put(http::todos::snooze_handler))
        .route("/todos/:id/dismiss", put(http::todos::dismiss_handler))
        .route(
            "/todo-types",
            get(http::todo_types::list_handler).post(http::todo_types::create_handler),
        )
        .route(
            "/todo-types/:id",
            get(http::todo_types::get_handler)
                .put(http::todo_types::update_handler)
                .delete(http::todo_types::delete_handler),
        )
        .route("/health", get(http::health_handler));

    if state.config.enable_reset {
        router = router
            .route("/reset", post(http::reset::reset_all_handler))
            .route("/reset/todos", post(http::reset::reset_todos_handler))
            .route(
                "/reset/todo-types",
                post(http::reset::reset_todo_types_handler),
            );
    }

    router
        .fallback(http::not_found_handler)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            http::support::cors_layer,
        ))
        .with_state(state)
}
