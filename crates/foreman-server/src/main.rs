// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use foreman_engine::SystemClock;
use foreman_server::{build_router, AppState, ServerConfig};
use foreman_store::JsonFileStore;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_list(name: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("FOREMAN_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let config = ServerConfig {
        port: env_u16("FOREMAN_PORT", 5000),
        data_dir: PathBuf::from(
            env::var("FOREMAN_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
        ),
        enable_reset: env_bool("FOREMAN_ENABLE_RESET", false),
        max_body_bytes: env_usize("FOREMAN_MAX_BODY_BYTES", 1024 * 1024),
        cors_allowed_origins: env_list("FOREMAN_CORS_ALLOWED_ORIGINS"),
    };
    config.validate()?;

    let store = Arc::new(JsonFileStore::new(config.data_dir.clone()));
    let port = config.port;
    let enable_reset = config.enable_reset;
    let state = AppState::new(store, Arc::new(SystemClock), config);
    let app = build_router(state);

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| format!("bind failed on port {port}: {e}"))?;
    info!("foreman-server listening on 0.0.0.0:{port}");
    if enable_reset {
        info!("reset endpoints enabled at POST /reset");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))
}
