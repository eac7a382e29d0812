// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

/// Server configuration. Env overrides are parsed in `main`; everything else
/// gets the defaults below.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory holding `todo.json` and `todotype.json`.
    pub data_dir: PathBuf,
    /// Mounts the POST /reset routes. Off unless explicitly enabled.
    pub enable_reset: bool,
    pub max_body_bytes: usize,
    /// Origins allowed by the CORS layer; empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            data_dir: PathBuf::from("data"),
            enable_reset: false,
            max_body_bytes: 1024 * 1024,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Startup contract; a failure here should abort boot with the message.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("port must be non-zero".to_string());
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir must not be empty".to_string());
        }
        if self.max_body_bytes < 1024 {
            return Err(format!(
                "max_body_bytes must be at least 1024, got {}",
                self.max_body_bytes
            ));
        }
        Ok(())
    }
}
