// src/config.rs
use crate::errors::{ConvertError, Result};

/// High-level application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    pub port: u16,

    /// Interpreter used to run submitted scripts.
    pub python_bin: String,

    /// Hard wall-clock limit for one child process, in seconds.
    pub timeout_secs: u64,

    /// Whether the auto-runner epilogue is appended to prepared scripts.
    pub auto_run: bool,
}

impl AppConfig {
    /// Load configuration from environment variables, with defaults matching
    /// a local deployment.
    pub fn from_env() -> Result<Self> {
        let bind_addr =
            std::env::var("INKPRESS_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("INKPRESS_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConvertError::Config(format!("invalid INKPRESS_PORT: {raw}")))?,
            Err(_) => 8080,
        };
        let python_bin =
            std::env::var("INKPRESS_PYTHON").unwrap_or_else(|_| "python3".to_string());
        let timeout_secs = match std::env::var("INKPRESS_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                ConvertError::Config(format!("invalid INKPRESS_TIMEOUT_SECS: {raw}"))
            })?,
            Err(_) => 30,
        };
        let auto_run = match std::env::var("INKPRESS_AUTO_RUN") {
            Ok(raw) => matches!(raw.trim(), "1" | "true" | "yes" | "on"),
            Err(_) => true,
        };

        if timeout_secs == 0 {
            return Err(ConvertError::Config(
                "INKPRESS_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(AppConfig {
            bind_addr,
            port,
            python_bin,
            timeout_secs,
            auto_run,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            python_bin: "python3".to_string(),
            timeout_secs: 30,
            auto_run: true,
        }
    }
}
