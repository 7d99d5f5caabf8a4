//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to startup logs
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive such as `kb_02_board_directory=debug`
    pub log_level: String,

    /// Whether to write logs to stdout
    pub console_output: bool,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "kanban-directory".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `KB_SERVICE_NAME`: Service name (default: kanban-directory)
    /// - `KB_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `KB_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `KB_JSON_LOGS`: Enable JSON logs (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            service_name: env::var("KB_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: env::var("KB_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            console_output: env::var("KB_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v, defaults.console_output))
                .unwrap_or(defaults.console_output),

            json_logs: env::var("KB_JSON_LOGS")
                .map(|v| parse_flag(&v, defaults.json_logs))
                .unwrap_or(defaults.json_logs),
        }
    }
}

/// `true`/`1`/`yes` and `false`/`0`/`no`, case-insensitive; anything else
/// keeps the default.
fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => default,
    }
}
