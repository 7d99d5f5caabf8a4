//! # Kanban Telemetry
//!
//! Logging and metrics for the board directory.
//!
//! ## Components
//!
//! - **Logs**: `tracing` events rendered by a `tracing-subscriber` registry,
//!   pretty for development or JSON for log shippers.
//! - **Metrics**: Prometheus counters and gauges on a private registry,
//!   exposed in text format by [`gather_metrics`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kb_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> Result<(), kb_telemetry::TelemetryError> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // directory code runs here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `KB_SERVICE_NAME` | `kanban-directory` | Service name attached to startup logs |
//! | `KB_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `KB_JSON_LOGS` | `false` | Emit JSON lines instead of pretty output |
//! | `KB_CONSOLE_OUTPUT` | `true` | Write logs to stdout at all |

mod config;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    gather_metrics, record_operation, record_persistence_failure, register_metrics,
    set_directory_size, DIRECTORY_BOARDS, DIRECTORY_OPERATIONS, DIRECTORY_USERS,
    PERSISTENCE_FAILURES,
};
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors.
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Failed to encode metrics: {0}")]
    Encode(String),
}

/// Registers the directory metrics and installs the global subscriber.
///
/// Calling it twice fails at the subscriber step; metric registration is
/// idempotent.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_tracing(config)
}
