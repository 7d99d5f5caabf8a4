//! Prometheus metrics for the board directory.
//!
//! All metrics follow the naming convention: `kb_directory_<metric>[_total]`
//!
//! - **Counter**: operations by name and outcome, persistence failures
//! - **Gauge**: current number of users and boards

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Gauge, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Registry private to the directory metrics
    static ref REGISTRY: Registry = Registry::new();

    /// Directory operations by name and outcome
    pub static ref DIRECTORY_OPERATIONS: CounterVec = CounterVec::new(
        Opts::new("kb_directory_operations_total", "Directory operations by name and outcome"),
        &["operation", "outcome"]  // outcome: ok or the error kind
    ).expect("metric creation failed");

    /// Users currently held by the directory
    pub static ref DIRECTORY_USERS: Gauge = Gauge::new(
        "kb_directory_users",
        "Number of users in the directory"
    ).expect("metric creation failed");

    /// Boards currently held by the directory
    pub static ref DIRECTORY_BOARDS: Gauge = Gauge::new(
        "kb_directory_boards",
        "Number of boards in the directory"
    ).expect("metric creation failed");

    /// Repository calls that failed after the in-memory change was committed
    pub static ref PERSISTENCE_FAILURES: Counter = Counter::new(
        "kb_directory_persistence_failures_total",
        "Repository saves or deletes that failed"
    ).expect("metric creation failed");
}

/// Register all directory metrics with the private registry.
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(DIRECTORY_OPERATIONS.clone()),
        Box::new(DIRECTORY_USERS.clone()),
        Box::new(DIRECTORY_BOARDS.clone()),
        Box::new(PERSISTENCE_FAILURES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Count one directory operation. `outcome` is `"ok"` or an error kind.
pub fn record_operation(operation: &str, outcome: &str) {
    DIRECTORY_OPERATIONS
        .with_label_values(&[operation, outcome])
        .inc();
}

pub fn record_persistence_failure() {
    PERSISTENCE_FAILURES.inc();
}

pub fn set_directory_size(users: usize, boards: usize) {
    DIRECTORY_USERS.set(users as f64);
    DIRECTORY_BOARDS.set(boards as f64);
}

/// Encode all registered metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    register_metrics()?;
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::Encode(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::Encode(e.to_string()))
}
