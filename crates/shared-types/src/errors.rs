//! # Error Types
//!
//! Parse errors for the shared value types.

use thiserror::Error;

/// Errors raised when building a shared value type from raw input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Column ordinal outside `0..=2`.
    #[error("Invalid column ordinal: {0} (expected 0 = backlog, 1 = in progress, 2 = done)")]
    InvalidColumn(i64),

    /// Column limit below `-1`.
    #[error("Invalid column limit: {0} (expected -1 for unlimited or a non-negative value)")]
    InvalidLimit(i64),
}
