//! Configuration for the board directory.

use serde::{Deserialize, Serialize};
use std::env;

/// Directory configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// First id handed out by a fresh allocator
    pub first_board_id: u64,
    /// Largest id the allocator may hand out (inclusive)
    pub max_board_id: u64,
    /// Maximum board and task title length, in characters
    pub max_title_len: usize,
    /// Maximum task description length, in characters
    pub max_description_len: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            first_board_id: 0,
            max_board_id: u64::MAX,
            max_title_len: 50,
            max_description_len: 300,
        }
    }
}

impl DirectoryConfig {
    /// Create configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    ///
    /// - `KB_FIRST_BOARD_ID`
    /// - `KB_MAX_BOARD_ID`
    /// - `KB_MAX_TITLE_LEN`
    /// - `KB_MAX_DESCRIPTION_LEN`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            first_board_id: parse_var("KB_FIRST_BOARD_ID").unwrap_or(defaults.first_board_id),
            max_board_id: parse_var("KB_MAX_BOARD_ID").unwrap_or(defaults.max_board_id),
            max_title_len: parse_var("KB_MAX_TITLE_LEN").unwrap_or(defaults.max_title_len),
            max_description_len: parse_var("KB_MAX_DESCRIPTION_LEN")
                .unwrap_or(defaults.max_description_len),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
