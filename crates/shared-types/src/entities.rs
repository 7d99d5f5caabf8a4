//! # Core Value Types
//!
//! ## Clusters
//!
//! - **Identity**: `Email`, `Credentials`
//! - **Boards**: `BoardId`, `BoardTitle`, `ColumnKind`, `ColumnLimit`
//! - **Tasks**: `TaskId`

use crate::errors::TypeError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

// =============================================================================
// CASE-INSENSITIVE KEYS
// =============================================================================

/// Declares a string key that keeps its original spelling for display while
/// comparing, ordering, and hashing by its lowercase form.
macro_rules! case_insensitive_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub struct $name {
            raw: String,
            folded: String,
        }

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                let raw = raw.into();
                let folded = raw.to_lowercase();
                Self { raw, folded }
            }

            /// The spelling supplied by the caller.
            pub fn as_str(&self) -> &str {
                &self.raw
            }

            pub fn is_empty(&self) -> bool {
                self.raw.trim().is_empty()
            }

            /// Length in characters, not bytes.
            pub fn char_len(&self) -> usize {
                self.raw.chars().count()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.folded == other.folded
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.folded.cmp(&other.folded)
            }
        }

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.folded.hash(state);
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::new(raw)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::new(raw)
            }
        }

        impl From<$name> for String {
            fn from(key: $name) -> Self {
                key.raw
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.raw)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.raw)
            }
        }
    };
}

case_insensitive_key!(
    /// A user's email address. Unique key of the user directory.
    ///
    /// `Alice@Example.com` and `alice@example.com` name the same user.
    Email
);

case_insensitive_key!(
    /// A board title. Unique per owner, compared without regard to case.
    BoardTitle
);

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Process-unique board identifier, assigned once and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(pub u64);

impl BoardId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task identifier, unique within its board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

/// Opaque credential blob supplied by the identity component.
///
/// The directory never inspects it; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(Vec<u8>);

impl Credentials {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Credentials {
    fn from(secret: &str) -> Self {
        Self(secret.as_bytes().to_vec())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials(<redacted>)")
    }
}

// =============================================================================
// COLUMNS
// =============================================================================

/// The three work-state columns of a board, in workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Backlog,
    InProgress,
    Done,
}

impl ColumnKind {
    /// All columns in workflow order.
    pub const ALL: [ColumnKind; 3] = [ColumnKind::Backlog, ColumnKind::InProgress, ColumnKind::Done];

    /// Zero-based position of the column on the board.
    pub fn ordinal(self) -> usize {
        match self {
            ColumnKind::Backlog => 0,
            ColumnKind::InProgress => 1,
            ColumnKind::Done => 2,
        }
    }

    /// The column a task moves to when advanced. `Done` is terminal.
    pub fn next(self) -> Option<ColumnKind> {
        match self {
            ColumnKind::Backlog => Some(ColumnKind::InProgress),
            ColumnKind::InProgress => Some(ColumnKind::Done),
            ColumnKind::Done => None,
        }
    }
}

impl TryFrom<i64> for ColumnKind {
    type Error = TypeError;

    fn try_from(ordinal: i64) -> Result<Self, Self::Error> {
        match ordinal {
            0 => Ok(ColumnKind::Backlog),
            1 => Ok(ColumnKind::InProgress),
            2 => Ok(ColumnKind::Done),
            other => Err(TypeError::InvalidColumn(other)),
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Backlog => f.write_str("backlog"),
            ColumnKind::InProgress => f.write_str("in progress"),
            ColumnKind::Done => f.write_str("done"),
        }
    }
}

/// Optional capacity of a column.
///
/// Stored as `-1` (unlimited) or a non-negative count when it crosses the
/// persistence boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ColumnLimit {
    #[default]
    Unlimited,
    AtMost(usize),
}

impl ColumnLimit {
    /// Sentinel used by the persistence mirror for "no limit".
    pub const UNLIMITED_RAW: i64 = -1;

    /// Whether a column currently holding `len` tasks may accept one more.
    pub fn admits_one_more(self, len: usize) -> bool {
        match self {
            ColumnLimit::Unlimited => true,
            ColumnLimit::AtMost(max) => len < max,
        }
    }

    /// Whether a column holding `len` tasks satisfies this limit.
    pub fn allows(self, len: usize) -> bool {
        match self {
            ColumnLimit::Unlimited => true,
            ColumnLimit::AtMost(max) => len <= max,
        }
    }

    pub fn to_raw(self) -> i64 {
        match self {
            ColumnLimit::Unlimited => Self::UNLIMITED_RAW,
            ColumnLimit::AtMost(max) => i64::try_from(max).unwrap_or(i64::MAX),
        }
    }
}

impl TryFrom<i64> for ColumnLimit {
    type Error = TypeError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            Self::UNLIMITED_RAW => Ok(ColumnLimit::Unlimited),
            n if n >= 0 => usize::try_from(n)
                .map(ColumnLimit::AtMost)
                .map_err(|_| TypeError::InvalidLimit(n)),
            n => Err(TypeError::InvalidLimit(n)),
        }
    }
}

impl From<ColumnLimit> for i64 {
    fn from(limit: ColumnLimit) -> Self {
        limit.to_raw()
    }
}

impl fmt::Display for ColumnLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnLimit::Unlimited => f.write_str("unlimited"),
            ColumnLimit::AtMost(max) => write!(f, "{}", max),
        }
    }
}
