//! Error types for the board directory.

use kb_01_ordered_index::IndexError;
use serde::Serialize;
use shared_types::{BoardId, BoardTitle, ColumnKind, Email, TaskId};
use std::fmt;
use thiserror::Error;

/// Stable classification of every [`DirectoryError`].
///
/// Callers that only need to branch on the failure class (the service layer,
/// metrics labels) match on this instead of on the individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    AlreadyJoined,
    AlreadyLoggedIn,
    NotLoggedIn,
    AllocatorExhausted,
    InvariantViolation,
    Persistence,
    PermissionDenied,
    LimitExceeded,
    InvalidTransition,
    InvalidArgument,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::AlreadyJoined => "already_joined",
            ErrorKind::AlreadyLoggedIn => "already_logged_in",
            ErrorKind::NotLoggedIn => "not_logged_in",
            ErrorKind::AllocatorExhausted => "allocator_exhausted",
            ErrorKind::InvariantViolation => "invariant_violation",
            ErrorKind::Persistence => "persistence",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::LimitExceeded => "limit_exceeded",
            ErrorKind::InvalidTransition => "invalid_transition",
            ErrorKind::InvalidArgument => "invalid_argument",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the persistence mirror.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

/// Directory errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------
    #[error("A user with the email '{email}' doesn't exist in the system")]
    UserNotFound { email: Email },

    #[error("A user with the email '{email}' already exists in the system")]
    UserAlreadyExists { email: Email },

    // -------------------------------------------------------------------------
    // Boards and membership
    // -------------------------------------------------------------------------
    #[error("Board number {board_id} doesn't exist")]
    BoardNotFound { board_id: BoardId },

    #[error("Board number {board_id} already exists")]
    BoardAlreadyExists { board_id: BoardId },

    #[error("A board titled '{title}' doesn't exist for the user with the email {email}")]
    BoardTitleNotFound { email: Email, title: BoardTitle },

    #[error("A board titled '{title}' already exists for the user with the email {email}")]
    BoardTitleTaken { email: Email, title: BoardTitle },

    #[error("{email} is already joined to board number {board_id}")]
    AlreadyJoined { email: Email, board_id: BoardId },

    #[error("{email} is not a member of board number {board_id}")]
    NotMember { email: Email, board_id: BoardId },

    #[error("{email} is not the owner of board number {board_id}")]
    NotOwner { email: Email, board_id: BoardId },

    // -------------------------------------------------------------------------
    // Sessions
    // -------------------------------------------------------------------------
    #[error("The user with the email '{email}' is already logged in")]
    AlreadyLoggedIn { email: Email },

    #[error("The user with the email '{email}' is not logged in")]
    NotLoggedIn { email: Email },

    // -------------------------------------------------------------------------
    // Board id allocation
    // -------------------------------------------------------------------------
    #[error("Board id space exhausted (maximum id {max})")]
    AllocatorExhausted { max: u64 },

    // -------------------------------------------------------------------------
    // Columns and tasks
    // -------------------------------------------------------------------------
    #[error("Task {task_id} doesn't exist in the {column} column of board number {board_id}")]
    TaskNotFound {
        board_id: BoardId,
        column: ColumnKind,
        task_id: TaskId,
    },

    #[error("The {column} column of board number {board_id} is full (limit {limit})")]
    ColumnFull {
        board_id: BoardId,
        column: ColumnKind,
        limit: usize,
    },

    #[error(
        "Cannot limit the {column} column of board number {board_id} to {limit}: it holds {current} tasks"
    )]
    LimitBelowCurrent {
        board_id: BoardId,
        column: ColumnKind,
        limit: usize,
        current: usize,
    },

    #[error("Task {task_id} on board number {board_id} is done and can't be changed")]
    TaskDone { board_id: BoardId, task_id: TaskId },

    #[error("{email} is not the assignee of task {task_id}")]
    NotAssignee { email: Email, task_id: TaskId },

    #[error("Invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    // -------------------------------------------------------------------------
    // Fatal and external
    // -------------------------------------------------------------------------
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] RepositoryError),
}

impl DirectoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DirectoryError::UserNotFound { .. }
            | DirectoryError::BoardNotFound { .. }
            | DirectoryError::BoardTitleNotFound { .. }
            | DirectoryError::NotMember { .. }
            | DirectoryError::TaskNotFound { .. } => ErrorKind::NotFound,
            DirectoryError::UserAlreadyExists { .. }
            | DirectoryError::BoardAlreadyExists { .. }
            | DirectoryError::BoardTitleTaken { .. } => ErrorKind::AlreadyExists,
            DirectoryError::AlreadyJoined { .. } => ErrorKind::AlreadyJoined,
            DirectoryError::AlreadyLoggedIn { .. } => ErrorKind::AlreadyLoggedIn,
            DirectoryError::NotLoggedIn { .. } => ErrorKind::NotLoggedIn,
            DirectoryError::AllocatorExhausted { .. } => ErrorKind::AllocatorExhausted,
            DirectoryError::NotOwner { .. } | DirectoryError::NotAssignee { .. } => {
                ErrorKind::PermissionDenied
            }
            DirectoryError::ColumnFull { .. } | DirectoryError::LimitBelowCurrent { .. } => {
                ErrorKind::LimitExceeded
            }
            DirectoryError::TaskDone { .. } => ErrorKind::InvalidTransition,
            DirectoryError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            DirectoryError::InvariantViolation(_) => ErrorKind::InvariantViolation,
            DirectoryError::Persistence(_) => ErrorKind::Persistence,
        }
    }

    /// Translate an index failure that the caller had already ruled out.
    ///
    /// Used where a preceding check guarantees the key is present (or
    /// absent); reaching it means the indices disagree with each other.
    pub(crate) fn from_index(error: IndexError, context: impl fmt::Display) -> Self {
        DirectoryError::InvariantViolation(format!("{context}: {error}"))
    }
}
