//! Inbound Ports (Driving Ports / API)
//!
//! What the request-dispatch layer calls. Every method is a complete,
//! atomic directory operation; implementations serialize mutations.

use crate::domain::board::{Board, NewTask, Task, TaskUpdate};
use crate::domain::entities::User;
use crate::domain::errors::DirectoryError;
use crate::domain::snapshot::{BoardView, UserBoards};
use shared_types::{BoardId, BoardTitle, ColumnKind, ColumnLimit, Credentials, Email, TaskId};

/// Board directory API.
pub trait DirectoryApi: Send + Sync {
    // Users

    /// Register a user whose credentials were already validated upstream.
    fn add_user(&self, email: Email, credentials: Credentials) -> Result<User, DirectoryError>;

    /// Remove a user, deleting its boards and leaving the boards it joined.
    fn remove_user(&self, email: &Email) -> Result<(), DirectoryError>;

    fn get_user(&self, email: &Email) -> Result<User, DirectoryError>;

    fn contains_user(&self, email: &Email) -> bool;

    /// All users in ascending email order.
    fn list_users(&self) -> Vec<User>;

    // Boards

    fn add_owned_board(&self, email: &Email, title: BoardTitle) -> Result<Board, DirectoryError>;

    fn remove_owned_board(&self, email: &Email, title: &BoardTitle) -> Result<(), DirectoryError>;

    /// Delete a board by id, whoever owns it.
    fn remove_board(&self, board_id: BoardId) -> Result<(), DirectoryError>;

    fn get_board(&self, board_id: BoardId) -> Result<Board, DirectoryError>;

    fn join_board(&self, email: &Email, board_id: BoardId) -> Result<(), DirectoryError>;

    fn leave_board(&self, email: &Email, board_id: BoardId) -> Result<(), DirectoryError>;

    fn transfer_ownership(&self, owner: &Email, board_id: BoardId, new_owner: &Email) -> Result<(), DirectoryError>;

    fn limit_column(
        &self,
        email: &Email,
        board_id: BoardId,
        column: ColumnKind,
        limit: ColumnLimit,
    ) -> Result<(), DirectoryError>;

    // Tasks

    fn add_task(&self, email: &Email, board_id: BoardId, task: NewTask) -> Result<Task, DirectoryError>;

    /// Move a task to the next column; returns the column it landed in.
    fn advance_task(
        &self,
        email: &Email,
        board_id: BoardId,
        column: ColumnKind,
        task_id: TaskId,
    ) -> Result<ColumnKind, DirectoryError>;

    fn assign_task(
        &self,
        email: &Email,
        board_id: BoardId,
        column: ColumnKind,
        task_id: TaskId,
        assignee: &Email,
    ) -> Result<(), DirectoryError>;

    fn update_task(
        &self,
        email: &Email,
        board_id: BoardId,
        column: ColumnKind,
        task_id: TaskId,
        update: TaskUpdate,
    ) -> Result<(), DirectoryError>;

    // Sessions

    fn set_logged_in(&self, email: &Email) -> Result<(), DirectoryError>;

    fn set_logged_out(&self, email: &Email) -> Result<(), DirectoryError>;

    fn is_logged_in(&self, email: &Email) -> bool;

    // Snapshots

    fn user_boards(&self, email: &Email) -> Result<UserBoards, DirectoryError>;

    fn board_view(&self, board_id: BoardId) -> Result<BoardView, DirectoryError>;
}
