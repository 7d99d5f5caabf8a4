//! Directory Service
//!
//! Main service implementing DirectoryApi.
//!
//! Every mutation runs the full pipeline under the write lock:
//! 1. Validate and apply in the coordinator
//! 2. Replay the resulting change set against the repository
//! 3. Record metrics and log the outcome
//!
//! Reads take the read lock and return owned values.

use crate::config::DirectoryConfig;
use crate::domain::board::{Board, NewTask, Task, TaskUpdate};
use crate::domain::changes::{Change, ChangeSet, Outcome};
use crate::domain::entities::User;
use crate::domain::errors::{DirectoryError, ErrorKind};
use crate::domain::membership::MembershipCoordinator;
use crate::domain::snapshot::{BoardView, UserBoards};
use crate::ports::inbound::DirectoryApi;
use crate::ports::outbound::DirectoryRepository;
use parking_lot::RwLock;
use shared_types::{BoardId, BoardTitle, ColumnKind, ColumnLimit, Credentials, Email, TaskId};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Board directory service.
///
/// `parking_lot`'s `RwLock` is eventually fair, so a steady stream of
/// readers cannot starve a waiting writer.
pub struct DirectoryService<R: DirectoryRepository> {
    coordinator: RwLock<MembershipCoordinator>,
    repository: Arc<R>,
}

impl<R: DirectoryRepository> DirectoryService<R> {
    /// Create a service over an empty directory.
    ///
    /// Nothing is read from `repository`; use [`open`](Self::open) to
    /// resume from an existing mirror.
    pub fn new(repository: Arc<R>, config: DirectoryConfig) -> Self {
        Self {
            coordinator: RwLock::new(MembershipCoordinator::new(config)),
            repository,
        }
    }

    /// Rebuild the directory from every row in `repository`.
    pub fn open(repository: Arc<R>, config: DirectoryConfig) -> Result<Self, DirectoryError> {
        let records = repository.load().inspect_err(|e| {
            error!(error = %e, "Failed to load the persistence mirror");
        })?;
        let row_count = records.len();
        let coordinator = MembershipCoordinator::restore(records, config)?;
        info!(rows = row_count, "Directory service opened");

        let service = Self {
            coordinator: RwLock::new(coordinator),
            repository,
        };
        service.refresh_gauges(&service.coordinator.read());
        Ok(service)
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Run every cross-index invariant check under the read lock.
    pub fn verify(&self) -> Result<(), DirectoryError> {
        self.coordinator.read().verify()
    }

    /// Run `mutation` under the write lock and mirror its changes.
    ///
    /// A repository failure leaves the in-memory change committed. Every
    /// write of the set is still attempted and the caller gets
    /// [`DirectoryError::Persistence`] carrying the first failure.
    fn mutate<T>(
        &self,
        operation: &'static str,
        mutation: impl FnOnce(&mut MembershipCoordinator) -> Result<Outcome<T>, DirectoryError>,
    ) -> Result<T, DirectoryError> {
        let mut coordinator = self.coordinator.write();
        let result = mutation(&mut *coordinator).and_then(|outcome| {
            self.persist(operation, &outcome.changes)?;
            Ok(outcome.value)
        });
        self.refresh_gauges(&coordinator);
        drop(coordinator);

        record(operation, &result);
        result
    }

    /// Run `query` under the read lock.
    fn read<T>(
        &self,
        operation: &'static str,
        query: impl FnOnce(&MembershipCoordinator) -> Result<T, DirectoryError>,
    ) -> Result<T, DirectoryError> {
        let result = query(&*self.coordinator.read());
        record(operation, &result);
        result
    }

    fn persist(&self, operation: &'static str, changes: &ChangeSet) -> Result<(), DirectoryError> {
        let mut first_failure = None;
        for change in changes {
            let written = match change {
                Change::Save(record) => self.repository.save(record),
                Change::Delete(key) => self.repository.delete(key),
            };
            if let Err(e) = written {
                kb_telemetry::record_persistence_failure();
                error!(operation, error = %e, change = ?change, "Mirror write failed; in-memory change kept");
                first_failure.get_or_insert(e);
            }
        }
        match first_failure {
            Some(e) => Err(DirectoryError::Persistence(e)),
            None => Ok(()),
        }
    }

    fn refresh_gauges(&self, coordinator: &MembershipCoordinator) {
        let directory = coordinator.directory();
        kb_telemetry::set_directory_size(directory.user_count(), directory.board_count());
    }
}

/// Count the operation and log rejections.
fn record<T>(operation: &'static str, result: &Result<T, DirectoryError>) {
    match result {
        Ok(_) => kb_telemetry::record_operation(operation, "ok"),
        Err(e) => {
            let kind = e.kind();
            kb_telemetry::record_operation(operation, kind.as_str());
            match kind {
                // Already logged at error level where they were detected.
                ErrorKind::InvariantViolation | ErrorKind::Persistence => {}
                _ => warn!(operation, %kind, error = %e, "Directory request rejected"),
            }
        }
    }
}

/// Wrap an operation that has nothing to mirror.
fn unmirrored(result: Result<(), DirectoryError>) -> Result<Outcome<()>, DirectoryError> {
    result.map(|()| Outcome::unit(ChangeSet::new()))
}

impl<R: DirectoryRepository> DirectoryApi for DirectoryService<R> {
    fn add_user(&self, email: Email, credentials: Credentials) -> Result<User, DirectoryError> {
        self.mutate("add_user", |c| c.register_user(email, credentials))
    }

    fn remove_user(&self, email: &Email) -> Result<(), DirectoryError> {
        self.mutate("remove_user", |c| c.remove_user(email))
    }

    fn get_user(&self, email: &Email) -> Result<User, DirectoryError> {
        self.read("get_user", |c| c.get_user(email))
    }

    fn contains_user(&self, email: &Email) -> bool {
        self.coordinator.read().directory().contains_user(email)
    }

    fn list_users(&self) -> Vec<User> {
        self.coordinator.read().list_users()
    }

    fn add_owned_board(&self, email: &Email, title: BoardTitle) -> Result<Board, DirectoryError> {
        self.mutate("add_owned_board", |c| c.add_owned_board(email, title))
    }

    fn remove_owned_board(&self, email: &Email, title: &BoardTitle) -> Result<(), DirectoryError> {
        self.mutate("remove_owned_board", |c| c.remove_owned_board(email, title))
    }

    fn remove_board(&self, board_id: BoardId) -> Result<(), DirectoryError> {
        self.mutate("remove_board", |c| c.remove_board(board_id))
    }

    fn get_board(&self, board_id: BoardId) -> Result<Board, DirectoryError> {
        self.read("get_board", |c| c.get_board(board_id))
    }

    fn join_board(&self, email: &Email, board_id: BoardId) -> Result<(), DirectoryError> {
        self.mutate("join_board", |c| c.join_board(email, board_id))
    }

    fn leave_board(&self, email: &Email, board_id: BoardId) -> Result<(), DirectoryError> {
        self.mutate("leave_board", |c| c.leave_board(email, board_id))
    }

    fn transfer_ownership(&self, owner: &Email, board_id: BoardId, new_owner: &Email) -> Result<(), DirectoryError> {
        self.mutate("transfer_ownership", |c| {
            c.transfer_ownership(owner, board_id, new_owner)
        })
    }

    fn limit_column(
        &self,
        email: &Email,
        board_id: BoardId,
        column: ColumnKind,
        limit: ColumnLimit,
    ) -> Result<(), DirectoryError> {
        self.mutate("limit_column", |c| c.limit_column(email, board_id, column, limit))
    }

    fn add_task(&self, email: &Email, board_id: BoardId, task: NewTask) -> Result<Task, DirectoryError> {
        self.mutate("add_task", |c| c.add_task(email, board_id, task))
    }

    fn advance_task(
        &self,
        email: &Email,
        board_id: BoardId,
        column: ColumnKind,
        task_id: TaskId,
    ) -> Result<ColumnKind, DirectoryError> {
        self.mutate("advance_task", |c| c.advance_task(email, board_id, column, task_id))
    }

    fn assign_task(
        &self,
        email: &Email,
        board_id: BoardId,
        column: ColumnKind,
        task_id: TaskId,
        assignee: &Email,
    ) -> Result<(), DirectoryError> {
        self.mutate("assign_task", |c| {
            c.assign_task(email, board_id, column, task_id, assignee)
        })
    }

    fn update_task(
        &self,
        email: &Email,
        board_id: BoardId,
        column: ColumnKind,
        task_id: TaskId,
        update: TaskUpdate,
    ) -> Result<(), DirectoryError> {
        self.mutate("update_task", |c| {
            c.update_task(email, board_id, column, task_id, update)
        })
    }

    fn set_logged_in(&self, email: &Email) -> Result<(), DirectoryError> {
        self.mutate("set_logged_in", |c| unmirrored(c.set_logged_in(email)))
    }

    fn set_logged_out(&self, email: &Email) -> Result<(), DirectoryError> {
        self.mutate("set_logged_out", |c| unmirrored(c.set_logged_out(email)))
    }

    fn is_logged_in(&self, email: &Email) -> bool {
        self.coordinator.read().is_logged_in(email)
    }

    fn user_boards(&self, email: &Email) -> Result<UserBoards, DirectoryError> {
        self.read("user_boards", |c| c.user_boards(email))
    }

    fn board_view(&self, board_id: BoardId) -> Result<BoardView, DirectoryError> {
        self.read("board_view", |c| c.board_view(board_id))
    }
}
