//! # Membership Coordinator
//!
//! Owns the [`EntityDirectory`] and the [`SessionRegistry`] and is the only
//! place composite mutations happen. Every public mutation:
//!
//! 1. validates everything it is about to touch,
//! 2. applies the change to every affected view,
//! 3. returns an [`Outcome`] with the mirror rows it touched.
//!
//! A failure in step 1 leaves the coordinator untouched. Step 2 only runs
//! operations already proven to succeed; if one fails anyway the indices
//! disagreed before the call and the error is an invariant violation.

use super::board::{Board, NewTask, Task, TaskUpdate};
use super::changes::{ChangeSet, CounterRecord, EntityKey, EntityRecord, Outcome, UserRecord};
use super::directory::EntityDirectory;
use super::entities::User;
use super::errors::DirectoryError;
use super::invariants;
use super::sessions::SessionRegistry;
use super::snapshot::{BoardSummary, BoardView, UserBoards};
use crate::config::DirectoryConfig;
use chrono::Utc;
use shared_types::{BoardId, BoardTitle, ColumnKind, ColumnLimit, Credentials, Email, TaskId};
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct MembershipCoordinator {
    directory: EntityDirectory,
    sessions: SessionRegistry,
    config: DirectoryConfig,
}

impl MembershipCoordinator {
    pub fn new(config: DirectoryConfig) -> Self {
        Self {
            directory: EntityDirectory::new(&config),
            sessions: SessionRegistry::new(),
            config,
        }
    }

    /// Rebuilds a coordinator from persisted rows.
    ///
    /// Users are inserted first, then boards in id order (validating their
    /// owner and member links), then the allocator resumes at the furthest
    /// of the persisted cursor, one past the highest board id, and the
    /// configured first id. Any inconsistency in the rows refuses the load,
    /// including a board title that `add_owned_board` would reject.
    ///
    /// The mirror does not record view order, so after a restore every
    /// user's "my boards" and "joined boards" list in ascending board id.
    pub fn restore(records: Vec<EntityRecord>, config: DirectoryConfig) -> Result<Self, DirectoryError> {
        let mut coordinator = Self::new(config);
        let mut boards = Vec::new();
        let mut cursor = None;

        for record in records {
            match record {
                EntityRecord::User(user) => {
                    let email = user.email.clone();
                    coordinator
                        .directory
                        .add_user(user.email, user.credentials)
                        .map_err(|e| corrupt(format!("user row {email}"), e))?;
                }
                EntityRecord::Board(board) => boards.push(board),
                EntityRecord::Counter(counter) => cursor = Some(counter.next_board_id),
            }
        }

        boards.sort_by_key(|board| board.id);
        for record in boards {
            let board_id = record.id;
            let rejected = |e| corrupt(format!("board row {board_id}"), e);
            coordinator.check_title(&record.title).map_err(rejected)?;
            coordinator
                .directory
                .add_board(Board::from_record(record))
                .map_err(rejected)?;
        }
        if let Some(cursor) = cursor {
            coordinator.directory.allocator_mut().resume_at(cursor);
        }

        coordinator.verify()?;
        info!(
            users = coordinator.directory.user_count(),
            boards = coordinator.directory.board_count(),
            next_board_id = ?coordinator.directory.allocator().peek(),
            "Directory restored"
        );
        Ok(coordinator)
    }

    pub fn directory(&self) -> &EntityDirectory {
        &self.directory
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Runs every cross-index invariant check.
    pub fn verify(&self) -> Result<(), DirectoryError> {
        invariants::verify(&self.directory).inspect_err(|e| {
            error!(error = %e, "Directory invariants violated");
        })
    }

    // =========================================================================
    // USERS
    // =========================================================================

    pub fn register_user(&mut self, email: Email, credentials: Credentials) -> Result<Outcome<User>, DirectoryError> {
        if email.is_empty() {
            return Err(invalid("email", "must not be empty"));
        }
        let user = self.directory.add_user(email, credentials)?.clone();

        let mut changes = ChangeSet::new();
        changes.save(user_record(&user));
        debug!(email = %user.email(), "User registered");
        Ok(Outcome::new(user, changes))
    }

    /// Removes a user: its owned boards are deleted, it leaves every board
    /// it joined, and its session is dropped.
    pub fn remove_user(&mut self, email: &Email) -> Result<Outcome<()>, DirectoryError> {
        let removal = self.directory.remove_user(email)?;
        self.sessions.forget(email);

        let mut changes = ChangeSet::new();
        for board_id in &removal.left_boards {
            changes.save(board_record(self.directory.get_board(*board_id)?));
        }
        for board in &removal.deleted_boards {
            changes.delete(EntityKey::Board(board.id()));
        }
        changes.delete(EntityKey::User(email.clone()));

        debug!(
            email = %email,
            deleted_boards = removal.deleted_boards.len(),
            left_boards = removal.left_boards.len(),
            "User removed"
        );
        Ok(Outcome::unit(changes))
    }

    pub fn get_user(&self, email: &Email) -> Result<User, DirectoryError> {
        self.directory.get_user(email).cloned()
    }

    /// All users in ascending email order.
    pub fn list_users(&self) -> Vec<User> {
        self.directory.users().cloned().collect()
    }

    // =========================================================================
    // BOARDS
    // =========================================================================

    /// Creates a board owned by `email`.
    ///
    /// The id is consumed even if the board cannot be inserted afterwards.
    pub fn add_owned_board(&mut self, email: &Email, title: BoardTitle) -> Result<Outcome<Board>, DirectoryError> {
        self.directory.views(email)?;
        self.check_title(&title)?;
        if self.directory.find_owned_board(email, &title).is_ok() {
            return Err(DirectoryError::BoardTitleTaken {
                email: email.clone(),
                title,
            });
        }

        let board_id = self.directory.allocate_board_id()?;
        if self.directory.contains_board(board_id) {
            error!(board_id = %board_id, "Allocator returned an id already in use");
            return Err(DirectoryError::InvariantViolation(format!(
                "allocated board id {board_id} is already in use"
            )));
        }
        let board = self
            .directory
            .add_board(Board::new(board_id, title, email.clone()))?
            .clone();

        let mut changes = ChangeSet::new();
        changes.save(board_record(&board)).save(self.counter_record());
        debug!(email = %email, board_id = %board_id, title = %board.title(), "Board created");
        Ok(Outcome::new(board, changes))
    }

    /// Deletes the board `email` owns under `title`, purging it from every
    /// member's joined view.
    pub fn remove_owned_board(&mut self, email: &Email, title: &BoardTitle) -> Result<Outcome<()>, DirectoryError> {
        let board_id = self.directory.find_owned_board(email, title)?;
        self.remove_board(board_id)
    }

    /// Deletes a board by id regardless of who owns it.
    pub fn remove_board(&mut self, board_id: BoardId) -> Result<Outcome<()>, DirectoryError> {
        let board = self.directory.remove_board(board_id)?;

        let mut changes = ChangeSet::new();
        changes.delete(EntityKey::Board(board_id));
        debug!(
            board_id = %board_id,
            owner = %board.owner(),
            members = board.members().len(),
            "Board removed"
        );
        Ok(Outcome::unit(changes))
    }

    pub fn get_board(&self, board_id: BoardId) -> Result<Board, DirectoryError> {
        self.directory.get_board(board_id).cloned()
    }

    pub fn join_board(&mut self, email: &Email, board_id: BoardId) -> Result<Outcome<()>, DirectoryError> {
        self.directory.views(email)?;
        let board = self.directory.get_board(board_id)?;
        if board.has_access(email) {
            return Err(DirectoryError::AlreadyJoined {
                email: email.clone(),
                board_id,
            });
        }

        self.directory.board_mut(board_id)?.add_member(email.clone());
        self.directory.views_mut(email)?.push_joined(board_id);

        debug!(email = %email, board_id = %board_id, "Board joined");
        self.board_changes(board_id)
    }

    /// Leaves a joined board. The leaver's task assignments on it are
    /// cleared.
    pub fn leave_board(&mut self, email: &Email, board_id: BoardId) -> Result<Outcome<()>, DirectoryError> {
        self.directory.views(email)?;
        if !self.directory.get_board(board_id)?.is_member(email) {
            return Err(DirectoryError::NotMember {
                email: email.clone(),
                board_id,
            });
        }

        let board = self.directory.board_mut(board_id)?;
        board.remove_member(email);
        let unassigned = board.unassign_all(email);
        self.directory.views_mut(email)?.drop_joined(board_id);

        debug!(email = %email, board_id = %board_id, unassigned, "Board left");
        self.board_changes(board_id)
    }

    /// Hands a board to one of its members. The previous owner stays on as a
    /// member.
    pub fn transfer_ownership(
        &mut self,
        owner: &Email,
        board_id: BoardId,
        new_owner: &Email,
    ) -> Result<Outcome<()>, DirectoryError> {
        self.directory.views(owner)?;
        self.directory.views(new_owner)?;
        let board = self.owned_board(owner, board_id)?;
        if !board.is_member(new_owner) {
            return Err(DirectoryError::NotMember {
                email: new_owner.clone(),
                board_id,
            });
        }
        if self.directory.find_owned_board(new_owner, board.title()).is_ok() {
            return Err(DirectoryError::BoardTitleTaken {
                email: new_owner.clone(),
                title: board.title().clone(),
            });
        }

        let board = self.directory.board_mut(board_id)?;
        board.remove_member(new_owner);
        board.add_member(owner.clone());
        board.set_owner(new_owner.clone());

        let views = self.directory.views_mut(new_owner)?;
        views.drop_joined(board_id);
        views.push_owned(board_id);
        let views = self.directory.views_mut(owner)?;
        views.drop_owned(board_id);
        views.push_joined(board_id);

        debug!(from = %owner, to = %new_owner, board_id = %board_id, "Board ownership transferred");
        self.board_changes(board_id)
    }

    pub fn limit_column(
        &mut self,
        email: &Email,
        board_id: BoardId,
        column: ColumnKind,
        limit: ColumnLimit,
    ) -> Result<Outcome<()>, DirectoryError> {
        self.directory.views(email)?;
        self.owned_board(email, board_id)?;
        self.directory.board_mut(board_id)?.set_limit(column, limit)?;

        debug!(board_id = %board_id, column = %column, limit = %limit, "Column limit set");
        self.board_changes(board_id)
    }

    // =========================================================================
    // TASKS
    // =========================================================================

    pub fn add_task(&mut self, email: &Email, board_id: BoardId, task: NewTask) -> Result<Outcome<Task>, DirectoryError> {
        self.check_task_text(Some(&task.title), Some(&task.description))?;
        let now = Utc::now();
        if task.due_date < now {
            return Err(invalid("due date", "must not be in the past"));
        }
        self.accessible_board(email, board_id)?;

        let task = self.directory.board_mut(board_id)?.add_task(task, now)?;

        debug!(email = %email, board_id = %board_id, task_id = %task.id(), "Task added");
        let changes = self.board_changes(board_id)?.changes;
        Ok(Outcome::new(task, changes))
    }

    /// Moves a task to the next column and returns that column.
    pub fn advance_task(
        &mut self,
        email: &Email,
        board_id: BoardId,
        column: ColumnKind,
        task_id: TaskId,
    ) -> Result<Outcome<ColumnKind>, DirectoryError> {
        self.accessible_board(email, board_id)?;
        let to = self
            .directory
            .board_mut(board_id)?
            .advance_task(column, task_id, email)?;

        debug!(board_id = %board_id, task_id = %task_id, to = %to, "Task advanced");
        let changes = self.board_changes(board_id)?.changes;
        Ok(Outcome::new(to, changes))
    }

    pub fn assign_task(
        &mut self,
        email: &Email,
        board_id: BoardId,
        column: ColumnKind,
        task_id: TaskId,
        assignee: &Email,
    ) -> Result<Outcome<()>, DirectoryError> {
        self.accessible_board(email, board_id)?;
        self.directory
            .board_mut(board_id)?
            .assign_task(column, task_id, email, assignee.clone())?;

        debug!(board_id = %board_id, task_id = %task_id, assignee = %assignee, "Task assigned");
        self.board_changes(board_id)
    }

    pub fn update_task(
        &mut self,
        email: &Email,
        board_id: BoardId,
        column: ColumnKind,
        task_id: TaskId,
        update: TaskUpdate,
    ) -> Result<Outcome<()>, DirectoryError> {
        self.check_task_text(update.title.as_deref(), update.description.as_deref())?;
        if update.due_date.is_some_and(|due| due < Utc::now()) {
            return Err(invalid("due date", "must not be in the past"));
        }
        self.accessible_board(email, board_id)?;
        self.directory
            .board_mut(board_id)?
            .update_task(column, task_id, email, update)?;

        debug!(board_id = %board_id, task_id = %task_id, "Task updated");
        self.board_changes(board_id)
    }

    // =========================================================================
    // SESSIONS
    // =========================================================================

    /// Only registered users can log in.
    pub fn set_logged_in(&mut self, email: &Email) -> Result<(), DirectoryError> {
        self.directory.get_user(email)?;
        self.sessions.log_in(email)?;
        info!(email = %email, "User logged in");
        Ok(())
    }

    pub fn set_logged_out(&mut self, email: &Email) -> Result<(), DirectoryError> {
        self.sessions.log_out(email)?;
        info!(email = %email, "User logged out");
        Ok(())
    }

    pub fn is_logged_in(&self, email: &Email) -> bool {
        self.sessions.is_logged_in(email)
    }

    // =========================================================================
    // SNAPSHOTS
    // =========================================================================

    pub fn user_boards(&self, email: &Email) -> Result<UserBoards, DirectoryError> {
        let views = self.directory.views(email)?;
        let summarize = |ids: &[BoardId]| -> Result<Vec<BoardSummary>, DirectoryError> {
            ids.iter()
                .map(|id| self.directory.get_board(*id).map(BoardSummary::from))
                .collect()
        };
        Ok(UserBoards {
            email: self.directory.get_user(email)?.email().clone(),
            owned: summarize(views.owned())?,
            joined: summarize(views.joined())?,
        })
    }

    pub fn board_view(&self, board_id: BoardId) -> Result<BoardView, DirectoryError> {
        self.directory.get_board(board_id).map(BoardView::from)
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// The board, if `email` owns it.
    fn owned_board(&self, email: &Email, board_id: BoardId) -> Result<&Board, DirectoryError> {
        let board = self.directory.get_board(board_id)?;
        if !board.is_owner(email) {
            return Err(DirectoryError::NotOwner {
                email: email.clone(),
                board_id,
            });
        }
        Ok(board)
    }

    /// The board, if `email` is a registered user with access to it.
    fn accessible_board(&self, email: &Email, board_id: BoardId) -> Result<&Board, DirectoryError> {
        self.directory.views(email)?;
        let board = self.directory.get_board(board_id)?;
        if !board.has_access(email) {
            return Err(DirectoryError::NotMember {
                email: email.clone(),
                board_id,
            });
        }
        Ok(board)
    }

    /// A single save of the board's current row.
    fn board_changes(&self, board_id: BoardId) -> Result<Outcome<()>, DirectoryError> {
        let mut changes = ChangeSet::new();
        changes.save(board_record(self.directory.get_board(board_id)?));
        Ok(Outcome::unit(changes))
    }

    fn counter_record(&self) -> EntityRecord {
        EntityRecord::Counter(CounterRecord {
            next_board_id: self.directory.allocator().cursor(),
        })
    }

    fn check_title(&self, title: &BoardTitle) -> Result<(), DirectoryError> {
        if title.is_empty() {
            return Err(invalid("title", "must not be empty"));
        }
        check_len("title", title.char_len(), self.config.max_title_len)
    }

    fn check_task_text(&self, title: Option<&str>, description: Option<&str>) -> Result<(), DirectoryError> {
        if let Some(title) = title {
            if title.trim().is_empty() {
                return Err(invalid("title", "must not be empty"));
            }
            check_len("title", title.chars().count(), self.config.max_title_len)?;
        }
        if let Some(description) = description {
            check_len(
                "description",
                description.chars().count(),
                self.config.max_description_len,
            )?;
        }
        Ok(())
    }
}

fn user_record(user: &User) -> EntityRecord {
    EntityRecord::User(UserRecord {
        email: user.email().clone(),
        credentials: user.credentials().clone(),
    })
}

fn board_record(board: &Board) -> EntityRecord {
    EntityRecord::Board(board.to_record())
}

fn invalid(field: &'static str, reason: &str) -> DirectoryError {
    DirectoryError::InvalidArgument {
        field,
        reason: reason.to_string(),
    }
}

fn check_len(field: &'static str, len: usize, max: usize) -> Result<(), DirectoryError> {
    if len > max {
        return Err(DirectoryError::InvalidArgument {
            field,
            reason: format!("{len} characters exceeds the maximum of {max}"),
        });
    }
    Ok(())
}

fn corrupt(context: String, cause: DirectoryError) -> DirectoryError {
    DirectoryError::InvariantViolation(format!("persisted {context} rejected: {cause}"))
}
