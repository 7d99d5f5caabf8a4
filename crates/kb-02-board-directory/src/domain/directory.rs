//! # Entity Directory
//!
//! Two independent ordered indices (users by email, boards by id) and the
//! board id allocator. Boards live only in the board index; the per-user
//! views store ids.
//!
//! Removals cascade. Each cascade first collects and checks every reference
//! it will touch, then applies the removals, so a dangling reference is
//! reported as an invariant violation before anything changes.

use super::allocator::BoardIdAllocator;
use super::board::Board;
use super::entities::{BoardViews, User, UserEntry};
use super::errors::DirectoryError;
use crate::config::DirectoryConfig;
use kb_01_ordered_index::domain::invariants;
use kb_01_ordered_index::{IndexError, OrderedIndex};
use shared_types::{BoardId, BoardTitle, Credentials, Email};
use std::iter;
use tracing::error;

/// What removing a user cascaded into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRemoval {
    pub user: User,
    /// Boards the user owned, deleted along with it.
    pub deleted_boards: Vec<Board>,
    /// Boards the user had joined. They remain, minus the user and its
    /// task assignments.
    pub left_boards: Vec<BoardId>,
}

#[derive(Debug, Clone)]
pub struct EntityDirectory {
    users: OrderedIndex<Email, UserEntry>,
    boards: OrderedIndex<BoardId, Board>,
    allocator: BoardIdAllocator,
}

impl EntityDirectory {
    pub fn new(config: &DirectoryConfig) -> Self {
        Self::with_allocator(BoardIdAllocator::from_config(config))
    }

    pub fn with_allocator(allocator: BoardIdAllocator) -> Self {
        Self {
            users: OrderedIndex::new(),
            boards: OrderedIndex::new(),
            allocator,
        }
    }

    // =========================================================================
    // USERS
    // =========================================================================

    pub fn add_user(&mut self, email: Email, credentials: Credentials) -> Result<&User, DirectoryError> {
        let entry = UserEntry::new(User::new(email.clone(), credentials));
        match self.users.insert(email.clone(), entry) {
            Ok(entry) => Ok(&entry.user),
            Err(IndexError::DuplicateKey) => Err(DirectoryError::UserAlreadyExists { email }),
            Err(e) => Err(DirectoryError::from_index(e, format!("inserting user {email}"))),
        }
    }

    /// Removes a user and everything hanging off it.
    ///
    /// Owned boards are deleted (and purged from their members' joined
    /// views); joined boards lose the user as a member and as an assignee.
    pub fn remove_user(&mut self, email: &Email) -> Result<UserRemoval, DirectoryError> {
        let views = self.views(email)?;
        let owned = views.owned().to_vec();
        let joined = views.joined().to_vec();

        // Collect: every referenced board, and every member of the boards
        // about to be deleted, must exist.
        for board_id in owned.iter().chain(&joined) {
            let board = self.boards.get(board_id).map_err(|_| {
                self.dangling(format!("user {email} references missing board {board_id}"))
            })?;
            if owned.contains(board_id) {
                self.check_board_links(board)?;
            }
        }

        // Apply.
        for board_id in &joined {
            let board = self.board_mut(*board_id)?;
            board.remove_member(email);
            board.unassign_all(email);
        }
        let mut deleted_boards = Vec::with_capacity(owned.len());
        for board_id in &owned {
            deleted_boards.push(self.remove_board(*board_id)?);
        }
        let entry = self
            .users
            .remove(email)
            .map_err(|e| DirectoryError::from_index(e, format!("removing user {email}")))?;

        Ok(UserRemoval {
            user: entry.user,
            deleted_boards,
            left_boards: joined,
        })
    }

    pub fn get_user(&self, email: &Email) -> Result<&User, DirectoryError> {
        self.entry(email).map(|entry| &entry.user)
    }

    pub fn contains_user(&self, email: &Email) -> bool {
        self.users.contains(email)
    }

    /// The user's "my boards" and "joined boards" views.
    pub fn views(&self, email: &Email) -> Result<&BoardViews, DirectoryError> {
        self.entry(email).map(|entry| &entry.views)
    }

    pub(crate) fn views_mut(&mut self, email: &Email) -> Result<&mut BoardViews, DirectoryError> {
        self.users
            .get_mut(email)
            .map(|entry| &mut entry.views)
            .map_err(|_| DirectoryError::UserNotFound { email: email.clone() })
    }

    /// Users in ascending email order.
    pub fn users(&self) -> impl Iterator<Item = &User> + '_ {
        self.users.values().map(|entry| &entry.user)
    }

    /// Users with their views, in ascending email order.
    pub fn users_with_views(&self) -> impl Iterator<Item = (&User, &BoardViews)> + '_ {
        self.users.values().map(|entry| (&entry.user, &entry.views))
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    fn entry(&self, email: &Email) -> Result<&UserEntry, DirectoryError> {
        self.users
            .get(email)
            .map_err(|_| DirectoryError::UserNotFound { email: email.clone() })
    }

    // =========================================================================
    // BOARDS
    // =========================================================================

    pub fn allocate_board_id(&mut self) -> Result<BoardId, DirectoryError> {
        self.allocator.allocate()
    }

    pub fn allocator(&self) -> &BoardIdAllocator {
        &self.allocator
    }

    pub(crate) fn allocator_mut(&mut self) -> &mut BoardIdAllocator {
        &mut self.allocator
    }

    /// Inserts a fully built board and links it into its owner's and
    /// members' views.
    ///
    /// The allocator is moved past the board's id, so boards restored from
    /// the mirror never collide with later allocations.
    pub fn add_board(&mut self, board: Board) -> Result<&Board, DirectoryError> {
        let board_id = board.id();
        if self.boards.contains(&board_id) {
            return Err(DirectoryError::BoardAlreadyExists { board_id });
        }
        let owner = board.owner().clone();
        let members = board.members().to_vec();

        self.views(&owner)?;
        if self.find_owned_board(&owner, board.title()).is_ok() {
            return Err(DirectoryError::BoardTitleTaken {
                email: owner,
                title: board.title().clone(),
            });
        }
        for (i, member) in members.iter().enumerate() {
            self.views(member)?;
            if *member == owner || members[..i].contains(member) {
                return Err(DirectoryError::AlreadyJoined {
                    email: member.clone(),
                    board_id,
                });
            }
        }

        self.views_mut(&owner)?.push_owned(board_id);
        for member in &members {
            self.views_mut(member)?.push_joined(board_id);
        }
        self.allocator.resume_after(board_id);
        self.boards
            .insert(board_id, board)
            .map(|board| &*board)
            .map_err(|e| DirectoryError::from_index(e, format!("inserting board {board_id}")))
    }

    /// Deletes a board and purges it from every view that references it.
    pub fn remove_board(&mut self, board_id: BoardId) -> Result<Board, DirectoryError> {
        let board = self.get_board(board_id)?;
        self.check_board_links(board)?;
        let owner = board.owner().clone();
        let members = board.members().to_vec();

        self.views_mut(&owner)?.drop_owned(board_id);
        for member in &members {
            self.views_mut(member)?.drop_joined(board_id);
        }
        self.boards
            .remove(&board_id)
            .map_err(|e| DirectoryError::from_index(e, format!("removing board {board_id}")))
    }

    pub fn get_board(&self, board_id: BoardId) -> Result<&Board, DirectoryError> {
        self.boards
            .get(&board_id)
            .map_err(|_| DirectoryError::BoardNotFound { board_id })
    }

    pub(crate) fn board_mut(&mut self, board_id: BoardId) -> Result<&mut Board, DirectoryError> {
        self.boards
            .get_mut(&board_id)
            .map_err(|_| DirectoryError::BoardNotFound { board_id })
    }

    pub fn contains_board(&self, board_id: BoardId) -> bool {
        self.boards.contains(&board_id)
    }

    /// Boards in ascending id order.
    pub fn boards(&self) -> impl Iterator<Item = &Board> + '_ {
        self.boards.values()
    }

    pub fn board_count(&self) -> usize {
        self.boards.len()
    }

    /// Id of the board `owner` owns under `title`.
    pub fn find_owned_board(&self, owner: &Email, title: &BoardTitle) -> Result<BoardId, DirectoryError> {
        self.views(owner)?
            .owned()
            .iter()
            .copied()
            .find(|id| self.boards.get(id).is_ok_and(|board| board.title() == title))
            .ok_or_else(|| DirectoryError::BoardTitleNotFound {
                email: owner.clone(),
                title: title.clone(),
            })
    }

    // =========================================================================
    // CONSISTENCY
    // =========================================================================

    /// Both indices sorted, balanced, and with exact lengths.
    pub fn indices_valid(&self) -> bool {
        invariants::verify(&self.users) && invariants::verify(&self.boards)
    }

    /// The owner and every member of `board` exist.
    fn check_board_links(&self, board: &Board) -> Result<(), DirectoryError> {
        for user in iter::once(board.owner()).chain(board.members()) {
            if !self.users.contains(user) {
                return Err(self.dangling(format!(
                    "board {} references missing user {user}",
                    board.id()
                )));
            }
        }
        Ok(())
    }

    fn dangling(&self, detail: String) -> DirectoryError {
        error!(%detail, "Directory indices disagree");
        DirectoryError::InvariantViolation(detail)
    }
}
