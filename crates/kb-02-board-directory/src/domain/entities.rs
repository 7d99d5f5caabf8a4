//! Users and their board views.

use shared_types::{BoardId, Credentials, Email};

/// A registered user.
///
/// The logged-in flag lives in the session registry, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    email: Email,
    credentials: Credentials,
}

impl User {
    pub fn new(email: Email, credentials: Credentials) -> Self {
        Self { email, credentials }
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// The two per-user views of the board index, in insertion order.
///
/// Both hold board ids only; the boards themselves live in the global index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardViews {
    owned: Vec<BoardId>,
    joined: Vec<BoardId>,
}

impl BoardViews {
    /// "My boards".
    pub fn owned(&self) -> &[BoardId] {
        &self.owned
    }

    /// "Joined boards".
    pub fn joined(&self) -> &[BoardId] {
        &self.joined
    }

    pub(crate) fn push_owned(&mut self, board_id: BoardId) {
        self.owned.push(board_id);
    }

    pub(crate) fn push_joined(&mut self, board_id: BoardId) {
        self.joined.push(board_id);
    }

    pub(crate) fn drop_owned(&mut self, board_id: BoardId) -> bool {
        drop_id(&mut self.owned, board_id)
    }

    pub(crate) fn drop_joined(&mut self, board_id: BoardId) -> bool {
        drop_id(&mut self.joined, board_id)
    }
}

fn drop_id(ids: &mut Vec<BoardId>, board_id: BoardId) -> bool {
    let before = ids.len();
    ids.retain(|id| *id != board_id);
    ids.len() != before
}

/// Value stored in the user index.
#[derive(Debug, Clone)]
pub(crate) struct UserEntry {
    pub(crate) user: User,
    pub(crate) views: BoardViews,
}

impl UserEntry {
    pub(crate) fn new(user: User) -> Self {
        Self {
            user,
            views: BoardViews::default(),
        }
    }
}
