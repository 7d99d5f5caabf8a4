//! Persistence mirror records and the change sets that carry them.
//!
//! Every successful coordinator mutation reports the rows it touched as a
//! [`ChangeSet`]. The service replays the set against the repository while
//! still holding the write lock, so the mirror sees changes in commit order.

use super::board::Task;
use serde::{Deserialize, Serialize};
use shared_types::{BoardId, BoardTitle, ColumnLimit, Credentials, Email};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: Email,
    pub credentials: Credentials,
}

/// One board row. Limits cross this boundary as `-1` (unlimited) or a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRecord {
    pub id: BoardId,
    pub title: BoardTitle,
    pub owner: Email,
    pub joined: Vec<Email>,
    pub backlog: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub done: Vec<Task>,
    pub backlog_limit: ColumnLimit,
    pub in_progress_limit: ColumnLimit,
    pub done_limit: ColumnLimit,
    #[serde(default)]
    pub next_task_id: u64,
}

/// The allocator cursor. `None` records an exhausted id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterRecord {
    pub next_board_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityRecord {
    User(UserRecord),
    Board(BoardRecord),
    Counter(CounterRecord),
}

impl EntityRecord {
    pub fn key(&self) -> EntityKey {
        match self {
            EntityRecord::User(user) => EntityKey::User(user.email.clone()),
            EntityRecord::Board(board) => EntityKey::Board(board.id),
            EntityRecord::Counter(_) => EntityKey::BoardIdCounter,
        }
    }
}

/// Primary key of a mirror row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKey {
    User(Email),
    Board(BoardId),
    BoardIdCounter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Save(EntityRecord),
    Delete(EntityKey),
}

/// Ordered list of mirror writes produced by one mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self, record: EntityRecord) -> &mut Self {
        self.changes.push(Change::Save(record));
        self
    }

    pub fn delete(&mut self, key: EntityKey) -> &mut Self {
        self.changes.push(Change::Delete(key));
        self
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    /// Keys of all rows this set writes or deletes, in order.
    pub fn keys(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.changes.iter().map(|change| match change {
            Change::Save(record) => record.key(),
            Change::Delete(key) => key.clone(),
        })
    }
}

impl IntoIterator for ChangeSet {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

/// Result of a mutation: its return value plus the mirror writes it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub changes: ChangeSet,
}

impl<T> Outcome<T> {
    pub fn new(value: T, changes: ChangeSet) -> Self {
        Self { value, changes }
    }
}

impl Outcome<()> {
    pub fn unit(changes: ChangeSet) -> Self {
        Self { value: (), changes }
    }
}
