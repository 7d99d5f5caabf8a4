//! Board id allocation.

use super::errors::DirectoryError;
use crate::config::DirectoryConfig;
use shared_types::BoardId;

/// Hands out strictly increasing board ids.
///
/// The cursor only ever moves forward: removing a board never returns its id
/// to the pool, and [`resume_after`](Self::resume_after) ignores ids below
/// the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardIdAllocator {
    /// Next id to hand out; `None` once the id space is used up.
    next: Option<u64>,
    /// Largest id that may be handed out.
    max: u64,
}

impl BoardIdAllocator {
    pub fn new(first: u64, max: u64) -> Self {
        Self {
            next: Some(first),
            max,
        }
    }

    pub fn from_config(config: &DirectoryConfig) -> Self {
        Self::new(config.first_board_id, config.max_board_id)
    }

    pub fn allocate(&mut self) -> Result<BoardId, DirectoryError> {
        let id = match self.next {
            Some(id) if id <= self.max => id,
            _ => return Err(DirectoryError::AllocatorExhausted { max: self.max }),
        };
        self.next = id.checked_add(1);
        Ok(BoardId(id))
    }

    /// The id the next call to `allocate` would return, if any.
    pub fn peek(&self) -> Option<BoardId> {
        self.next.filter(|id| *id <= self.max).map(BoardId)
    }

    /// Raw cursor for persistence; `None` means exhausted.
    pub fn cursor(&self) -> Option<u64> {
        self.next
    }

    /// Move the cursor past `id` if it is not already.
    pub fn resume_after(&mut self, id: BoardId) {
        if let Some(next) = self.next {
            if id.value() >= next {
                self.next = id.value().checked_add(1);
            }
        }
    }

    /// Move the cursor to `cursor` if that is ahead of the current one.
    ///
    /// A persisted `None` marks an exhausted allocator and is adopted as is.
    pub fn resume_at(&mut self, cursor: Option<u64>) {
        match (self.next, cursor) {
            (_, None) => self.next = None,
            (Some(next), Some(cursor)) if cursor > next => self.next = Some(cursor),
            _ => {}
        }
    }
}
