//! Read-only snapshots handed to presentation layers.
//!
//! Snapshots are owned copies, so they stay valid after the read lock that
//! produced them is released.

use super::board::{Board, Task};
use serde::Serialize;
use shared_types::{BoardId, BoardTitle, ColumnKind, ColumnLimit, Email};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSummary {
    pub id: BoardId,
    pub title: BoardTitle,
    pub owner: Email,
}

impl From<&Board> for BoardSummary {
    fn from(board: &Board) -> Self {
        Self {
            id: board.id(),
            title: board.title().clone(),
            owner: board.owner().clone(),
        }
    }
}

/// A user's "my boards" and "joined boards", in view order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserBoards {
    pub email: Email,
    pub owned: Vec<BoardSummary>,
    pub joined: Vec<BoardSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnView {
    pub kind: ColumnKind,
    pub limit: ColumnLimit,
    pub tasks: Vec<Task>,
}

/// Full contents of one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub id: BoardId,
    pub title: BoardTitle,
    pub owner: Email,
    pub members: Vec<Email>,
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    pub fn column(&self, kind: ColumnKind) -> Option<&ColumnView> {
        self.columns.iter().find(|column| column.kind == kind)
    }
}

impl From<&Board> for BoardView {
    fn from(board: &Board) -> Self {
        Self {
            id: board.id(),
            title: board.title().clone(),
            owner: board.owner().clone(),
            members: board.members().to_vec(),
            columns: ColumnKind::ALL
                .iter()
                .map(|kind| {
                    let column = board.column(*kind);
                    ColumnView {
                        kind: *kind,
                        limit: column.limit(),
                        tasks: column.tasks().to_vec(),
                    }
                })
                .collect(),
        }
    }
}
