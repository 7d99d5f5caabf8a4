//! Cross-index invariants of the entity directory.
//!
//! Each check walks the whole directory. The service runs them once after
//! rebuilding from the persistence mirror; tests run them after every step.

use super::directory::EntityDirectory;
use super::errors::DirectoryError;
use shared_types::{BoardId, BoardTitle, ColumnKind};
use std::collections::HashSet;

/// INVARIANT-1: both ordered indices are sorted and balanced.
pub fn invariant_indices_valid(dir: &EntityDirectory) -> bool {
    dir.indices_valid()
}

/// INVARIANT-2: every board id in any per-user view exists in the board
/// index.
pub fn invariant_views_resolve(dir: &EntityDirectory) -> bool {
    dir.users_with_views().all(|(_, views)| {
        views
            .owned()
            .iter()
            .chain(views.joined())
            .all(|id| dir.contains_board(*id))
    })
}

/// INVARIANT-3: a board appears exactly once in its owner's "my boards",
/// and only boards a user owns appear there.
pub fn invariant_owned_views_match(dir: &EntityDirectory) -> bool {
    let boards_match = dir.boards().all(|board| {
        dir.views(board.owner())
            .map(|views| count(views.owned(), board.id()) == 1)
            .unwrap_or(false)
    });
    let views_match = dir.users_with_views().all(|(user, views)| {
        views.owned().iter().all(|id| {
            dir.get_board(*id)
                .map(|board| board.owner() == user.email())
                .unwrap_or(false)
        })
    });
    boards_match && views_match
}

/// INVARIANT-4: a (user, board) pair is in "joined boards" at most once,
/// exactly when the user is in the board's member list. Owners are never
/// members of their own boards.
pub fn invariant_joined_views_match(dir: &EntityDirectory) -> bool {
    let boards_match = dir.boards().all(|board| {
        !board.is_member(board.owner())
            && distinct(board.members())
            && board.members().iter().all(|member| {
                dir.views(member)
                    .map(|views| count(views.joined(), board.id()) == 1)
                    .unwrap_or(false)
            })
    });
    let views_match = dir.users_with_views().all(|(user, views)| {
        views.joined().iter().all(|id| {
            dir.get_board(*id)
                .map(|board| board.is_member(user.email()))
                .unwrap_or(false)
        })
    });
    boards_match && views_match
}

/// INVARIANT-5: titles in a user's "my boards" are unique (ignoring case).
pub fn invariant_titles_unique_per_owner(dir: &EntityDirectory) -> bool {
    dir.users_with_views().all(|(_, views)| {
        let titles: Vec<&BoardTitle> = views
            .owned()
            .iter()
            .filter_map(|id| dir.get_board(*id).ok())
            .map(|board| board.title())
            .collect();
        distinct(&titles)
    })
}

/// INVARIANT-6: the allocator is past every id in use, so it can never hand
/// one out again.
pub fn invariant_allocator_ahead(dir: &EntityDirectory) -> bool {
    match dir.allocator().cursor() {
        None => true,
        Some(next) => dir.boards().all(|board| board.id().value() < next),
    }
}

/// INVARIANT-7: task ids are unique within a board and below its task
/// counter; assignees have access to the board.
pub fn invariant_tasks_consistent(dir: &EntityDirectory) -> bool {
    dir.boards().all(|board| {
        let tasks: Vec<_> = ColumnKind::ALL
            .iter()
            .flat_map(|kind| board.column(*kind).tasks())
            .collect();
        let ids: Vec<_> = tasks.iter().map(|task| task.id()).collect();
        distinct(&ids)
            && ids.iter().all(|id| *id < board.next_task_id())
            && tasks
                .iter()
                .filter_map(|task| task.assignee())
                .all(|assignee| board.has_access(assignee))
    })
}

/// INVARIANT-8: no column holds more tasks than its limit.
pub fn invariant_columns_within_limits(dir: &EntityDirectory) -> bool {
    dir.boards().all(|board| {
        ColumnKind::ALL.iter().all(|kind| {
            let column = board.column(*kind);
            column.limit().allows(column.len())
        })
    })
}

/// Names of all violated invariants; empty when the directory is coherent.
pub fn violations(dir: &EntityDirectory) -> Vec<&'static str> {
    let checks: [(&'static str, fn(&EntityDirectory) -> bool); 8] = [
        ("indices_valid", invariant_indices_valid),
        ("views_resolve", invariant_views_resolve),
        ("owned_views_match", invariant_owned_views_match),
        ("joined_views_match", invariant_joined_views_match),
        ("titles_unique_per_owner", invariant_titles_unique_per_owner),
        ("allocator_ahead", invariant_allocator_ahead),
        ("tasks_consistent", invariant_tasks_consistent),
        ("columns_within_limits", invariant_columns_within_limits),
    ];
    checks
        .into_iter()
        .filter(|(_, check)| !check(dir))
        .map(|(name, _)| name)
        .collect()
}

/// All invariants at once, as a [`DirectoryError::InvariantViolation`].
pub fn verify(dir: &EntityDirectory) -> Result<(), DirectoryError> {
    let failed = violations(dir);
    if failed.is_empty() {
        Ok(())
    } else {
        Err(DirectoryError::InvariantViolation(format!(
            "violated: {}",
            failed.join(", ")
        )))
    }
}

fn count(ids: &[BoardId], board_id: BoardId) -> usize {
    ids.iter().filter(|id| **id == board_id).count()
}

fn distinct<T: Eq + std::hash::Hash>(items: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().all(|item| seen.insert(item))
}
