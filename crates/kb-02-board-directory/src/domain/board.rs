//! Boards, columns, and tasks.
//!
//! A [`Board`] owns its three columns and its member list. Membership is
//! mirrored in each member's joined view; keeping the two sides in step is
//! the coordinator's job, so the mutators here that touch membership are
//! crate-private.

use super::changes::BoardRecord;
use super::errors::DirectoryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{BoardId, BoardTitle, ColumnKind, ColumnLimit, Email, TaskId};

// =============================================================================
// TASKS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
    due_date: DateTime<Utc>,
    assignee: Option<Email>,
}

impl Task {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    pub fn assignee(&self) -> Option<&Email> {
        self.assignee.as_ref()
    }

    /// Unassigned tasks may be changed by any board member; assigned ones
    /// only by their assignee.
    fn check_actor(&self, actor: &Email) -> Result<(), DirectoryError> {
        match &self.assignee {
            Some(assignee) if assignee != actor => Err(DirectoryError::NotAssignee {
                email: actor.clone(),
                task_id: self.id,
            }),
            _ => Ok(()),
        }
    }
}

/// Fields supplied when creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
}

/// Partial task update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

// =============================================================================
// COLUMNS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    tasks: Vec<Task>,
    limit: ColumnLimit,
}

impl Column {
    fn new(tasks: Vec<Task>, limit: ColumnLimit) -> Self {
        Self { tasks, limit }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn limit(&self) -> ColumnLimit {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    fn position(&self, task_id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == task_id)
    }
}

// =============================================================================
// BOARDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    id: BoardId,
    title: BoardTitle,
    owner: Email,
    /// Joined users, in join order. Never contains the owner.
    members: Vec<Email>,
    columns: [Column; 3],
    next_task_id: u64,
}

impl Board {
    pub fn new(id: BoardId, title: BoardTitle, owner: Email) -> Self {
        Self {
            id,
            title,
            owner,
            members: Vec::new(),
            columns: Default::default(),
            next_task_id: 0,
        }
    }

    pub fn id(&self) -> BoardId {
        self.id
    }

    pub fn title(&self) -> &BoardTitle {
        &self.title
    }

    pub fn owner(&self) -> &Email {
        &self.owner
    }

    pub fn members(&self) -> &[Email] {
        &self.members
    }

    pub fn column(&self, kind: ColumnKind) -> &Column {
        &self.columns[kind.ordinal()]
    }

    pub fn is_owner(&self, email: &Email) -> bool {
        &self.owner == email
    }

    pub fn is_member(&self, email: &Email) -> bool {
        self.members.contains(email)
    }

    /// Owner or joined member.
    pub fn has_access(&self, email: &Email) -> bool {
        self.is_owner(email) || self.is_member(email)
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    /// Id the next task added to this board will receive.
    pub fn next_task_id(&self) -> TaskId {
        TaskId(self.next_task_id)
    }

    // -------------------------------------------------------------------------
    // Membership (kept in step with the joined views by the coordinator)
    // -------------------------------------------------------------------------

    pub(crate) fn add_member(&mut self, email: Email) {
        self.members.push(email);
    }

    pub(crate) fn remove_member(&mut self, email: &Email) -> bool {
        let before = self.members.len();
        self.members.retain(|member| member != email);
        self.members.len() != before
    }

    pub(crate) fn set_owner(&mut self, owner: Email) {
        self.owner = owner;
    }

    /// Clears every assignment held by `email`; returns how many changed.
    pub(crate) fn unassign_all(&mut self, email: &Email) -> usize {
        let mut cleared = 0;
        for task in self.columns.iter_mut().flat_map(|c| c.tasks.iter_mut()) {
            if task.assignee.as_ref() == Some(email) {
                task.assignee = None;
                cleared += 1;
            }
        }
        cleared
    }

    // -------------------------------------------------------------------------
    // Columns and tasks
    // -------------------------------------------------------------------------

    pub(crate) fn set_limit(&mut self, kind: ColumnKind, limit: ColumnLimit) -> Result<(), DirectoryError> {
        let column = &mut self.columns[kind.ordinal()];
        if let ColumnLimit::AtMost(max) = limit {
            if !limit.allows(column.len()) {
                return Err(DirectoryError::LimitBelowCurrent {
                    board_id: self.id,
                    column: kind,
                    limit: max,
                    current: column.len(),
                });
            }
        }
        column.limit = limit;
        Ok(())
    }

    /// Appends a task to the backlog.
    pub(crate) fn add_task(&mut self, new: NewTask, created_at: DateTime<Utc>) -> Result<Task, DirectoryError> {
        self.check_room(ColumnKind::Backlog)?;

        let task = Task {
            id: TaskId(self.next_task_id),
            title: new.title,
            description: new.description,
            created_at,
            due_date: new.due_date,
            assignee: None,
        };
        self.next_task_id += 1;
        self.columns[ColumnKind::Backlog.ordinal()].tasks.push(task.clone());
        Ok(task)
    }

    /// Moves a task one column to the right and returns the column it landed in.
    pub(crate) fn advance_task(
        &mut self,
        from: ColumnKind,
        task_id: TaskId,
        actor: &Email,
    ) -> Result<ColumnKind, DirectoryError> {
        let position = self.locate_mutable(from, task_id, actor)?;
        let Some(to) = from.next() else {
            return Err(DirectoryError::TaskDone {
                board_id: self.id,
                task_id,
            });
        };
        self.check_room(to)?;

        let task = self.columns[from.ordinal()].tasks.remove(position);
        self.columns[to.ordinal()].tasks.push(task);
        Ok(to)
    }

    pub(crate) fn assign_task(
        &mut self,
        column: ColumnKind,
        task_id: TaskId,
        actor: &Email,
        assignee: Email,
    ) -> Result<(), DirectoryError> {
        let position = self.locate_mutable(column, task_id, actor)?;
        if !self.has_access(&assignee) {
            return Err(DirectoryError::NotMember {
                email: assignee,
                board_id: self.id,
            });
        }
        self.columns[column.ordinal()].tasks[position].assignee = Some(assignee);
        Ok(())
    }

    pub(crate) fn update_task(
        &mut self,
        column: ColumnKind,
        task_id: TaskId,
        actor: &Email,
        update: TaskUpdate,
    ) -> Result<(), DirectoryError> {
        let position = self.locate_mutable(column, task_id, actor)?;
        let task = &mut self.columns[column.ordinal()].tasks[position];
        if let Some(title) = update.title {
            task.title = title;
        }
        if let Some(description) = update.description {
            task.description = description;
        }
        if let Some(due_date) = update.due_date {
            task.due_date = due_date;
        }
        Ok(())
    }

    /// Finds a task that `actor` may change. Done tasks are frozen.
    fn locate_mutable(&self, column: ColumnKind, task_id: TaskId, actor: &Email) -> Result<usize, DirectoryError> {
        let position = self.column(column).position(task_id).ok_or(DirectoryError::TaskNotFound {
            board_id: self.id,
            column,
            task_id,
        })?;
        if column == ColumnKind::Done {
            return Err(DirectoryError::TaskDone {
                board_id: self.id,
                task_id,
            });
        }
        self.column(column).tasks[position].check_actor(actor)?;
        Ok(position)
    }

    fn check_room(&self, kind: ColumnKind) -> Result<(), DirectoryError> {
        let column = self.column(kind);
        match column.limit {
            ColumnLimit::AtMost(limit) if !column.limit.admits_one_more(column.len()) => {
                Err(DirectoryError::ColumnFull {
                    board_id: self.id,
                    column: kind,
                    limit,
                })
            }
            _ => Ok(()),
        }
    }

    // -------------------------------------------------------------------------
    // Persistence mirror
    // -------------------------------------------------------------------------

    pub(crate) fn to_record(&self) -> BoardRecord {
        let [backlog, in_progress, done] = &self.columns;
        BoardRecord {
            id: self.id,
            title: self.title.clone(),
            owner: self.owner.clone(),
            joined: self.members.clone(),
            backlog: backlog.tasks.clone(),
            in_progress: in_progress.tasks.clone(),
            done: done.tasks.clone(),
            backlog_limit: backlog.limit,
            in_progress_limit: in_progress.limit,
            done_limit: done.limit,
            next_task_id: self.next_task_id,
        }
    }

    /// Rebuilds a board from its mirror row.
    ///
    /// The task counter resumes past the highest stored task id even if the
    /// stored counter lags behind.
    pub(crate) fn from_record(record: BoardRecord) -> Self {
        let highest = [&record.backlog, &record.in_progress, &record.done]
            .into_iter()
            .flatten()
            .map(|task| task.id.value().saturating_add(1))
            .max()
            .unwrap_or(0);

        Self {
            id: record.id,
            title: record.title,
            owner: record.owner,
            members: record.joined,
            columns: [
                Column::new(record.backlog, record.backlog_limit),
                Column::new(record.in_progress, record.in_progress_limit),
                Column::new(record.done, record.done_limit),
            ],
            next_task_id: record.next_task_id.max(highest),
        }
    }
}
