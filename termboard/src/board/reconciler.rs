//! Reconciles the local board with the server.
//!
//! Two rules drive everything here:
//!
//! 1. **Loads are ticketed.** Every load request gets a sequence number;
//!    only the most recently requested load may apply. A slow response for
//!    an earlier request is discarded when it arrives, so rapid project
//!    switching always settles on the last project selected. Superseded
//!    requests are not aborted in flight, just ignored.
//! 2. **Drops are optimistic.** A drop moves the card locally before the
//!    server confirms. On confirmation the server's copy of the task is
//!    taken as truth. On failure the whole board is refetched rather than
//!    patched back by hand, so the local state can never drift from the
//!    server after a rejected move.

use termboard_api::task::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};

use crate::api::BoardApi;
use crate::board::{BoardError, BoardPartition};

/// Handle for an in-flight board load. Only the ticket from the most
/// recent [`BoardReconciler::begin_load`] call is accepted back.
#[derive(Debug)]
pub struct LoadTicket {
    seq: u64,
    project_id: String,
}

impl LoadTicket {
    /// The project this load was requested for.
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

/// An optimistic move that has been applied locally but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDrop {
    /// The moved task.
    pub task_id: String,
    /// Column the task left.
    pub from: TaskStatus,
    /// Column the task now sits in locally.
    pub to: TaskStatus,
}

/// User-entered task fields, either for a new task (`id` is `None`) or an
/// edit of an existing one.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    /// Existing task id, or `None` to create.
    pub id: Option<String>,
    /// Task title. Must be non-blank; validated before any request.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Priority.
    pub priority: TaskPriority,
    /// Target column.
    pub status: TaskStatus,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            priority: TaskPriority::Medium,
            status: TaskStatus::YetToStart,
        }
    }
}

/// Local board state plus the service client that keeps it honest.
#[derive(Debug)]
pub struct BoardReconciler<A> {
    api: A,
    partition: BoardPartition,
    project_id: Option<String>,
    load_seq: u64,
    drag: Option<String>,
}

impl<A: BoardApi> BoardReconciler<A> {
    /// Creates a reconciler with an empty board and no project.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            partition: BoardPartition::new(),
            project_id: None,
            load_seq: 0,
            drag: None,
        }
    }

    /// The current board columns.
    #[must_use]
    pub fn partition(&self) -> &BoardPartition {
        &self.partition
    }

    /// The project the board is showing, if any.
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// The task currently picked up, if any.
    #[must_use]
    pub fn dragged(&self) -> Option<&str> {
        self.drag.as_deref()
    }

    // -- loading --

    /// Requests a load of `project_id`, superseding any load still in
    /// flight. Any drag in progress is dropped, since its task may not
    /// exist in the new project.
    pub fn begin_load(&mut self, project_id: &str) -> LoadTicket {
        self.load_seq += 1;
        self.project_id = Some(project_id.to_string());
        self.drag = None;
        LoadTicket {
            seq: self.load_seq,
            project_id: project_id.to_string(),
        }
    }

    /// Clears the board entirely: no project, no tasks, no drag. Any load
    /// still in flight is superseded and will be discarded.
    pub fn reset(&mut self) {
        self.load_seq += 1;
        self.project_id = None;
        self.partition = BoardPartition::new();
        self.drag = None;
    }

    /// Whether a ticket still corresponds to the most recent load request.
    #[must_use]
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.seq == self.load_seq
    }

    /// Applies a finished load. Returns `false` without touching the board
    /// if a newer load has been requested since this ticket was issued.
    pub fn complete_load(&mut self, ticket: &LoadTicket, tasks: Vec<Task>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                project_id = %ticket.project_id,
                stale_seq = ticket.seq,
                current_seq = self.load_seq,
                "discarding stale board load"
            );
            return false;
        }
        self.partition = BoardPartition::from_tasks(tasks);
        true
    }

    // -- drag and drop --

    /// Picks up a task. Returns `false` if it is not on the board.
    pub fn begin_drag(&mut self, task_id: &str) -> bool {
        if self.partition.task(task_id).is_some() {
            self.drag = Some(task_id.to_string());
            true
        } else {
            false
        }
    }

    /// Puts down the current drag without moving anything.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Resolves the current drag against a target column, applying the
    /// move locally. The drag is consumed in every case. Returns `None`
    /// when there is nothing to do: no drag in progress, the task vanished,
    /// or it was dropped back onto its own column.
    pub fn prepare_drop(&mut self, target: TaskStatus) -> Option<PendingDrop> {
        let task_id = self.drag.take()?;
        let from = self.partition.move_task(&task_id, target)?;
        Some(PendingDrop {
            task_id,
            from,
            to: target,
        })
    }

    /// Pushes an optimistically applied drop to the server.
    ///
    /// On success the server's copy of the task replaces the local one and
    /// the board is refetched to absorb any other changes made server-side
    /// in the meantime. On failure the refetch serves as the rollback, and
    /// the error is returned for display.
    ///
    /// # Errors
    ///
    /// [`BoardError::NoProject`] if no project is loaded, or the service
    /// error that rejected the update.
    pub async fn commit_drop(&mut self, pending: PendingDrop) -> Result<(), BoardError> {
        let project_id = self.project_id.clone().ok_or(BoardError::NoProject)?;
        let patch = TaskPatch::status_only(pending.to);
        match self
            .api
            .update_task(&project_id, &pending.task_id, patch)
            .await
        {
            Ok(task) => {
                self.partition.upsert(task);
                self.resync(&project_id).await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    task_id = %pending.task_id,
                    error = %e,
                    "drop rejected, refetching board"
                );
                if !self.resync(&project_id).await {
                    // Even the refetch failed: revert the one local move
                    // so the board matches what the server last confirmed.
                    self.partition.move_task(&pending.task_id, pending.from);
                }
                Err(e.into())
            }
        }
    }

    /// Replaces the board with a fresh server listing. Returns whether the
    /// refetch succeeded; a board superseded by a newer load meanwhile is
    /// left alone and counts as success.
    async fn resync(&mut self, project_id: &str) -> bool {
        match self.api.list_tasks(project_id).await {
            Ok(tasks) => {
                if self.project_id.as_deref() == Some(project_id) {
                    self.partition = BoardPartition::from_tasks(tasks);
                }
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "board resync failed");
                false
            }
        }
    }

    // -- create / edit / delete --

    /// Creates or updates a task from user input, then refetches the board
    /// to resynchronize. No optimistic mutation is attempted for edits;
    /// the refetch is the consistency mechanism.
    ///
    /// # Errors
    ///
    /// [`BoardError::TitleEmpty`] if the title is blank (no request is
    /// made), [`BoardError::NoProject`] if no project is loaded, or the
    /// service error.
    pub async fn save_task(&mut self, draft: TaskDraft) -> Result<Task, BoardError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(BoardError::TitleEmpty);
        }
        let project_id = self.project_id.clone().ok_or(BoardError::NoProject)?;

        let task = match draft.id {
            Some(task_id) => {
                let patch = TaskPatch {
                    title: Some(title.to_string()),
                    description: Some(draft.description),
                    priority: Some(draft.priority),
                    status: Some(draft.status),
                };
                self.api.update_task(&project_id, &task_id, patch).await?
            }
            None => {
                let new = NewTask {
                    title: title.to_string(),
                    description: draft.description,
                    priority: draft.priority,
                    status: draft.status,
                    project_id: project_id.clone(),
                };
                self.api.create_task(new).await?
            }
        };
        self.partition.upsert(task.clone());
        self.resync(&project_id).await;
        Ok(task)
    }

    /// Deletes a task. Returns whether it was on the local board; deleting
    /// a task that is already gone succeeds either way.
    ///
    /// # Errors
    ///
    /// [`BoardError::NoProject`] if no project is loaded, or the service
    /// error.
    pub async fn remove(&mut self, task_id: &str) -> Result<bool, BoardError> {
        let project_id = self.project_id.clone().ok_or(BoardError::NoProject)?;
        self.api.delete_task(&project_id, task_id).await?;
        if self.drag.as_deref() == Some(task_id) {
            self.drag = None;
        }
        Ok(self.partition.remove_task(task_id))
    }
}
