//! The three-column partition of a project's tasks.
//!
//! Every task lives in exactly one column, decided solely by its `status`
//! field. All board mutations go through this type so that invariant
//! cannot be broken by call sites.

use termboard_api::task::{Task, TaskStatus};

/// A project's tasks split by status into board columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardPartition {
    yet_to_start: Vec<Task>,
    in_progress: Vec<Task>,
    completed: Vec<Task>,
}

impl BoardPartition {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Partitions a full task listing into columns. Tasks keep the order
    /// the server returned them in.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut board = Self::new();
        for task in tasks {
            board.column_mut(task.status).push(task);
        }
        board
    }

    /// The tasks in one column.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::YetToStart => &self.yet_to_start,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Completed => &self.completed,
        }
    }

    fn column_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        match status {
            TaskStatus::YetToStart => &mut self.yet_to_start,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Completed => &mut self.completed,
        }
    }

    /// Total number of tasks on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.yet_to_start.len() + self.in_progress.len() + self.completed.len()
    }

    /// Whether the board has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds a task anywhere on the board.
    #[must_use]
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        TaskStatus::ALL
            .iter()
            .flat_map(|s| self.column(*s))
            .find(|t| t.id == task_id)
    }

    /// The column a task currently sits in.
    #[must_use]
    pub fn status_of(&self, task_id: &str) -> Option<TaskStatus> {
        self.task(task_id).map(|t| t.status)
    }

    /// Moves a task to another column, updating its `status` field to
    /// match. Returns the column it came from, or `None` if the task is
    /// not on the board or already sits in `to`.
    pub fn move_task(&mut self, task_id: &str, to: TaskStatus) -> Option<TaskStatus> {
        let from = self.status_of(task_id)?;
        if from == to {
            return None;
        }
        let source = self.column_mut(from);
        let index = source.iter().position(|t| t.id == task_id)?;
        let mut task = source.remove(index);
        task.status = to;
        self.column_mut(to).push(task);
        Some(from)
    }

    /// Inserts a task, or replaces it in place if it is already on the
    /// board. A replacement that changes status moves columns.
    pub fn upsert(&mut self, task: Task) {
        if let Some(current) = self.status_of(&task.id) {
            if current == task.status {
                let column = self.column_mut(current);
                if let Some(slot) = column.iter_mut().find(|t| t.id == task.id) {
                    *slot = task;
                }
                return;
            }
            self.remove_task(&task.id);
        }
        self.column_mut(task.status).push(task);
    }

    /// Removes a task. Removing an absent task is a no-op, so retried
    /// deletes converge.
    pub fn remove_task(&mut self, task_id: &str) -> bool {
        for status in TaskStatus::ALL {
            let column = self.column_mut(status);
            if let Some(index) = column.iter().position(|t| t.id == task_id) {
                column.remove(index);
                return true;
            }
        }
        false
    }

    /// Checks that every task sits in the column matching its status and
    /// that no id appears twice. Test support.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        for status in TaskStatus::ALL {
            for task in self.column(status) {
                if task.status != status || !seen.insert(task.id.as_str()) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termboard_api::task::TaskPriority;

    fn task(id: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            description: String::new(),
            priority: TaskPriority::Medium,
            status,
            project_id: "p-1".to_string(),
        }
    }

    #[test]
    fn from_tasks_partitions_by_status() {
        let board = BoardPartition::from_tasks(vec![
            task("a", TaskStatus::YetToStart),
            task("b", TaskStatus::Completed),
            task("c", TaskStatus::YetToStart),
            task("d", TaskStatus::InProgress),
        ]);
        assert_eq!(board.column(TaskStatus::YetToStart).len(), 2);
        assert_eq!(board.column(TaskStatus::InProgress).len(), 1);
        assert_eq!(board.column(TaskStatus::Completed).len(), 1);
        assert!(board.is_consistent());
    }

    #[test]
    fn from_tasks_preserves_server_order_within_column() {
        let board = BoardPartition::from_tasks(vec![
            task("b", TaskStatus::YetToStart),
            task("a", TaskStatus::YetToStart),
        ]);
        let ids: Vec<&str> = board
            .column(TaskStatus::YetToStart)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn move_task_updates_status_field() {
        let mut board = BoardPartition::from_tasks(vec![task("a", TaskStatus::YetToStart)]);
        let from = board.move_task("a", TaskStatus::InProgress);
        assert_eq!(from, Some(TaskStatus::YetToStart));
        assert_eq!(board.status_of("a"), Some(TaskStatus::InProgress));
        assert!(board.column(TaskStatus::YetToStart).is_empty());
        assert!(board.is_consistent());
    }

    #[test]
    fn move_task_to_same_column_is_refused() {
        let mut board = BoardPartition::from_tasks(vec![task("a", TaskStatus::Completed)]);
        assert_eq!(board.move_task("a", TaskStatus::Completed), None);
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn move_unknown_task_is_refused() {
        let mut board = BoardPartition::new();
        assert_eq!(board.move_task("ghost", TaskStatus::InProgress), None);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut board = BoardPartition::from_tasks(vec![
            task("a", TaskStatus::YetToStart),
            task("b", TaskStatus::YetToStart),
        ]);
        let mut updated = task("a", TaskStatus::YetToStart);
        updated.title = "renamed".to_string();
        board.upsert(updated);

        assert_eq!(board.len(), 2);
        assert_eq!(board.task("a").map(|t| t.title.as_str()), Some("renamed"));
        // Position unchanged.
        assert_eq!(board.column(TaskStatus::YetToStart)[0].id, "a");
    }

    #[test]
    fn upsert_with_new_status_moves_columns() {
        let mut board = BoardPartition::from_tasks(vec![task("a", TaskStatus::YetToStart)]);
        board.upsert(task("a", TaskStatus::Completed));
        assert_eq!(board.len(), 1);
        assert_eq!(board.status_of("a"), Some(TaskStatus::Completed));
        assert!(board.is_consistent());
    }

    #[test]
    fn remove_task_is_idempotent() {
        let mut board = BoardPartition::from_tasks(vec![task("a", TaskStatus::InProgress)]);
        assert!(board.remove_task("a"));
        assert!(!board.remove_task("a"));
        assert!(board.is_empty());
    }
}
