//! Application state and event handling.
//!
//! The keyboard model for moving cards mirrors drag and drop: a card is
//! picked up in place, the cursor travels to another column, and the drop
//! lands it there. The board state itself is owned by the worker's
//! reconciler; the copy here is whatever the last [`BoardEvent::Snapshot`]
//! carried, so the TUI never mutates task data on its own.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use termboard_api::project::Project;
use termboard_api::task::{Task, TaskPriority, TaskStatus};

use crate::board::{BoardPartition, TaskDraft};
use crate::net::{BoardCommand, BoardEvent};

/// Which panel is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Project sidebar.
    Projects,
    /// The board columns (default).
    Board,
}

/// Which field of the task form is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Title input.
    Title,
    /// Description input.
    Description,
}

/// In-progress task create/edit form.
#[derive(Debug, Clone)]
pub struct TaskForm {
    /// Existing task id, or `None` when creating.
    pub id: Option<String>,
    /// Title input buffer.
    pub title: String,
    /// Description input buffer.
    pub description: String,
    /// Chosen priority.
    pub priority: TaskPriority,
    /// Column the task will land in.
    pub status: TaskStatus,
    /// Active input field.
    pub field: FormField,
}

impl TaskForm {
    /// Blank form for a new task in the given column.
    #[must_use]
    pub const fn new(status: TaskStatus) -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            priority: TaskPriority::Medium,
            status,
            field: FormField::Title,
        }
    }

    /// Form pre-filled from an existing task.
    #[must_use]
    pub fn edit(task: &Task) -> Self {
        Self {
            id: Some(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            status: task.status,
            field: FormField::Title,
        }
    }

    fn active_buffer(&mut self) -> &mut String {
        match self.field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
        }
    }

    fn into_draft(self) -> TaskDraft {
        TaskDraft {
            id: self.id,
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: self.status,
        }
    }
}

/// What the keyboard is currently driving.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Navigating the board.
    Browse,
    /// The task create/edit modal is open.
    EditTask(TaskForm),
    /// Awaiting y/n for a delete.
    ConfirmDelete {
        /// Task to delete on confirm.
        task_id: String,
        /// Title shown in the prompt.
        title: String,
    },
    /// Entering a new project name.
    NewProject(String),
}

/// Main application state.
pub struct App {
    /// Logged-in user's display name.
    pub user_name: String,
    /// Projects available to the user.
    pub projects: Vec<Project>,
    /// Index into `projects` of the open (or highlighted) project.
    pub selected_project: usize,
    /// Last board snapshot received from the worker.
    pub board: BoardPartition,
    /// Column the cursor is in.
    pub column: TaskStatus,
    /// Cursor row per column, indexed by [`TaskStatus::ALL`] order.
    pub row: [usize; 3],
    /// Task currently picked up for a move, if any.
    pub picked_up: Option<String>,
    /// Which panel is focused.
    pub focus: PanelFocus,
    /// Current input mode.
    pub mode: Mode,
    /// One-line status/error message.
    pub status_line: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

const fn column_index(status: TaskStatus) -> usize {
    match status {
        TaskStatus::YetToStart => 0,
        TaskStatus::InProgress => 1,
        TaskStatus::Completed => 2,
    }
}

impl App {
    /// Create the application in browse mode with an empty board.
    #[must_use]
    pub fn new(user_name: &str) -> Self {
        Self {
            user_name: user_name.to_string(),
            projects: Vec::new(),
            selected_project: 0,
            board: BoardPartition::new(),
            column: TaskStatus::YetToStart,
            row: [0; 3],
            picked_up: None,
            focus: PanelFocus::Board,
            mode: Mode::Browse,
            status_line: None,
            should_quit: false,
        }
    }

    /// The task under the cursor, if the current column has any.
    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.board
            .column(self.column)
            .get(self.row[column_index(self.column)])
    }

    /// Cursor row in the given column, clamped to its length.
    #[must_use]
    pub fn cursor_row(&self, status: TaskStatus) -> usize {
        self.row[column_index(status)]
            .min(self.board.column(status).len().saturating_sub(1))
    }

    /// Whether this task is the one picked up.
    #[must_use]
    pub fn is_picked_up(&self, task_id: &str) -> bool {
        self.picked_up.as_deref() == Some(task_id)
    }

    fn clamp_cursor(&mut self) {
        for status in TaskStatus::ALL {
            let len = self.board.column(status).len();
            let row = &mut self.row[column_index(status)];
            *row = (*row).min(len.saturating_sub(1));
        }
        if self.selected_project >= self.projects.len() {
            self.selected_project = self.projects.len().saturating_sub(1);
        }
    }

    /// Applies a worker event. Returns a follow-up command when the event
    /// calls for one (e.g. opening a freshly created project).
    pub fn apply_event(&mut self, event: BoardEvent) -> Option<BoardCommand> {
        match event {
            BoardEvent::ProjectsLoaded(projects) => {
                self.projects = projects;
                self.clamp_cursor();
                None
            }
            BoardEvent::ProjectCreated(project) => {
                let project_id = project.id.clone();
                self.projects.push(project);
                self.selected_project = self.projects.len() - 1;
                self.status_line = Some("Project created".to_string());
                Some(BoardCommand::OpenProject { project_id })
            }
            BoardEvent::Snapshot(partition) => {
                self.board = partition;
                self.clamp_cursor();
                None
            }
            BoardEvent::TaskSaved(task) => {
                self.status_line = Some(format!("Saved '{}'", task.title));
                None
            }
            BoardEvent::OperationFailed { context, message } => {
                self.status_line = Some(format!("Failed to {context}: {message}"));
                None
            }
            BoardEvent::SessionExpired => {
                self.status_line = Some("Session expired, log in again".to_string());
                self.should_quit = true;
                None
            }
        }
    }

    /// Handles a key press. Returns a command when the action needs the
    /// worker.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<BoardCommand> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }
        match &self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::EditTask(_) => self.handle_form_key(key),
            Mode::ConfirmDelete { .. } => self.handle_confirm_key(key),
            Mode::NewProject(_) => self.handle_new_project_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<BoardCommand> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    PanelFocus::Projects => PanelFocus::Board,
                    PanelFocus::Board => PanelFocus::Projects,
                };
                None
            }
            KeyCode::Esc => {
                self.status_line = None;
                if self.picked_up.take().is_some() {
                    return Some(BoardCommand::CancelDrag);
                }
                None
            }
            KeyCode::Char('r') => Some(BoardCommand::Reload),
            _ => match self.focus {
                PanelFocus::Projects => self.handle_projects_key(key),
                PanelFocus::Board => self.handle_board_key(key),
            },
        }
    }

    fn handle_projects_key(&mut self, key: KeyEvent) -> Option<BoardCommand> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected_project + 1 < self.projects.len() {
                    self.selected_project += 1;
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_project = self.selected_project.saturating_sub(1);
                None
            }
            KeyCode::Enter => {
                let project = self.projects.get(self.selected_project)?;
                self.focus = PanelFocus::Board;
                Some(BoardCommand::OpenProject {
                    project_id: project.id.clone(),
                })
            }
            KeyCode::Char('n') => {
                self.mode = Mode::NewProject(String::new());
                None
            }
            _ => None,
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> Option<BoardCommand> {
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                if let Some(prev) = self.column.prev() {
                    self.column = prev;
                }
                None
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if let Some(next) = self.column.next() {
                    self.column = next;
                }
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.board.column(self.column).len();
                let row = &mut self.row[column_index(self.column)];
                if *row + 1 < len {
                    *row += 1;
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let row = &mut self.row[column_index(self.column)];
                *row = row.saturating_sub(1);
                None
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.pick_up_or_drop(),
            KeyCode::Char('n') => {
                self.mode = Mode::EditTask(TaskForm::new(self.column));
                None
            }
            KeyCode::Char('e') => {
                let form = TaskForm::edit(self.selected_task()?);
                self.mode = Mode::EditTask(form);
                None
            }
            KeyCode::Char('d') => {
                let task = self.selected_task()?;
                self.mode = Mode::ConfirmDelete {
                    task_id: task.id.clone(),
                    title: task.title.clone(),
                };
                None
            }
            _ => None,
        }
    }

    /// Space/Enter on the board: pick up the card under the cursor, or
    /// drop the carried card onto the current column.
    fn pick_up_or_drop(&mut self) -> Option<BoardCommand> {
        if self.picked_up.take().is_some() {
            // Dropping onto the source column is resolved as a no-op by
            // the reconciler; the drag ends either way.
            return Some(BoardCommand::Drop {
                target: self.column,
            });
        }
        let task_id = self.selected_task()?.id.clone();
        self.picked_up = Some(task_id.clone());
        Some(BoardCommand::BeginDrag { task_id })
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<BoardCommand> {
        let Mode::EditTask(form) = &mut self.mode else {
            return None;
        };
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                None
            }
            KeyCode::Tab => {
                form.field = match form.field {
                    FormField::Title => FormField::Description,
                    FormField::Description => FormField::Title,
                };
                None
            }
            KeyCode::Up => {
                form.priority = next_priority(form.priority);
                None
            }
            KeyCode::Down => {
                form.priority = prev_priority(form.priority);
                None
            }
            KeyCode::Char(c) => {
                form.active_buffer().push(c);
                None
            }
            KeyCode::Backspace => {
                form.active_buffer().pop();
                None
            }
            KeyCode::Enter => {
                if form.title.trim().is_empty() {
                    // Caught here so the modal stays open; nothing is sent.
                    self.status_line = Some("Title must not be empty".to_string());
                    return None;
                }
                let form = form.clone();
                self.mode = Mode::Browse;
                Some(BoardCommand::SaveTask {
                    draft: form.into_draft(),
                })
            }
            _ => None,
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<BoardCommand> {
        let Mode::ConfirmDelete { task_id, .. } = &self.mode else {
            return None;
        };
        match key.code {
            KeyCode::Char('y') => {
                let task_id = task_id.clone();
                self.mode = Mode::Browse;
                Some(BoardCommand::RemoveTask { task_id })
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.mode = Mode::Browse;
                None
            }
            _ => None,
        }
    }

    fn handle_new_project_key(&mut self, key: KeyEvent) -> Option<BoardCommand> {
        let Mode::NewProject(name) = &mut self.mode else {
            return None;
        };
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                None
            }
            KeyCode::Char(c) => {
                name.push(c);
                None
            }
            KeyCode::Backspace => {
                name.pop();
                None
            }
            KeyCode::Enter => {
                if name.trim().is_empty() {
                    self.status_line = Some("Project name must not be empty".to_string());
                    return None;
                }
                let name = name.trim().to_string();
                self.mode = Mode::Browse;
                Some(BoardCommand::CreateProject { name })
            }
            _ => None,
        }
    }
}

const fn next_priority(priority: TaskPriority) -> TaskPriority {
    match priority {
        TaskPriority::Low => TaskPriority::Medium,
        TaskPriority::Medium | TaskPriority::High => TaskPriority::High,
    }
}

const fn prev_priority(priority: TaskPriority) -> TaskPriority {
    match priority {
        TaskPriority::High => TaskPriority::Medium,
        TaskPriority::Medium | TaskPriority::Low => TaskPriority::Low,
    }
}
