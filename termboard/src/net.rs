//! Coordinator wiring the TUI to the async board layer.
//!
//! This module bridges the synchronous TUI event loop (crossterm
//! poll-based) with the async [`BoardReconciler`] / [`ApiClient`] stack. It
//! spawns a background tokio worker and communicates with the main thread
//! via [`BoardCommand`] / [`BoardEvent`] channels.
//!
//! # Architecture
//!
//! ```text
//! TUI (main thread)  ←── BoardEvent ───  tokio worker
//!                     ─── BoardCommand →
//! ```
//!
//! The worker runs mutations one at a time in command order, so no two
//! mutating requests are ever in flight together. Board loads are the
//! exception: they are spawned as separate tasks and report back through
//! an internal channel, so a slow listing never blocks the worker and a
//! superseded listing is discarded by ticket when it lands.

use tokio::sync::mpsc;

use termboard_api::project::{NewProject, Project};
use termboard_api::task::{Task, TaskStatus};

use crate::api::{ApiClient, ApiError, BoardApi};
use crate::board::{BoardError, BoardPartition, BoardReconciler, LoadTicket, TaskDraft};

/// Commands sent from the TUI main loop to the board worker.
#[derive(Debug)]
pub enum BoardCommand {
    /// Fetch the user's project list.
    LoadProjects,
    /// Switch the board to a project and load its tasks.
    OpenProject {
        /// Project to open.
        project_id: String,
    },
    /// Reload the current project's tasks.
    Reload,
    /// Pick up a task for a move.
    BeginDrag {
        /// Task to pick up.
        task_id: String,
    },
    /// Put the picked-up task down without moving it.
    CancelDrag,
    /// Drop the picked-up task onto a column.
    Drop {
        /// Column dropped onto.
        target: TaskStatus,
    },
    /// Create or update a task from user input.
    SaveTask {
        /// The entered fields.
        draft: TaskDraft,
    },
    /// Delete a task.
    RemoveTask {
        /// Task to delete.
        task_id: String,
    },
    /// Create a new project.
    CreateProject {
        /// Project name.
        name: String,
    },
    /// Gracefully shut down the worker.
    Shutdown,
}

/// Events sent from the board worker to the TUI main loop.
#[derive(Debug)]
pub enum BoardEvent {
    /// The project list arrived.
    ProjectsLoaded(Vec<Project>),
    /// A project was created.
    ProjectCreated(Project),
    /// The board changed; replaces whatever the TUI was showing.
    Snapshot(BoardPartition),
    /// A task was created or updated.
    TaskSaved(Task),
    /// An operation failed. When it mutated the board, a [`Snapshot`]
    /// carrying the rolled-back state follows.
    ///
    /// [`Snapshot`]: BoardEvent::Snapshot
    OperationFailed {
        /// What was being attempted.
        context: &'static str,
        /// Human-readable reason.
        message: String,
    },
    /// The server rejected the bearer token mid-session. The user must
    /// log in again.
    SessionExpired,
}

/// Classifies a failed operation: a 401 becomes [`BoardEvent::SessionExpired`],
/// everything else an [`BoardEvent::OperationFailed`].
fn api_failure(context: &'static str, err: &ApiError) -> BoardEvent {
    if matches!(err, ApiError::Unauthorized) {
        BoardEvent::SessionExpired
    } else {
        BoardEvent::OperationFailed {
            context,
            message: err.to_string(),
        }
    }
}

fn board_failure(context: &'static str, err: &BoardError) -> BoardEvent {
    match err {
        BoardError::Api(api_err) => api_failure(context, api_err),
        other => BoardEvent::OperationFailed {
            context,
            message: other.to_string(),
        },
    }
}

/// Channel capacity for commands and events.
const CHANNEL_CAPACITY: usize = 256;

/// Capacity of the internal load-result channel. Loads beyond this are
/// applied as the worker drains; ordering is preserved per ticket.
const LOAD_CHANNEL_CAPACITY: usize = 8;

/// Spawn the board worker and return channel handles.
///
/// `api` must already carry the session's bearer token; `user_id` scopes
/// project listings.
#[must_use]
pub fn spawn_board(
    api: ApiClient,
    user_id: String,
) -> (mpsc::Sender<BoardCommand>, mpsc::Receiver<BoardEvent>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<BoardCommand>(CHANNEL_CAPACITY);
    let (evt_tx, evt_rx) = mpsc::channel::<BoardEvent>(CHANNEL_CAPACITY);

    tokio::spawn(async move {
        worker(api, user_id, cmd_rx, evt_tx).await;
        tracing::info!("board worker stopped");
    });

    (cmd_tx, evt_rx)
}

type LoadResult = (LoadTicket, Result<Vec<Task>, ApiError>);

/// The worker task: owns the reconciler, serializes mutations, and
/// collects spawned load results.
async fn worker(
    api: ApiClient,
    user_id: String,
    mut cmd_rx: mpsc::Receiver<BoardCommand>,
    evt_tx: mpsc::Sender<BoardEvent>,
) {
    let mut board = BoardReconciler::new(api.clone());
    let (load_tx, mut load_rx) = mpsc::channel::<LoadResult>(LOAD_CHANNEL_CAPACITY);

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break };
                if matches!(cmd, BoardCommand::Shutdown) {
                    tracing::info!("board worker shutting down");
                    break;
                }
                handle_command(cmd, &api, &user_id, &mut board, &load_tx, &evt_tx).await;
            }
            Some((ticket, result)) = load_rx.recv() => {
                handle_load_result(ticket, result, &mut board, &evt_tx).await;
            }
        }
    }
}

/// Kicks off a ticketed background load of a project's tasks.
fn spawn_load(
    api: &ApiClient,
    ticket: LoadTicket,
    load_tx: &mpsc::Sender<LoadResult>,
) {
    let api = api.clone();
    let load_tx = load_tx.clone();
    tokio::spawn(async move {
        let result = api.list_tasks(ticket.project_id()).await;
        // Worker gone means shutdown; nothing to do with the result.
        let _ = load_tx.send((ticket, result)).await;
    });
}

async fn handle_load_result(
    ticket: LoadTicket,
    result: Result<Vec<Task>, ApiError>,
    board: &mut BoardReconciler<ApiClient>,
    evt_tx: &mpsc::Sender<BoardEvent>,
) {
    match result {
        Ok(tasks) => {
            if board.complete_load(&ticket, tasks) {
                let _ = evt_tx.send(BoardEvent::Snapshot(board.partition().clone())).await;
            }
        }
        Err(e) => {
            // A failed load that has already been superseded is noise.
            if board.is_current(&ticket) {
                let _ = evt_tx.send(api_failure("load tasks", &e)).await;
            }
        }
    }
}

#[allow(clippy::too_many_lines)]
async fn handle_command(
    cmd: BoardCommand,
    api: &ApiClient,
    user_id: &str,
    board: &mut BoardReconciler<ApiClient>,
    load_tx: &mpsc::Sender<LoadResult>,
    evt_tx: &mpsc::Sender<BoardEvent>,
) {
    match cmd {
        BoardCommand::LoadProjects => match api.list_projects(user_id).await {
            Ok(projects) => {
                let _ = evt_tx.send(BoardEvent::ProjectsLoaded(projects)).await;
            }
            Err(e) => {
                let _ = evt_tx.send(api_failure("load projects", &e)).await;
            }
        },
        BoardCommand::OpenProject { project_id } => {
            let ticket = board.begin_load(&project_id);
            spawn_load(api, ticket, load_tx);
        }
        BoardCommand::Reload => {
            if let Some(project_id) = board.project_id().map(String::from) {
                let ticket = board.begin_load(&project_id);
                spawn_load(api, ticket, load_tx);
            }
        }
        BoardCommand::BeginDrag { task_id } => {
            board.begin_drag(&task_id);
        }
        BoardCommand::CancelDrag => {
            board.cancel_drag();
        }
        BoardCommand::Drop { target } => {
            let Some(pending) = board.prepare_drop(target) else {
                return;
            };
            // Show the optimistic move before the server answers.
            let _ = evt_tx.send(BoardEvent::Snapshot(board.partition().clone())).await;

            match board.commit_drop(pending).await {
                Ok(()) => {
                    let _ = evt_tx.send(BoardEvent::Snapshot(board.partition().clone())).await;
                }
                Err(e) => {
                    let _ = evt_tx.send(board_failure("move task", &e)).await;
                    // Rolled-back state.
                    let _ = evt_tx.send(BoardEvent::Snapshot(board.partition().clone())).await;
                }
            }
        }
        BoardCommand::SaveTask { draft } => match board.save_task(draft).await {
            Ok(task) => {
                let _ = evt_tx.send(BoardEvent::TaskSaved(task)).await;
                let _ = evt_tx.send(BoardEvent::Snapshot(board.partition().clone())).await;
            }
            Err(e) => {
                let _ = evt_tx.send(board_failure("save task", &e)).await;
            }
        },
        BoardCommand::RemoveTask { task_id } => match board.remove(&task_id).await {
            Ok(_) => {
                let _ = evt_tx.send(BoardEvent::Snapshot(board.partition().clone())).await;
            }
            Err(e) => {
                let _ = evt_tx.send(board_failure("delete task", &e)).await;
            }
        },
        BoardCommand::CreateProject { name } => {
            let new = NewProject {
                name,
                invited_users: vec![],
            };
            match api.create_project(&new).await {
                Ok(project) => {
                    let _ = evt_tx.send(BoardEvent::ProjectCreated(project)).await;
                }
                Err(e) => {
                    let _ = evt_tx.send(api_failure("create project", &e)).await;
                }
            }
        }
        BoardCommand::Shutdown => {
            // Handled by the worker loop before dispatch.
        }
    }
}
