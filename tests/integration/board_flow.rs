//! Integration tests for the board load and drag-and-drop flow against
//! the in-process mock service.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use termboard::api::{ApiClient, BoardApi};
use termboard::board::{BoardReconciler, TaskDraft};
use termboard::net::{self, BoardCommand, BoardEvent};
use termboard_api::project::ProjectPatch;
use termboard_api::task::{NewTask, TaskPriority, TaskStatus};
use termboard_api::user::AuthUser;
use termboard_mock::server::start_server_with_state;
use termboard_mock::state::MockState;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Starts a mock server with one user and one project containing tasks in
/// every column. Returns an authenticated client and the project id.
async fn seeded_board() -> (Arc<MockState>, ApiClient, AuthUser, String) {
    let state = Arc::new(MockState::new());
    let user = state.seed_user("Alice", "alice@example.com", "pw").await;
    let project = state.create_project(&user.id, "Website", vec![]).await;

    for (title, status) in [
        ("design landing page", TaskStatus::YetToStart),
        ("set up CI", TaskStatus::YetToStart),
        ("write copy", TaskStatus::InProgress),
        ("register domain", TaskStatus::Completed),
    ] {
        state
            .create_task(NewTask {
                title: title.to_string(),
                description: String::new(),
                priority: TaskPriority::Medium,
                status,
                project_id: project.id.clone(),
            })
            .await;
    }

    let (addr, _handle) = start_server_with_state("127.0.0.1:0", Arc::clone(&state))
        .await
        .expect("mock server failed to start");
    let api = ApiClient::new(&format!("http://{addr}")).with_token(&user.token);
    (state, api, user, project.id)
}

/// Loads the project into a fresh reconciler.
async fn load_board(api: &ApiClient, project_id: &str) -> BoardReconciler<ApiClient> {
    let mut board = BoardReconciler::new(api.clone());
    let ticket = board.begin_load(project_id);
    let tasks = api.list_tasks(project_id).await.expect("list_tasks failed");
    assert!(board.complete_load(&ticket, tasks));
    board
}

// ---------------------------------------------------------------------------
// Load and partition
// ---------------------------------------------------------------------------

#[tokio::test]
async fn load_partitions_tasks_by_status() {
    let (_state, api, _user, project_id) = seeded_board().await;
    let board = load_board(&api, &project_id).await;

    assert_eq!(board.partition().column(TaskStatus::YetToStart).len(), 2);
    assert_eq!(board.partition().column(TaskStatus::InProgress).len(), 1);
    assert_eq!(board.partition().column(TaskStatus::Completed).len(), 1);
    assert!(board.partition().is_consistent());
}

// ---------------------------------------------------------------------------
// Drag and drop
// ---------------------------------------------------------------------------

#[tokio::test]
async fn drop_is_visible_before_and_after_commit() {
    let (state, api, _user, project_id) = seeded_board().await;
    let mut board = load_board(&api, &project_id).await;

    let task_id = board.partition().column(TaskStatus::YetToStart)[0].id.clone();
    assert!(board.begin_drag(&task_id));
    let pending = board.prepare_drop(TaskStatus::InProgress).unwrap();

    // Optimistic: moved locally before the server has been asked.
    assert_eq!(
        board.partition().status_of(&task_id),
        Some(TaskStatus::InProgress)
    );

    board.commit_drop(pending).await.unwrap();
    assert_eq!(
        board.partition().status_of(&task_id),
        Some(TaskStatus::InProgress)
    );

    // The server agrees.
    let server_tasks = state.tasks_for(&project_id).await;
    let server_task = server_tasks.iter().find(|t| t.id == task_id).unwrap();
    assert_eq!(server_task.status, TaskStatus::InProgress);
}

#[tokio::test]
async fn drop_on_own_column_sends_nothing() {
    let (state, api, _user, project_id) = seeded_board().await;
    let mut board = load_board(&api, &project_id).await;

    let before = state.tasks_for(&project_id).await;
    let task_id = board.partition().column(TaskStatus::Completed)[0].id.clone();

    board.begin_drag(&task_id);
    assert!(board.prepare_drop(TaskStatus::Completed).is_none());
    assert!(board.dragged().is_none());

    // Server state untouched.
    assert_eq!(state.tasks_for(&project_id).await, before);
}

#[tokio::test]
async fn queued_mutations_run_in_command_order() {
    let (state, api, user, project_id) = seeded_board().await;
    let (cmd_tx, mut evt_rx) = net::spawn_board(api, user.id);

    cmd_tx
        .send(BoardCommand::OpenProject {
            project_id: project_id.clone(),
        })
        .await
        .unwrap();
    // Two saves queued back to back; the worker runs them one at a time,
    // in order.
    for title in ["first", "second"] {
        cmd_tx
            .send(BoardCommand::SaveTask {
                draft: TaskDraft {
                    title: title.to_string(),
                    ..TaskDraft::default()
                },
            })
            .await
            .unwrap();
    }

    let mut saved = Vec::new();
    while let Ok(Some(event)) = timeout(Duration::from_millis(800), evt_rx.recv()).await {
        if let BoardEvent::TaskSaved(task) = event {
            saved.push(task.title);
        }
        if saved.len() == 2 {
            break;
        }
    }
    assert_eq!(saved, ["first", "second"]);
    assert_eq!(state.tasks_for(&project_id).await.len(), 6);
}

// ---------------------------------------------------------------------------
// Project lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn project_rename_and_delete() {
    let (state, api, user, project_id) = seeded_board().await;

    let renamed = api
        .update_project(
            &project_id,
            &ProjectPatch {
                name: Some("Relaunch".to_string()),
                invited_users: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Relaunch");

    let listed = api.list_projects(&user.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Relaunch");

    api.delete_project(&project_id).await.unwrap();
    assert!(api.list_projects(&user.id).await.unwrap().is_empty());
    // Tasks go with the project.
    assert!(state.tasks_for(&project_id).await.is_empty());
}

#[tokio::test]
async fn reload_after_external_change_reflects_server() {
    let (state, api, _user, project_id) = seeded_board().await;
    let mut board = load_board(&api, &project_id).await;
    let initial = board.partition().len();

    // Another client adds a task behind our back.
    state
        .create_task(NewTask {
            title: "surprise".to_string(),
            description: String::new(),
            priority: TaskPriority::High,
            status: TaskStatus::InProgress,
            project_id: project_id.clone(),
        })
        .await;

    let ticket = board.begin_load(&project_id);
    let tasks = api.list_tasks(&project_id).await.unwrap();
    assert!(board.complete_load(&ticket, tasks));
    assert_eq!(board.partition().len(), initial + 1);
}
