//! Integration tests for task create, edit, and delete.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use termboard::api::{ApiClient, ApiError, BoardApi};
use termboard::board::{BoardError, BoardReconciler, TaskDraft};
use termboard_api::task::{NewTask, TaskPriority, TaskStatus};
use termboard_mock::server::start_server_with_state;
use termboard_mock::state::MockState;

async fn empty_project() -> (Arc<MockState>, ApiClient, String) {
    let state = Arc::new(MockState::new());
    let user = state.seed_user("Alice", "alice@example.com", "pw").await;
    let project = state.create_project(&user.id, "P", vec![]).await;
    let (addr, _handle) = start_server_with_state("127.0.0.1:0", Arc::clone(&state))
        .await
        .expect("mock server failed to start");
    let api = ApiClient::new(&format!("http://{addr}")).with_token(&user.token);
    (state, api, project.id)
}

async fn loaded(api: &ApiClient, project_id: &str) -> BoardReconciler<ApiClient> {
    let mut board = BoardReconciler::new(api.clone());
    let ticket = board.begin_load(project_id);
    let tasks = api.list_tasks(project_id).await.unwrap();
    board.complete_load(&ticket, tasks);
    board
}

#[tokio::test]
async fn blank_title_never_reaches_the_server() {
    let (state, api, project_id) = empty_project().await;
    let mut board = loaded(&api, &project_id).await;

    let err = board
        .save_task(TaskDraft {
            title: "  \t ".to_string(),
            ..TaskDraft::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, BoardError::TitleEmpty));
    assert!(state.tasks_for(&project_id).await.is_empty());
}

#[tokio::test]
async fn create_then_edit_round_trips() {
    let (state, api, project_id) = empty_project().await;
    let mut board = loaded(&api, &project_id).await;

    let created = board
        .save_task(TaskDraft {
            title: "  write docs  ".to_string(),
            description: "user guide".to_string(),
            priority: TaskPriority::High,
            status: TaskStatus::YetToStart,
            ..TaskDraft::default()
        })
        .await
        .unwrap();
    // Title was trimmed before sending.
    assert_eq!(created.title, "write docs");
    assert_eq!(board.partition().len(), 1);

    let edited = board
        .save_task(TaskDraft {
            id: Some(created.id.clone()),
            title: "write the docs".to_string(),
            description: created.description.clone(),
            priority: TaskPriority::Low,
            status: TaskStatus::InProgress,
        })
        .await
        .unwrap();
    assert_eq!(edited.priority, TaskPriority::Low);

    // Local board and server agree.
    assert_eq!(
        board.partition().status_of(&created.id),
        Some(TaskStatus::InProgress)
    );
    let server_tasks = state.tasks_for(&project_id).await;
    assert_eq!(server_tasks.len(), 1);
    assert_eq!(server_tasks[0].title, "write the docs");
}

#[tokio::test]
async fn delete_is_idempotent_end_to_end() {
    let (state, api, project_id) = empty_project().await;
    let mut board = loaded(&api, &project_id).await;

    let task = board
        .save_task(TaskDraft {
            title: "short lived".to_string(),
            ..TaskDraft::default()
        })
        .await
        .unwrap();

    assert!(board.remove(&task.id).await.unwrap());
    // Second delete of the same task still succeeds.
    assert!(!board.remove(&task.id).await.unwrap());
    assert!(board.partition().is_empty());
    assert!(state.tasks_for(&project_id).await.is_empty());
}

#[tokio::test]
async fn create_in_unknown_project_is_rejected() {
    let (_state, api, _project_id) = empty_project().await;
    let err = api
        .create_task(NewTask {
            title: "orphan".to_string(),
            description: String::new(),
            priority: TaskPriority::Low,
            status: TaskStatus::YetToStart,
            project_id: "p-missing".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Rejected { status: 404, .. }));
}
