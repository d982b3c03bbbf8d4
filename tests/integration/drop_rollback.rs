//! Integration tests for drop rollback: when the server rejects a move,
//! the board must end up exactly where the server says it is.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use termboard::api::{ApiClient, BoardApi};
use termboard::board::{BoardError, BoardReconciler};
use termboard_api::task::{NewTask, TaskPriority, TaskStatus};
use termboard_mock::server::start_server_with_state;
use termboard_mock::state::MockState;

async fn board_with_one_task() -> (Arc<MockState>, BoardReconciler<ApiClient>, String, String) {
    let state = Arc::new(MockState::new());
    let user = state.seed_user("Alice", "alice@example.com", "pw").await;
    let project = state.create_project(&user.id, "P", vec![]).await;
    let task = state
        .create_task(NewTask {
            title: "only task".to_string(),
            description: String::new(),
            priority: TaskPriority::Low,
            status: TaskStatus::YetToStart,
            project_id: project.id.clone(),
        })
        .await;

    let (addr, _handle) = start_server_with_state("127.0.0.1:0", Arc::clone(&state))
        .await
        .expect("mock server failed to start");
    let api = ApiClient::new(&format!("http://{addr}")).with_token(&user.token);

    let mut board = BoardReconciler::new(api.clone());
    let ticket = board.begin_load(&project.id);
    let tasks = api.list_tasks(&project.id).await.unwrap();
    board.complete_load(&ticket, tasks);

    (state, board, project.id, task.id)
}

#[tokio::test]
async fn rejected_drop_restores_source_column() {
    let (state, mut board, project_id, task_id) = board_with_one_task().await;
    state.fail_task_updates(1).await;

    board.begin_drag(&task_id);
    let pending = board.prepare_drop(TaskStatus::Completed).unwrap();
    assert_eq!(
        board.partition().status_of(&task_id),
        Some(TaskStatus::Completed)
    );

    let err = board.commit_drop(pending).await.unwrap_err();
    assert!(matches!(err, BoardError::Api(_)));

    // Rolled back to server truth: one task, original column, never two
    // columns at once.
    assert_eq!(board.partition().len(), 1);
    assert_eq!(
        board.partition().status_of(&task_id),
        Some(TaskStatus::YetToStart)
    );
    assert!(board.partition().is_consistent());

    let server_tasks = state.tasks_for(&project_id).await;
    assert_eq!(server_tasks[0].status, TaskStatus::YetToStart);
}

#[tokio::test]
async fn move_after_failed_move_succeeds() {
    let (state, mut board, project_id, task_id) = board_with_one_task().await;
    state.fail_task_updates(1).await;

    board.begin_drag(&task_id);
    let pending = board.prepare_drop(TaskStatus::InProgress).unwrap();
    assert!(board.commit_drop(pending).await.is_err());

    // The fault was consumed; the retry goes through.
    board.begin_drag(&task_id);
    let pending = board.prepare_drop(TaskStatus::InProgress).unwrap();
    board.commit_drop(pending).await.unwrap();

    let server_tasks = state.tasks_for(&project_id).await;
    assert_eq!(server_tasks[0].status, TaskStatus::InProgress);
}
