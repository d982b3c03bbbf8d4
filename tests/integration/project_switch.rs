//! Integration tests for rapid project switching: the board must settle
//! on the last project requested even when an earlier listing is slow,
//! and must never show a mix of two projects.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use termboard::api::{ApiClient, BoardApi};
use termboard::board::{BoardPartition, BoardReconciler};
use termboard::net::{self, BoardCommand, BoardEvent};
use termboard_api::task::{NewTask, TaskPriority, TaskStatus};
use termboard_mock::server::start_server_with_state;
use termboard_mock::state::MockState;

/// Two projects, one task each, with listings for the first project
/// artificially slowed.
async fn two_projects() -> (Arc<MockState>, ApiClient, String, String, String) {
    let state = Arc::new(MockState::new());
    let user = state.seed_user("Alice", "alice@example.com", "pw").await;
    let p1 = state.create_project(&user.id, "First", vec![]).await;
    let p2 = state.create_project(&user.id, "Second", vec![]).await;

    for (title, project_id) in [("one", &p1.id), ("two", &p2.id)] {
        state
            .create_task(NewTask {
                title: title.to_string(),
                description: String::new(),
                priority: TaskPriority::Low,
                status: TaskStatus::YetToStart,
                project_id: project_id.clone(),
            })
            .await;
    }
    state.delay_task_list(&p1.id, Duration::from_millis(300)).await;

    let (addr, _handle) = start_server_with_state("127.0.0.1:0", Arc::clone(&state))
        .await
        .expect("mock server failed to start");
    let api = ApiClient::new(&format!("http://{addr}")).with_token(&user.token);
    (state, api, user.id, p1.id.clone(), p2.id.clone())
}

fn snapshot_project_ids(partition: &BoardPartition) -> Vec<String> {
    TaskStatus::ALL
        .iter()
        .flat_map(|s| partition.column(*s))
        .map(|t| t.project_id.clone())
        .collect()
}

#[tokio::test]
async fn worker_settles_on_last_requested_project() {
    let (_state, api, user_id, p1, p2) = two_projects().await;
    let (cmd_tx, mut evt_rx) = net::spawn_board(api, user_id);

    // Open the slow project, then immediately switch to the fast one.
    cmd_tx
        .send(BoardCommand::OpenProject { project_id: p1 })
        .await
        .unwrap();
    cmd_tx
        .send(BoardCommand::OpenProject {
            project_id: p2.clone(),
        })
        .await
        .unwrap();

    // Collect every snapshot until the stream goes quiet, well past the
    // injected delay.
    let mut snapshots = Vec::new();
    while let Ok(Some(event)) = timeout(Duration::from_millis(800), evt_rx.recv()).await {
        if let BoardEvent::Snapshot(partition) = event {
            snapshots.push(partition);
        }
    }

    assert!(!snapshots.is_empty(), "no snapshot arrived");
    for snapshot in &snapshots {
        let ids = snapshot_project_ids(snapshot);
        // No snapshot may ever mix projects.
        assert!(ids.windows(2).all(|w| w[0] == w[1]), "mixed-project snapshot");
        // The slow project's listing must never surface at all: by the
        // time it lands it has been superseded.
        assert!(ids.iter().all(|id| *id == p2));
    }

    let last = snapshots.last().unwrap();
    assert_eq!(last.len(), 1);
    assert_eq!(last.column(TaskStatus::YetToStart)[0].title, "two");
}

#[tokio::test]
async fn stale_listing_is_discarded_at_the_reconciler() {
    let (_state, api, _user_id, p1, p2) = two_projects().await;
    let mut board = BoardReconciler::new(api.clone());

    let ticket_slow = board.begin_load(&p1);
    let ticket_fast = board.begin_load(&p2);

    // Run both listings concurrently; the slow one finishes last.
    let api_slow = api.clone();
    let p1_clone = p1.clone();
    let slow = tokio::spawn(async move { api_slow.list_tasks(&p1_clone).await });
    let fast_tasks = api.list_tasks(&p2).await.unwrap();

    assert!(board.complete_load(&ticket_fast, fast_tasks));
    assert_eq!(board.partition().column(TaskStatus::YetToStart)[0].title, "two");

    let slow_tasks = slow.await.unwrap().unwrap();
    assert!(!board.complete_load(&ticket_slow, slow_tasks));
    // Board unchanged by the stale arrival.
    assert_eq!(board.partition().len(), 1);
    assert_eq!(board.partition().column(TaskStatus::YetToStart)[0].title, "two");
}
