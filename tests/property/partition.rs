//! Property-based tests for the board partition.
//!
//! Uses proptest to verify:
//! 1. Partitioning any task listing places every task in the column
//!    matching its status, with nothing lost or duplicated.
//! 2. Any sequence of moves and removals keeps the partition consistent:
//!    each task in exactly the column its status names, each id at most
//!    once.

use proptest::prelude::*;

use termboard::board::BoardPartition;
use termboard_api::task::{Task, TaskPriority, TaskStatus};

// --- Strategies ---

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::YetToStart),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Completed),
    ]
}

fn arb_priority() -> impl Strategy<Value = TaskPriority> {
    prop_oneof![
        Just(TaskPriority::Low),
        Just(TaskPriority::Medium),
        Just(TaskPriority::High),
    ]
}

/// A listing of up to 24 tasks with unique ids and arbitrary statuses.
fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec((arb_status(), arb_priority()), 0..24).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (status, priority))| Task {
                id: format!("t-{i}"),
                title: format!("task {i}"),
                description: String::new(),
                priority,
                status,
                project_id: "p-1".to_string(),
            })
            .collect()
    })
}

/// A board mutation: move some task to some column, or remove some task.
/// Indices are taken modulo the task count so every op targets a task
/// that existed in the original listing.
#[derive(Debug, Clone)]
enum Op {
    Move(usize, TaskStatus),
    Remove(usize),
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            (any::<usize>(), arb_status()).prop_map(|(i, s)| Op::Move(i, s)),
            any::<usize>().prop_map(Op::Remove),
        ],
        0..32,
    )
}

// --- Properties ---

proptest! {
    /// Partitioning preserves every task and files each under its status.
    #[test]
    fn partition_is_total_and_exact(tasks in arb_tasks()) {
        let board = BoardPartition::from_tasks(tasks.clone());

        prop_assert_eq!(board.len(), tasks.len());
        prop_assert!(board.is_consistent());
        for task in &tasks {
            prop_assert_eq!(board.status_of(&task.id), Some(task.status));
        }
    }

    /// No sequence of moves and removals can duplicate a task or leave it
    /// in a column that disagrees with its status.
    #[test]
    fn mutations_preserve_consistency(tasks in arb_tasks(), ops in arb_ops()) {
        let count = tasks.len();
        let mut board = BoardPartition::from_tasks(tasks);

        for op in ops {
            match op {
                Op::Move(i, target) if count > 0 => {
                    board.move_task(&format!("t-{}", i % count), target);
                }
                Op::Remove(i) if count > 0 => {
                    board.remove_task(&format!("t-{}", i % count));
                }
                _ => {}
            }
            prop_assert!(board.is_consistent());
            prop_assert!(board.len() <= count);
        }
    }

    /// Moving a task and moving it back restores its original column.
    #[test]
    fn move_round_trip_restores_column(tasks in arb_tasks(), target in arb_status()) {
        prop_assume!(!tasks.is_empty());
        let original = tasks[0].status;
        let id = tasks[0].id.clone();
        let mut board = BoardPartition::from_tasks(tasks);

        if board.move_task(&id, target).is_some() {
            prop_assert_eq!(board.status_of(&id), Some(target));
            prop_assert_eq!(board.move_task(&id, original), Some(target));
        }
        prop_assert_eq!(board.status_of(&id), Some(original));
        prop_assert!(board.is_consistent());
    }
}
