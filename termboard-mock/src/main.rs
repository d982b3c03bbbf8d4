//! `TermBoard` mock API server -- in-memory backend for local development.
//!
//! Serves the same REST contract as the production service, with all state
//! held in memory and lost on exit.
//!
//! # Usage
//!
//! ```bash
//! # Run on the default address 127.0.0.1:8900
//! cargo run --bin termboard-mock
//!
//! # Custom address, with a seeded demo account
//! cargo run --bin termboard-mock -- --bind 127.0.0.1:9100 --seed-demo
//! ```
//!
//! The demo account logs in as `demo@termboard.dev` / `demo`.

use std::sync::Arc;

use clap::Parser;
use termboard_api::task::{NewTask, TaskPriority, TaskStatus};
use termboard_mock::config::{MockCliArgs, MockConfig};
use termboard_mock::server;
use termboard_mock::state::MockState;

/// Seeds a demo account with one project and a few tasks spread across
/// the board columns.
async fn seed_demo(state: &MockState) {
    let user = state.seed_user("Demo", "demo@termboard.dev", "demo").await;
    let project = state.create_project(&user.id, "Getting Started", vec![]).await;
    let samples = [
        ("Read the keybindings", TaskStatus::YetToStart, TaskPriority::Low),
        ("Move this card", TaskStatus::YetToStart, TaskPriority::High),
        ("Try editing a task", TaskStatus::InProgress, TaskPriority::Medium),
        ("Log in", TaskStatus::Completed, TaskPriority::Low),
    ];
    for (title, status, priority) in samples {
        state
            .create_task(NewTask {
                title: title.to_string(),
                description: String::new(),
                priority,
                status,
                project_id: project.id.clone(),
            })
            .await;
    }
    tracing::info!(user_id = %user.id, project_id = %project.id, "seeded demo account");
}

#[tokio::main]
async fn main() {
    let cli = MockCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match MockConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting termboard mock server");

    let state = Arc::new(MockState::new());
    if config.seed_demo {
        seed_demo(&state).await;
    }

    match server::start_server_with_state(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "mock server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "mock server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start mock server");
            std::process::exit(1);
        }
    }
}
