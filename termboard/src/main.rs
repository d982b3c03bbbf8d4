//! `TermBoard` -- terminal-native kanban board.
//!
//! Logs in to the board service, opens a project, and renders its tasks
//! as three status columns. Configuration via CLI flags, environment
//! variables, or config file (`~/.config/termboard/config.toml`).
//!
//! ```bash
//! # First run: log in with credentials (password via env only)
//! TERMBOARD_PASSWORD=secret cargo run --bin termboard -- \
//!     --api-url http://127.0.0.1:8900 --email alice@example.com
//!
//! # Later runs reuse the stored session
//! cargo run --bin termboard
//!
//! # Open a specific project by id or name
//! cargo run --bin termboard -- --project "Website"
//! ```

use std::io;
use std::path::Path;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use termboard::api::ApiClient;
use termboard::app::App;
use termboard::config::{CliArgs, ClientConfig};
use termboard::net::{self, BoardCommand, BoardEvent};
use termboard::selector::ProjectSelector;
use termboard::session::{self, Session, SessionStore};
use termboard::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > config file > env > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(api_url = %config.api_url, "termboard starting");

    let api = ApiClient::new(&config.api_url);
    let store = SessionStore::default_location()
        .unwrap_or_else(|| SessionStore::at(std::env::temp_dir().join("termboard-session.toml")));

    // Establish a session before touching the terminal, so login problems
    // print as ordinary errors.
    let session = match establish_session(&api, &store, &config, cli.password.as_deref()).await {
        Ok(s) => s,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    };
    let api = api.with_token(&session.token);

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, api, &session, &config).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("termboard exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the
/// terminal). Returns a [`WorkerGuard`] that must be held until shutdown
/// to ensure all buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("termboard.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Reuse the stored session if the service still accepts it, otherwise
/// log in with configured credentials.
async fn establish_session(
    api: &ApiClient,
    store: &SessionStore,
    config: &ClientConfig,
    password: Option<&str>,
) -> Result<Session, String> {
    match session::resolve_session(api, store).await {
        Ok(Some(session)) => return Ok(session),
        Ok(None) => {}
        Err(e) => return Err(format!("Error reading stored session: {e}")),
    }

    let (Some(email), Some(password)) = (config.email.as_deref(), password) else {
        return Err(
            "No stored session. Log in with --email (or TERMBOARD_EMAIL) and \
             TERMBOARD_PASSWORD."
                .to_string(),
        );
    };
    session::login_and_store(api, store, email, password)
        .await
        .map_err(|e| format!("Login failed: {e}"))
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    api: ApiClient,
    session: &Session,
    config: &ClientConfig,
) -> io::Result<()> {
    let mut app = App::new(&session.name);
    let selector = ProjectSelector::default_location();

    let (cmd_tx, mut evt_rx) = net::spawn_board(api.clone(), session.user_id.clone());

    // Kick off the project listing, and open the preferred project once
    // we know which projects exist.
    let _ = cmd_tx.try_send(BoardCommand::LoadProjects);
    match api.list_projects(&session.user_id).await {
        Ok(projects) => {
            if let Some(project) = selector.select(&projects, config.project.as_deref()) {
                selector.remember(&project.id);
                app.selected_project = projects.iter().position(|p| p.id == project.id).unwrap_or(0);
                let _ = cmd_tx.try_send(BoardCommand::OpenProject {
                    project_id: project.id.clone(),
                });
            } else {
                app.status_line = Some("No projects yet; press tab then n to create one".to_string());
            }
        }
        Err(e) => {
            app.status_line = Some(format!("Failed to load projects: {e}"));
        }
    }

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain all pending BoardEvents (non-blocking).
        drain_board_events(&mut app, &mut evt_rx, &cmd_tx, &selector);

        // Step 3: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if let Some(cmd) = app.handle_key_event(key) {
                dispatch(&mut app, &cmd_tx, &selector, cmd);
            }
        }

        if app.should_quit {
            let _ = cmd_tx.try_send(BoardCommand::Shutdown);
            return Ok(());
        }
    }
}

/// Send a command to the worker, surfacing backpressure in the status bar.
fn dispatch(
    app: &mut App,
    cmd_tx: &mpsc::Sender<BoardCommand>,
    selector: &ProjectSelector,
    cmd: BoardCommand,
) {
    if let BoardCommand::OpenProject { project_id } = &cmd {
        selector.remember(project_id);
    }
    match cmd_tx.try_send(cmd) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(_)) => {
            app.status_line = Some("Busy, try again".to_string());
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            app.status_line = Some("Board worker stopped".to_string());
        }
    }
}

/// Drain all pending `BoardEvent`s and apply them to the app, dispatching
/// any follow-up commands they produce.
fn drain_board_events(
    app: &mut App,
    rx: &mut mpsc::Receiver<BoardEvent>,
    cmd_tx: &mpsc::Sender<BoardCommand>,
    selector: &ProjectSelector,
) {
    while let Ok(event) = rx.try_recv() {
        if let Some(follow_up) = app.apply_event(event) {
            dispatch(app, cmd_tx, selector, follow_up);
        }
    }
}
