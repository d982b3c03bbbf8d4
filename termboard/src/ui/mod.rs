//! Terminal UI rendering.

pub mod board_panel;
pub mod sidebar;
pub mod status_bar;
pub mod task_modal;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use crate::app::{App, Mode};

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    // Main layout with status bar at bottom.
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let content_area = main_chunks[0];
    let status_area = main_chunks[1];

    // Sidebar plus the board.
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(20), Constraint::Percentage(80)])
        .split(content_area);

    sidebar::render(frame, content_chunks[0], app);
    board_panel::render(frame, content_chunks[1], app);
    status_bar::render(frame, status_area, app);

    // Modals draw last, over everything else.
    match &app.mode {
        Mode::Browse => {}
        Mode::EditTask(form) => task_modal::render_form(frame, app, form),
        Mode::ConfirmDelete { title, .. } => task_modal::render_confirm(frame, title),
        Mode::NewProject(name) => task_modal::render_new_project(frame, name),
    }
}

/// A rectangle centered in `area` with the given percentage size.
#[must_use]
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
