//! Theme and styling constants for the TUI.

use ratatui::style::{Color, Modifier, Style};

use termboard_api::task::{TaskPriority, TaskStatus};

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for focused elements.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Error indicator color.
pub const ERROR: Color = Color::Red;

/// Panel title color for the sidebar panel.
pub const SIDEBAR_TITLE: Color = Color::Blue;

/// Accent for the card currently picked up.
pub const PICKED_UP: Color = Color::Magenta;

/// Color for a priority marker.
#[must_use]
pub const fn priority_color(priority: TaskPriority) -> Color {
    match priority {
        TaskPriority::Low => Color::Green,
        TaskPriority::Medium => Color::Yellow,
        TaskPriority::High => Color::Red,
    }
}

/// Accent color for a board column.
#[must_use]
pub const fn column_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::YetToStart => Color::Blue,
        TaskStatus::InProgress => Color::Yellow,
        TaskStatus::Completed => Color::Green,
    }
}

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (descriptions, metadata).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Highlighted text style (focused panel borders).
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected item style (in lists).
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Style for the card being carried to another column.
#[must_use]
pub fn picked_up() -> Style {
    Style::default().fg(PICKED_UP).add_modifier(Modifier::BOLD)
}

/// Style for panel titles with a given color (bold).
#[must_use]
pub fn panel_title(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Style for error text in the status bar.
#[must_use]
pub fn error() -> Style {
    Style::default().fg(ERROR).add_modifier(Modifier::BOLD)
}

/// Style for the status bar background.
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}
