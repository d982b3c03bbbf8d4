//! Board rendering: one bordered column per task status.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use termboard_api::task::{Task, TaskStatus};

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the three board columns side by side.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(area);

    for (chunk, status) in columns.iter().zip(TaskStatus::ALL) {
        render_column(frame, *chunk, app, status);
    }
}

fn render_column(frame: &mut Frame, area: Rect, app: &App, status: TaskStatus) {
    let tasks = app.board.column(status);
    let cursor_here = app.focus == PanelFocus::Board && app.column == status;

    let items: Vec<ListItem> = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| card(app, task, cursor_here && i == app.cursor_row(status)))
        .collect();

    let border_style = if cursor_here {
        theme::highlighted()
    } else {
        theme::normal()
    };
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ({}) ", status, tasks.len()),
            theme::panel_title(theme::column_color(status)),
        ))
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(List::new(items).block(block), area);
}

/// One task card: a priority marker, the title, and the pick-up indicator
/// when the card is being carried.
fn card<'a>(app: &App, task: &'a Task, under_cursor: bool) -> ListItem<'a> {
    let marker = Span::styled("▎", theme::normal().fg(theme::priority_color(task.priority)));

    let title_style = if app.is_picked_up(&task.id) {
        theme::picked_up()
    } else if under_cursor {
        theme::selected()
    } else {
        theme::normal()
    };

    let mut spans = vec![marker, Span::raw(" ")];
    if app.is_picked_up(&task.id) {
        spans.push(Span::styled("◆ ", theme::picked_up()));
    }
    spans.push(Span::styled(task.title.as_str(), title_style));

    ListItem::new(Line::from(spans))
}
