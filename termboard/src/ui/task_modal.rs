//! Modal dialogs: task create/edit form, delete confirmation, and the new
//! project prompt.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::{centered_rect, theme};
use crate::app::{App, FormField, TaskForm};

/// Render the task create/edit form over the board.
pub fn render_form(frame: &mut Frame, _app: &App, form: &TaskForm) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);

    let title = if form.id.is_some() {
        " Edit Task "
    } else {
        " New Task "
    };
    let block = Block::default()
        .title(Span::styled(title, theme::highlighted()))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        field("Title", &form.title, form.field == FormField::Title),
        rows[0],
    );
    frame.render_widget(
        field(
            "Description",
            &form.description,
            form.field == FormField::Description,
        ),
        rows[1],
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Priority: ", theme::dimmed()),
            Span::styled(
                form.priority.as_str(),
                theme::normal().fg(theme::priority_color(form.priority)),
            ),
            Span::styled("  (↑/↓ to change)", theme::dimmed()),
        ])),
        rows[2],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            "tab: next field  enter: save  esc: cancel",
            theme::dimmed(),
        )),
        rows[3],
    );
}

fn field<'a>(label: &'a str, value: &'a str, active: bool) -> Paragraph<'a> {
    let border = if active {
        theme::highlighted()
    } else {
        theme::normal()
    };
    // A trailing block cursor marks the field accepting input.
    let content = if active {
        Line::from(vec![Span::raw(value), Span::styled("█", theme::highlighted())])
    } else {
        Line::from(Span::raw(value))
    };
    Paragraph::new(content).block(
        Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_style(border),
    )
}

/// Render the delete confirmation prompt.
pub fn render_confirm(frame: &mut Frame, title: &str) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(" Delete Task ", theme::error()))
        .borders(Borders::ALL)
        .border_style(theme::error());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = vec![
        Line::from(Span::raw(format!("Delete '{title}'?"))),
        Line::from(Span::styled("y: delete  n/esc: keep", theme::dimmed())),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

/// Render the new project name prompt.
pub fn render_new_project(frame: &mut Frame, name: &str) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(" New Project ", theme::highlighted()))
        .borders(Borders::ALL)
        .border_style(theme::highlighted());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = vec![
        Line::from(vec![
            Span::raw(name),
            Span::styled("█", theme::highlighted()),
        ]),
        Line::from(Span::styled("enter: create  esc: cancel", theme::dimmed())),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}
