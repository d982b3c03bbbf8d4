//! Project sidebar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the project list.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == PanelFocus::Projects;

    let items: Vec<ListItem> = app
        .projects
        .iter()
        .enumerate()
        .map(|(i, project)| {
            let style = if focused && i == app.selected_project {
                theme::selected()
            } else {
                theme::normal()
            };
            ListItem::new(Line::from(Span::styled(project.name.as_str(), style)))
        })
        .collect();

    let border_style = if focused {
        theme::highlighted()
    } else {
        theme::normal()
    };
    let block = Block::default()
        .title(Span::styled(
            " Projects ",
            theme::panel_title(theme::SIDEBAR_TITLE),
        ))
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(List::new(items).block(block), area);
}
