//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::App;

const BROWSE_HINTS: &str = "space: pick up/drop  n: new  e: edit  d: delete  r: reload  q: quit";

/// Render the one-line status bar.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!(" {} ", app.user_name),
        theme::status_bar_bg(),
    )];

    if let Some(message) = &app.status_line {
        let style = if message.starts_with("Failed") {
            theme::error()
        } else {
            theme::status_bar_bg()
        };
        spans.push(Span::styled(format!("| {message} "), style));
    } else if app.picked_up.is_some() {
        spans.push(Span::styled(
            "| carrying a card, space drops it here, esc puts it back ",
            theme::picked_up(),
        ));
    } else {
        spans.push(Span::styled(format!("| {BROWSE_HINTS} "), theme::dimmed()));
    }

    let bar = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(bar, area);
}
