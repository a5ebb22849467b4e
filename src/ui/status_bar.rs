//! Status bar UI component.

use crate::app::App;
use crate::ui::ThemeColors;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

/// Draw the status bar.
pub(super) fn draw_status(f: &mut Frame<'_>, area: Rect, app: &App, colors: &ThemeColors) {
    let summary = format!(
        "{} | {} selected ",
        app.view.selection_mode(),
        app.view.selected_items().len()
    );
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(summary.len() as u16)])
        .split(area);

    let base = Style::default().fg(colors.status_fg).bg(colors.status_bg);
    let message = match &app.error_message {
        Some(error) => Paragraph::new(error.as_str()).style(base.fg(colors.error)),
        None => Paragraph::new(app.status.as_str()).style(base),
    };
    f.render_widget(message, chunks[0]);
    f.render_widget(
        Paragraph::new(summary).style(base).alignment(Alignment::Right),
        chunks[1],
    );
}
