//! User interface rendering.

mod keymap_bar;
mod status_bar;
mod theme;
mod tree;

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub use theme::ThemeColors;
pub use tree::truncate;

/// Draw the UI.
pub fn draw(f: &mut Frame<'_>, app: &mut App) {
    let colors = ThemeColors::from_theme(&app.theme);

    // Tree, status bar and key map bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)])
        .split(f.area());

    tree::draw_tree(f, app, chunks[0], &colors);
    status_bar::draw_status(f, chunks[1], app, &colors);
    keymap_bar::draw_keymap(f, chunks[2], app.outline.is_some(), &colors);
}
