//! Keymap help bar UI component.

use crate::ui::ThemeColors;
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};

/// Draw the keymap help bar.
pub(super) fn draw_keymap(f: &mut Frame<'_>, area: Rect, loaded: bool, colors: &ThemeColors) {
    let keymap_text = if loaded {
        "q:quit | jk:nav | JK:extend | hl:fold | Space:toggle | Enter:select | a:clear | \
         m:mode | y:copy | T:theme"
    } else {
        "q:quit | T:theme"
    };

    let paragraph =
        Paragraph::new(keymap_text).style(Style::default().fg(colors.text).bg(colors.bg));

    f.render_widget(paragraph, area);
}
