//! Tree panel UI rendering.

use crate::app::{App, RowArea};
use crate::interaction::FocusTarget;
use crate::tree::NodeId;
use crate::ui::ThemeColors;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Draw the tree panel.
pub(super) fn draw_tree(f: &mut Frame<'_>, app: &mut App, area: Rect, colors: &ThemeColors) {
    let Some(outline) = app.outline.as_ref() else {
        draw_welcome(f, area, colors);
        return;
    };

    let title = format!(
        " {} [{}] ",
        outline.title().unwrap_or_else(|| "Arborist".to_string()),
        app.view.selection_mode()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .style(Style::default().bg(colors.bg));
    let inner = block.inner(area);
    app.row_area = RowArea {
        x: inner.x,
        y: inner.y,
        width: inner.width,
        height: inner.height,
    };

    let viewport_height = usize::from(inner.height);
    app.adjust_scroll(viewport_height);

    let width = usize::from(inner.width);
    let items: Vec<ListItem<'_>> = app
        .rows()
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(viewport_height)
        .map(|(index, id)| ListItem::new(row_line(app, *id, index, width, colors)))
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn row_line(
    app: &App,
    id: NodeId,
    index: usize,
    width: usize,
    colors: &ThemeColors,
) -> Line<'static> {
    let nodes = app.view.nodes();
    let Some(node) = nodes.get(id) else {
        return Line::from("");
    };
    let depth = nodes.depth(id);
    let rulers = app.view.config().vertical_rulers;
    let guide = if rulers { "│ " } else { "  " };
    let indent = guide.repeat(depth);

    let entry = app.entry(id);
    let icon = match entry {
        Some(entry) if entry.has_children() => {
            if node.is_expanded() {
                "▼ "
            } else {
                "▶ "
            }
        },
        _ => "  ",
    };
    let label = entry.map_or_else(|| node.item().clone(), |entry| entry.display_name());

    let prefix_width = indent.width() + icon.width();
    let label = truncate(&label, width.saturating_sub(prefix_width));

    let focused = app.view.focused() == Some(FocusTarget::Node(id));
    let hovered = app.hover == Some(index);

    let mut style = Style::default().fg(colors.text);
    if !node.is_enabled() {
        style = style.fg(colors.disabled).add_modifier(Modifier::ITALIC);
    }
    if hovered && !node.is_selected() {
        style = style.bg(colors.hover_bg);
    }
    if node.is_selected() {
        style = style.fg(colors.selection_fg).bg(colors.selection_bg);
    }
    if focused {
        style = if app.view.is_keyboard_mode() {
            style
                .fg(colors.cursor_fg)
                .bg(colors.cursor_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            style.add_modifier(Modifier::UNDERLINED)
        };
    }

    let indent_style = if rulers {
        Style::default().fg(colors.ruler)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(indent, indent_style),
        Span::styled(icon, style),
        Span::styled(label, style),
    ])
}

/// Cut `text` to at most `max_width` terminal columns, ending with an
/// ellipsis when anything was cut.
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - ELLIPSIS.width().unwrap_or(1);
    let mut result = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > budget {
            break;
        }
        used += ch_width;
        result.push(ch);
    }
    result.push(ELLIPSIS);
    result
}

/// Draw the welcome screen.
pub(super) fn draw_welcome(f: &mut Frame<'_>, area: Rect, colors: &ThemeColors) {
    let lines = vec![
        Line::from(Span::styled(
            "Welcome to Arborist!",
            Style::default()
                .fg(colors.heading)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Open an outline file to get started"),
        Line::from(""),
        Line::from("Usage: arborist <outline.txt>"),
        Line::from(""),
        Line::from("One entry per line, nested by two spaces or a tab."),
        Line::from("Mark entries with [disabled] or [hidden]."),
        Line::from(""),
        Line::from("Keyboard shortcuts:"),
        Line::from("  j/k or ↓/↑  - Navigate (Shift extends)"),
        Line::from("  h/l or ←/→  - Collapse/Expand"),
        Line::from("  Space       - Toggle selection"),
        Line::from("  m           - Cycle selection mode"),
        Line::from("  q           - Quit"),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Arborist ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border))
                .style(Style::default().bg(colors.bg)),
        )
        .style(Style::default().fg(colors.text));

    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_labels_are_untouched() {
        assert_eq!(truncate("leaf", 10), "leaf");
        assert_eq!(truncate("leaf", 4), "leaf");
    }

    #[test]
    fn long_labels_end_with_an_ellipsis() {
        assert_eq!(truncate("branches", 5), "bran…");
        assert_eq!(truncate("branches", 1), "…");
        assert_eq!(truncate("branches", 0), "");
    }

    #[test]
    fn wide_characters_count_double() {
        // Each of these takes two columns.
        let label = "日本語";
        assert_eq!(truncate(label, 6), label);
        assert_eq!(truncate(label, 5), "日本…");
        assert_eq!(truncate(label, 4), "日…");
    }
}
