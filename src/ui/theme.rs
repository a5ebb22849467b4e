//! Color themes for the UI.

use crate::app::Theme;
use ratatui::style::Color;

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Background color.
    pub bg: Color,
    /// Primary text color.
    pub text: Color,
    /// Heading text color.
    pub heading: Color,
    /// Disabled entry text color.
    pub disabled: Color,
    /// Vertical ruler color.
    pub ruler: Color,
    /// Border color.
    pub border: Color,
    /// Focused row foreground color.
    pub cursor_fg: Color,
    /// Focused row background color.
    pub cursor_bg: Color,
    /// Selected row foreground color.
    pub selection_fg: Color,
    /// Selected row background color.
    pub selection_bg: Color,
    /// Background of the row under the pointer.
    pub hover_bg: Color,
    /// Status bar foreground color.
    pub status_fg: Color,
    /// Status bar background color.
    pub status_bg: Color,
    /// Error color.
    pub error: Color,
}

impl ThemeColors {
    /// Create color palette from theme.
    pub fn from_theme(theme: &Theme) -> Self {
        match theme {
            Theme::GruvboxDark => Self {
                bg: Color::Rgb(40, 40, 40),
                text: Color::Rgb(235, 219, 178),
                heading: Color::Rgb(251, 184, 108),
                disabled: Color::Rgb(146, 131, 116),
                ruler: Color::Rgb(80, 73, 69),
                border: Color::Rgb(102, 92, 84),
                cursor_fg: Color::Rgb(40, 40, 40),
                cursor_bg: Color::Rgb(251, 184, 108),
                selection_fg: Color::Rgb(235, 219, 178),
                selection_bg: Color::Rgb(69, 133, 136),
                hover_bg: Color::Rgb(60, 56, 54),
                status_fg: Color::Rgb(235, 219, 178),
                status_bg: Color::Rgb(60, 56, 54),
                error: Color::Rgb(251, 73, 52),
            },
            Theme::GruvboxLight => Self {
                bg: Color::Rgb(251, 245, 234),
                text: Color::Rgb(60, 56, 54),
                heading: Color::Rgb(175, 58, 3),
                disabled: Color::Rgb(146, 131, 116),
                ruler: Color::Rgb(213, 196, 161),
                border: Color::Rgb(213, 196, 161),
                cursor_fg: Color::Rgb(251, 245, 234),
                cursor_bg: Color::Rgb(175, 58, 3),
                selection_fg: Color::Rgb(251, 245, 234),
                selection_bg: Color::Rgb(7, 102, 120),
                hover_bg: Color::Rgb(235, 219, 178),
                status_fg: Color::Rgb(60, 56, 54),
                status_bg: Color::Rgb(235, 219, 178),
                error: Color::Rgb(157, 0, 6),
            },
        }
    }
}
