//! Tree view configuration.

use crate::selection::SelectionMode;

/// Selection and presentation options for a tree view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Which selection algorithm to use.
    pub selection_mode: SelectionMode,
    /// Highlight the row under the pointer.
    pub hover_highlighting: bool,
    /// Draw vertical guide lines between nesting levels.
    pub vertical_rulers: bool,
}

impl TreeConfig {
    /// Use the given selection mode.
    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    /// Turn vertical rulers on or off.
    pub fn with_vertical_rulers(mut self, enabled: bool) -> Self {
        self.vertical_rulers = enabled;
        self
    }

    /// Turn hover highlighting on or off.
    pub fn with_hover_highlighting(mut self, enabled: bool) -> Self {
        self.hover_highlighting = enabled;
        self
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::Multiple,
            hover_highlighting: true,
            vertical_rulers: false,
        }
    }
}
