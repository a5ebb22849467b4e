//! Application state and logic.

use std::path::PathBuf;

use crate::clipboard;
use crate::config::TreeConfig;
use crate::error::{ArboristError, Result};
use crate::interaction::{FocusTarget, Key, Modifiers, PointerButton};
use crate::outline::{Outline, OutlineNode, OutlineReader};
use crate::tree::{NodeId, TraversalFilter};
use crate::view::TreeView;

/// Application theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Gruvbox dark theme.
    GruvboxDark,
    /// Gruvbox light theme.
    GruvboxLight,
}

impl Theme {
    /// Get the next theme in the cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::GruvboxDark => Theme::GruvboxLight,
            Theme::GruvboxLight => Theme::GruvboxDark,
        }
    }

    /// Get the theme name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::GruvboxDark => "Gruvbox Dark",
            Theme::GruvboxLight => "Gruvbox Light",
        }
    }
}

/// Screen area of the tree rows, recorded on every draw for hit testing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowArea {
    /// Left column.
    pub x: u16,
    /// Top row.
    pub y: u16,
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl RowArea {
    fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x
            && column < self.x.saturating_add(self.width)
            && row >= self.y
            && row < self.y.saturating_add(self.height)
    }
}

/// What a pointer position lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowHit {
    /// A rendered node row.
    Node(NodeId),
    /// Inside the tree panel, below the last row.
    Empty,
    /// Outside the tree panel.
    Outside,
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Loaded outline.
    pub outline: Option<Outline>,
    /// The tree control.
    pub view: TreeView<String>,
    /// Status message.
    pub status: String,
    /// Current theme.
    pub theme: Theme,
    /// Error message.
    pub error_message: Option<String>,
    /// Index of the first rendered row.
    pub scroll_offset: usize,
    /// Where the rows were last drawn.
    pub row_area: RowArea,
    /// Row index under the pointer.
    pub hover: Option<usize>,
    /// Row index a drag started on.
    drag_anchor: Option<usize>,
}

impl App {
    /// Create an application with nothing loaded.
    pub fn new(config: TreeConfig) -> Self {
        Self {
            outline: None,
            view: TreeView::new(config),
            status: "Ready".to_string(),
            theme: Theme::GruvboxDark,
            error_message: None,
            scroll_offset: 0,
            row_area: RowArea::default(),
            hover: None,
            drag_anchor: None,
        }
    }

    /// Load an outline file.
    pub fn load_file(&mut self, path: PathBuf) {
        match OutlineReader::read_file(&path) {
            Ok(outline) => {
                let title = outline.title().unwrap_or_else(|| "outline".to_string());
                match self.load_outline(outline) {
                    Ok(()) => {
                        self.status = format!("{} loaded", title);
                        self.error_message = None;
                        tracing::info!("Outline loaded");
                    },
                    Err(e) => self.fail("Error showing outline", e),
                }
            },
            Err(e) => self.fail("Error loading file", e),
        }
    }

    /// Show an outline, realizing its top-level entries. The selection is
    /// kept and re-derived for the new nodes.
    pub fn load_outline(&mut self, outline: Outline) -> Result<()> {
        let config = self.view.config().clone();
        let items = self.view.selected_items();
        self.view = TreeView::with_selected_items(config, items);
        for root in &outline.roots {
            Self::realize_entry(&mut self.view, None, root)?;
        }
        self.outline = Some(outline);
        self.scroll_offset = 0;
        self.view.on_got_focus();
        Ok(())
    }

    fn realize_entry(
        view: &mut TreeView<String>,
        parent: Option<NodeId>,
        entry: &OutlineNode,
    ) -> Result<NodeId> {
        let id = view.realize_last(parent, entry.path.clone())?;
        let mut node = view.node_mut(id)?;
        node.set_enabled(entry.enabled);
        node.set_visible(entry.visible);
        Ok(id)
    }

    fn fail(&mut self, status: &str, error: ArboristError) {
        self.error_message = Some(error.to_string());
        self.status = status.to_string();
        tracing::error!("{}: {}", status, error);
    }

    /// Report a failed gesture in the status bar.
    fn report<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("{}", e);
                self.status = format!("Error: {}", e);
                None
            },
        }
    }

    /// The outline entry behind a realized node.
    pub fn entry(&self, id: NodeId) -> Option<&OutlineNode> {
        let path = self.view.node(id).ok()?.item().clone();
        self.outline.as_ref()?.find(&path)
    }

    /// Find the realized node for an item path.
    pub fn node_for(&self, path: &str) -> Option<NodeId> {
        self.view.nodes().find(&path.to_string())
    }

    /// Rendered rows in display order.
    pub fn rows(&self) -> Vec<NodeId> {
        self.view.traverse(TraversalFilter::VISIBLE)
    }

    /// The focused node, if a node has focus.
    pub fn focused_node(&self) -> Option<NodeId> {
        match self.view.focused() {
            Some(FocusTarget::Node(id)) => Some(id),
            _ => None,
        }
    }

    // ---- expand / collapse ----

    /// Expand a node, realizing its children.
    pub fn expand(&mut self, id: NodeId) -> Result<bool> {
        if self.view.node(id)?.is_expanded() {
            return Ok(false);
        }
        let Some(entry) = self.entry(id).cloned() else {
            return Ok(false);
        };
        if !entry.has_children() {
            return Ok(false);
        }
        self.view.node_mut(id)?.set_expanded(true);
        for child in &entry.children {
            Self::realize_entry(&mut self.view, Some(id), child)?;
        }
        tracing::debug!("Expanded {} ({} children)", entry.path, entry.children.len());
        Ok(true)
    }

    /// Collapse a node, unrealizing its children.
    pub fn collapse(&mut self, id: NodeId) -> Result<bool> {
        if !self.view.node(id)?.is_expanded() {
            return Ok(false);
        }
        self.view.unrealize_children(id)?;
        self.view.node_mut(id)?.set_expanded(false);
        Ok(true)
    }

    /// Expand every entry of the outline.
    pub fn expand_all(&mut self) -> Result<()> {
        let mut pending: Vec<NodeId> = self.view.nodes().children_of(None).to_vec();
        while let Some(id) = pending.pop() {
            self.expand(id)?;
            pending.extend_from_slice(self.view.nodes().children_of(Some(id)));
        }
        Ok(())
    }

    /// Expand the focused node.
    pub fn expand_focused(&mut self) {
        if let Some(id) = self.focused_node() {
            let result = self.expand(id);
            self.report(result);
        }
    }

    /// Collapse the focused node, or move focus to its parent when it is
    /// already collapsed.
    pub fn collapse_focused(&mut self) {
        let Some(id) = self.focused_node() else {
            return;
        };
        let collapsed = self.collapse(id);
        if let Some(false) = self.report(collapsed) {
            let parent = self.view.node(id).ok().and_then(|node| node.parent());
            if let Some(parent) = parent {
                let result = self.view.focus_node(parent);
                self.report(result);
            }
        }
    }

    // ---- keyboard ----

    /// Move focus with the keyboard, selecting on the way.
    pub fn navigate(&mut self, key: Key, modifiers: Modifiers) {
        let result = self.view.navigate(key, modifiers);
        self.report(result);
        self.update_status();
    }

    /// Toggle the focused node's selection.
    pub fn toggle_focused(&mut self) {
        if let Some(id) = self.focused_node() {
            let result = self.view.toggle(id);
            self.report_gesture(result);
        }
    }

    /// Select only the focused node.
    pub fn select_focused(&mut self) {
        if let Some(id) = self.focused_node() {
            let result = self.view.select(id);
            self.report_gesture(result);
        }
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        if self.view.clear_selection() {
            self.status = "Selection cleared".to_string();
        } else {
            self.status = "Clearing the selection was vetoed".to_string();
        }
    }

    /// Switch to the next selection mode.
    pub fn cycle_selection_mode(&mut self) {
        let mode = self.view.selection_mode().next();
        self.view.set_selection_mode(mode);
        self.status = format!("Selection mode: {}", mode);
    }

    /// Cycle to the next theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.status = format!("Theme: {}", self.theme.name());
    }

    /// Copy the selected items to the clipboard.
    pub fn copy_selection(&mut self) {
        let items = self.view.selected_items().to_vec();
        if items.is_empty() {
            self.status = "Nothing selected".to_string();
            return;
        }
        match clipboard::copy_selection(&items) {
            Ok(()) => self.status = format!("Copied {} item(s)", items.len()),
            Err(e) => self.status = format!("Copy failed: {}", e),
        }
    }

    fn report_gesture(&mut self, result: Result<bool>) {
        match self.report(result) {
            Some(true) => self.update_status(),
            Some(false) => self.status = "Selection unchanged".to_string(),
            None => {},
        }
    }

    /// Describe the selection in the status bar.
    pub fn update_status(&mut self) {
        let count = self.view.selected_items().len();
        self.status = match self.view.last_selected_item() {
            Some(last) => format!("{} selected, last: {}", count, last),
            None => format!("{} selected", count),
        };
    }

    // ---- pointer ----

    /// Resolve a screen position against the rows drawn last.
    pub fn hit_test(&self, column: u16, row: u16) -> RowHit {
        if !self.row_area.contains(column, row) {
            return RowHit::Outside;
        }
        let index = self.scroll_offset + usize::from(row - self.row_area.y);
        match self.rows().get(index) {
            Some(id) => RowHit::Node(*id),
            None => RowHit::Empty,
        }
    }

    fn row_index(&self, column: u16, row: u16) -> Option<usize> {
        match self.hit_test(column, row) {
            RowHit::Node(id) => self.rows().iter().position(|entry| *entry == id),
            _ => None,
        }
    }

    /// A pointer button went down.
    pub fn mouse_down(
        &mut self,
        button: PointerButton,
        column: u16,
        row: u16,
        modifiers: Modifiers,
    ) {
        self.drag_anchor = None;
        match self.hit_test(column, row) {
            RowHit::Node(id) if button == PointerButton::Primary => {
                let result = self.view.click(id, modifiers);
                self.report_gesture(result);
                if modifiers == Modifiers::NONE {
                    self.drag_anchor = self.row_index(column, row);
                }
            },
            RowHit::Node(_) => self.view.on_preview_pointer_down(button),
            RowHit::Empty => {
                self.view.on_pointer_down_empty(button);
            },
            RowHit::Outside => self.view.on_preview_pointer_down(button),
        }
    }

    /// The pointer moved with the primary button held.
    pub fn mouse_drag(&mut self, column: u16, row: u16) {
        let Some(anchor) = self.drag_anchor else {
            return;
        };
        let Some(current) = self.row_index(column, row) else {
            return;
        };
        let (low, high) = if anchor <= current {
            (anchor, current)
        } else {
            (current, anchor)
        };
        let rows = self.rows();
        let Some(covered) = rows.get(low..=high) else {
            return;
        };
        let result = self.view.select_by_rectangle(|id, _| covered.contains(&id));
        self.report_gesture(result);
    }

    /// The primary button went up.
    pub fn mouse_up(&mut self) {
        self.drag_anchor = None;
    }

    /// The pointer moved without a button held.
    pub fn mouse_moved(&mut self, column: u16, row: u16) {
        self.hover = if self.view.config().hover_highlighting {
            self.row_index(column, row)
        } else {
            None
        };
    }

    /// Scroll so the focused row stays within `viewport_height` rows.
    pub fn adjust_scroll(&mut self, viewport_height: usize) {
        let Some(focused) = self.focused_node() else {
            return;
        };
        let Some(index) = self.rows().iter().position(|id| *id == focused) else {
            return;
        };
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if viewport_height > 0 && index >= self.scroll_offset + viewport_height {
            self.scroll_offset = index + 1 - viewport_height;
        }
    }

    /// Plain-text rendering of the visible rows with selection markers,
    /// followed by the selected items and the last selected item.
    pub fn listing(&self) -> String {
        let mut text = String::new();
        let nodes = self.view.nodes();
        for id in self.rows() {
            let Some(node) = nodes.get(id) else {
                continue;
            };
            let marker = if node.is_selected() { "[x]" } else { "[ ]" };
            let name = self
                .entry(id)
                .map_or_else(|| node.item().clone(), |entry| entry.name.clone());
            let suffix = if node.is_enabled() { "" } else { " (disabled)" };
            text.push_str(&format!(
                "{}{} {}{}\n",
                "  ".repeat(nodes.depth(id)),
                marker,
                name,
                suffix
            ));
        }

        let selected = self.view.selected_items().to_vec();
        text.push_str(&format!("selected: {}\n", selected.join(", ")));
        let last = self
            .view
            .last_selected_item()
            .unwrap_or_else(|| "(none)".to_string());
        text.push_str(&format!("last selected: {}\n", last));
        text
    }
}
