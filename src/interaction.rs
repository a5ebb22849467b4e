//! Input mode and focus tracking.
//!
//! Only one node in a tree may hold the tab stop, so keyboard focus enters the
//! tree once. The control itself holds it only while no node does.

use crate::tree::{NodeId, RealizedTree, TraversalFilter};

/// Which device the user is currently driving the tree with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Pointer interaction.
    #[default]
    Pointer,
    /// Keyboard interaction.
    Keyboard,
}

/// Where input focus should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// The tree control itself (empty tree).
    Control,
    /// A realized node.
    Node(NodeId),
}

/// Keys the tree reacts to. Everything else passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home.
    Home,
    /// End.
    End,
    /// Any other key.
    Other,
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Primary (usually left) button.
    Primary,
    /// Secondary (usually right) button.
    Secondary,
    /// Middle button.
    Middle,
}

/// Modifier keys held during a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Shift is held.
    pub shift: bool,
    /// Control is held.
    pub control: bool,
}

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
    };

    /// Control only.
    pub const CONTROL: Self = Self {
        shift: false,
        control: true,
    };
}

/// Tracks the input mode and which node owns the tab stop.
#[derive(Debug, Default)]
pub struct InteractionTracker {
    mode: InputMode,
    last_focused: Option<NodeId>,
}

impl InteractionTracker {
    /// Create a tracker in pointer mode with no focused node.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current input mode.
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Check if the user is driving the tree with the keyboard.
    pub fn is_keyboard_mode(&self) -> bool {
        self.mode == InputMode::Keyboard
    }

    /// A key went down or up. Returns `true` if this switched to keyboard mode.
    pub fn on_preview_key(&mut self) -> bool {
        if self.mode == InputMode::Keyboard {
            return false;
        }
        tracing::debug!("Switching to keyboard mode");
        self.mode = InputMode::Keyboard;
        true
    }

    /// A pointer button went down. Returns `true` if this switched to pointer mode.
    pub fn on_preview_pointer_down(&mut self, button: PointerButton) -> bool {
        if button != PointerButton::Primary || self.mode == InputMode::Pointer {
            return false;
        }
        tracing::debug!("Switching to pointer mode");
        self.mode = InputMode::Pointer;
        true
    }

    /// The node that last had focus, holding the tab stop.
    pub fn last_focused(&self) -> Option<NodeId> {
        self.last_focused
    }

    /// Check if the control itself holds the tab stop.
    pub fn control_has_tab_stop(&self) -> bool {
        self.last_focused.is_none()
    }

    /// Move the tab stop: revoke it from the previous holder, then grant it
    /// to `node`.
    pub fn set_last_focused<I>(&mut self, tree: &mut RealizedTree<I>, node: Option<NodeId>) {
        if let Some(previous) = self.last_focused.take() {
            if let Some(holder) = tree.get_mut(previous) {
                holder.set_tab_stop(false);
            }
        }
        self.last_focused = node.filter(|id| tree.contains(*id));
        if let Some(current) = self.last_focused {
            if let Some(holder) = tree.get_mut(current) {
                holder.set_tab_stop(true);
            }
            tracing::trace!("Tab stop moved to {}", current);
        }
    }

    /// Forget the focus holder if it was among `removed` nodes.
    pub fn forget(&mut self, removed: &[NodeId]) {
        if self.last_focused.is_some_and(|id| removed.contains(&id)) {
            tracing::trace!("Focused node unrealized, control takes the tab stop");
            self.last_focused = None;
        }
    }

    /// Where focus goes when the control itself receives it: the last
    /// focused node, else the first visible node, else the control.
    pub fn delegate_focus<I>(&self, tree: &RealizedTree<I>) -> FocusTarget {
        if let Some(id) = self.last_focused.filter(|id| tree.contains(*id)) {
            return FocusTarget::Node(id);
        }
        tree.traverse(TraversalFilter::VISIBLE)
            .next()
            .map_or(FocusTarget::Control, FocusTarget::Node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab_stops(tree: &RealizedTree<u32>) -> Vec<u32> {
        tree.traverse(TraversalFilter::ALL)
            .filter_map(|id| tree.get(id))
            .filter(|node| node.has_tab_stop())
            .map(|node| *node.item())
            .collect()
    }

    #[test]
    fn keys_and_primary_pointer_switch_modes() {
        let mut tracker = InteractionTracker::new();
        assert_eq!(tracker.mode(), InputMode::Pointer);
        assert!(!tracker.on_preview_pointer_down(PointerButton::Primary));

        assert!(tracker.on_preview_key());
        assert!(!tracker.on_preview_key());
        assert!(tracker.is_keyboard_mode());

        assert!(!tracker.on_preview_pointer_down(PointerButton::Secondary));
        assert!(tracker.is_keyboard_mode());
        assert!(tracker.on_preview_pointer_down(PointerButton::Primary));
        assert!(!tracker.is_keyboard_mode());
    }

    #[test]
    fn only_one_node_holds_the_tab_stop() {
        let mut tree = RealizedTree::new();
        let a = tree.realize_last(None, 1).unwrap();
        let b = tree.realize_last(None, 2).unwrap();
        let mut tracker = InteractionTracker::new();
        assert!(tracker.control_has_tab_stop());

        tracker.set_last_focused(&mut tree, Some(a));
        assert_eq!(tab_stops(&tree), vec![1]);
        tracker.set_last_focused(&mut tree, Some(b));
        assert_eq!(tab_stops(&tree), vec![2]);
        assert!(!tracker.control_has_tab_stop());

        tracker.set_last_focused(&mut tree, None);
        assert!(tab_stops(&tree).is_empty());
        assert!(tracker.control_has_tab_stop());
    }

    #[test]
    fn focus_delegates_to_last_focused_then_first_visible() {
        let mut tree = RealizedTree::new();
        let mut tracker = InteractionTracker::new();
        assert_eq!(tracker.delegate_focus(&tree), FocusTarget::Control);

        let hidden = tree.realize_last(None, 1).unwrap();
        tree.node_mut(hidden).unwrap().set_visible(false);
        let shown = tree.realize_last(None, 2).unwrap();
        let other = tree.realize_last(None, 3).unwrap();
        assert_eq!(tracker.delegate_focus(&tree), FocusTarget::Node(shown));

        tracker.set_last_focused(&mut tree, Some(other));
        assert_eq!(tracker.delegate_focus(&tree), FocusTarget::Node(other));

        let removed = tree.unrealize(other).unwrap();
        tracker.forget(&removed);
        assert!(tracker.control_has_tab_stop());
        assert_eq!(tracker.delegate_focus(&tree), FocusTarget::Node(shown));
    }
}
