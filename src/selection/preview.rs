//! Selection change events.
//!
//! Handlers can veto a pending change through [`PreviewSelectionChange`].
//! Every handler sees the event, and the change is cancelled if any of them
//! cancelled it. Once a batch of changes has been applied, the
//! selection-changed handlers run exactly once.

use std::fmt;

/// Handle returned when registering an event handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// A proposed selection change for one data item.
#[derive(Debug)]
pub struct PreviewSelectionChange<'a, I> {
    selecting: bool,
    item: &'a I,
    cancel_any: bool,
}

impl<'a, I> PreviewSelectionChange<'a, I> {
    /// Create a preview for selecting (`true`) or deselecting `item`.
    pub fn new(selecting: bool, item: &'a I) -> Self {
        Self {
            selecting,
            item,
            cancel_any: false,
        }
    }

    /// `true` if the item would become selected, `false` if deselected.
    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// The affected data item.
    pub fn item(&self) -> &I {
        self.item
    }

    /// Veto the change. A veto cannot be withdrawn by a later handler.
    pub fn cancel(&mut self) {
        self.cancel_any = true;
    }

    /// Check if any handler vetoed the change.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_any
    }
}

type PreviewHandler<I> = Box<dyn FnMut(&mut PreviewSelectionChange<'_, I>)>;
type ChangedHandler = Box<dyn FnMut()>;

/// Registry for preview and selection-changed handlers.
pub struct SelectionEvents<I> {
    next_id: u64,
    preview: Vec<(HandlerId, PreviewHandler<I>)>,
    changed: Vec<(HandlerId, ChangedHandler)>,
}

impl<I> SelectionEvents<I> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            preview: Vec::new(),
            changed: Vec::new(),
        }
    }

    /// Register a handler for proposed changes.
    pub fn on_preview<F>(&mut self, handler: F) -> HandlerId
    where
        F: FnMut(&mut PreviewSelectionChange<'_, I>) + 'static,
    {
        let id = self.allocate();
        self.preview.push((id, Box::new(handler)));
        id
    }

    /// Register a handler for applied changes.
    pub fn on_changed<F>(&mut self, handler: F) -> HandlerId
    where
        F: FnMut() + 'static,
    {
        let id = self.allocate();
        self.changed.push((id, Box::new(handler)));
        id
    }

    /// Unregister a handler. Returns whether it was registered.
    pub fn remove(&mut self, id: HandlerId) -> bool {
        let before = self.preview.len() + self.changed.len();
        self.preview.retain(|(handler, _)| *handler != id);
        self.changed.retain(|(handler, _)| *handler != id);
        before != self.preview.len() + self.changed.len()
    }

    /// Raise the preview for one change. Returns `true` if no handler vetoed it.
    pub fn preview(&mut self, selecting: bool, item: &I) -> bool {
        let mut event = PreviewSelectionChange::new(selecting, item);
        for (_, handler) in &mut self.preview {
            handler(&mut event);
        }
        !event.is_cancelled()
    }

    /// Raise previews for a whole gesture, in order, stopping at the first veto.
    /// Returns `true` if every change was allowed.
    pub fn preview_all<'a>(&mut self, changes: impl IntoIterator<Item = (bool, &'a I)>) -> bool
    where
        I: 'a,
    {
        changes
            .into_iter()
            .all(|(selecting, item)| self.preview(selecting, item))
    }

    /// Run the selection-changed handlers.
    pub fn raise_changed(&mut self) {
        for (_, handler) in &mut self.changed {
            handler();
        }
    }

    fn allocate(&mut self) -> HandlerId {
        self.next_id += 1;
        HandlerId(self.next_id)
    }
}

impl<I> Default for SelectionEvents<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> fmt::Debug for SelectionEvents<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionEvents")
            .field("preview_handlers", &self.preview.len())
            .field("changed_handlers", &self.changed.len())
            .finish()
    }
}
