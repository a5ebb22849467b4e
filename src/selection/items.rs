//! The externally owned list of selected data items.
//!
//! [`SelectedItems`] is a cheap, cloneable handle: the host keeps one clone and
//! the tree keeps another. Every mutation is queued on the subscribed
//! [`ChangeFeed`]s, and each feed's waker runs once the list is released so
//! the subscriber can apply the change right away.

use super::item::DataItem;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

/// A single change notification from a [`SelectedItems`] list.
///
/// The set of actions is closed: add, remove and reset are the only changes
/// the list ever reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionChange<I> {
    /// Items were appended, in order.
    Added(Vec<I>),
    /// Items were removed.
    Removed(Vec<I>),
    /// The list was cleared.
    Reset,
}

/// Callback run after a change was queued on a feed.
pub type Waker = Rc<dyn Fn()>;

struct FeedState<I> {
    queue: RefCell<VecDeque<CollectionChange<I>>>,
    waker: RefCell<Option<Waker>>,
}

struct ListState<I> {
    items: Vec<I>,
    observable: bool,
    feeds: Vec<Weak<FeedState<I>>>,
}

/// Shared handle to an ordered list of selected data items.
pub struct SelectedItems<I> {
    state: Rc<RefCell<ListState<I>>>,
}

/// Subscription to a [`SelectedItems`] list. Dropping it unsubscribes.
pub struct ChangeFeed<I> {
    state: Rc<FeedState<I>>,
}

impl<I: DataItem> SelectedItems<I> {
    /// Create an empty list that reports its changes.
    pub fn new() -> Self {
        Self::from_items(Vec::new())
    }

    /// Create a list with initial contents that reports its changes.
    pub fn from_items(items: Vec<I>) -> Self {
        Self::with_state(items, true)
    }

    /// Create a list that never reports its changes.
    ///
    /// A tree bound to such a list still updates it, but cannot see mutations
    /// the host makes behind its back.
    pub fn without_notifications(items: Vec<I>) -> Self {
        Self::with_state(items, false)
    }

    fn with_state(items: Vec<I>, observable: bool) -> Self {
        Self {
            state: Rc::new(RefCell::new(ListState {
                items,
                observable,
                feeds: Vec::new(),
            })),
        }
    }

    /// Check if this list reports changes to subscribers.
    pub fn is_observable(&self) -> bool {
        self.state.borrow().observable
    }

    /// Subscribe to changes. Returns `None` for a list without notifications.
    pub fn subscribe(&self) -> Option<ChangeFeed<I>> {
        let mut state = self.state.borrow_mut();
        if !state.observable {
            return None;
        }
        let feed = Rc::new(FeedState {
            queue: RefCell::new(VecDeque::new()),
            waker: RefCell::new(None),
        });
        state.feeds.push(Rc::downgrade(&feed));
        Some(ChangeFeed { state: feed })
    }

    /// Check if two handles refer to the same list.
    pub fn same_list(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.state.borrow().items.is_empty()
    }

    /// Check if `item` is in the list.
    pub fn contains(&self, item: &I) -> bool {
        self.state.borrow().items.contains(item)
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<I> {
        self.state.borrow().items.get(index).cloned()
    }

    /// The tail entry.
    pub fn last(&self) -> Option<I> {
        self.state.borrow().items.last().cloned()
    }

    /// Copy of the current entries, in order.
    pub fn to_vec(&self) -> Vec<I> {
        self.state.borrow().items.clone()
    }

    /// Append an item.
    pub fn push(&self, item: I) {
        self.extend(vec![item]);
    }

    /// Append several items as one change.
    pub fn extend(&self, items: Vec<I>) {
        if items.is_empty() {
            return;
        }
        self.state.borrow_mut().items.extend(items.iter().cloned());
        self.notify(CollectionChange::Added(items));
    }

    /// Remove the first occurrence of `item`. Returns whether it was present.
    pub fn remove(&self, item: &I) -> bool {
        self.remove_items(std::slice::from_ref(item)).is_some()
    }

    /// Remove every entry. An empty list reports nothing.
    pub fn clear(&self) {
        self.reset();
    }

    /// Append only the items not already present, as one change.
    pub(crate) fn add_items(&self, items: Vec<I>) -> Option<CollectionChange<I>> {
        let added: Vec<I> = {
            let mut state = self.state.borrow_mut();
            let mut added = Vec::new();
            for item in items {
                if !state.items.contains(&item) {
                    state.items.push(item.clone());
                    added.push(item);
                }
            }
            added
        };
        if added.is_empty() {
            return None;
        }
        let change = CollectionChange::Added(added);
        self.notify(change.clone());
        Some(change)
    }

    /// Remove the first occurrence of each item, as one change.
    pub(crate) fn remove_items(&self, items: &[I]) -> Option<CollectionChange<I>> {
        let removed: Vec<I> = {
            let mut state = self.state.borrow_mut();
            let mut removed = Vec::new();
            for item in items {
                if let Some(index) = state.items.iter().position(|entry| entry == item) {
                    removed.push(state.items.remove(index));
                }
            }
            removed
        };
        if removed.is_empty() {
            return None;
        }
        let change = CollectionChange::Removed(removed);
        self.notify(change.clone());
        Some(change)
    }

    /// Clear the list.
    pub(crate) fn reset(&self) -> Option<CollectionChange<I>> {
        {
            let mut state = self.state.borrow_mut();
            if state.items.is_empty() {
                return None;
            }
            state.items.clear();
        }
        self.notify(CollectionChange::Reset);
        Some(CollectionChange::Reset)
    }

    fn notify(&self, change: CollectionChange<I>) {
        let mut wakers: Vec<Waker> = Vec::new();
        {
            let mut state = self.state.borrow_mut();
            if !state.observable {
                return;
            }
            state.feeds.retain(|feed| match feed.upgrade() {
                Some(feed) => {
                    feed.queue.borrow_mut().push_back(change.clone());
                    if let Some(waker) = feed.waker.borrow().as_ref() {
                        wakers.push(Rc::clone(waker));
                    }
                    true
                },
                None => false,
            });
        }
        // Wakers may read or edit the list again.
        for wake in wakers {
            wake();
        }
    }
}

impl<I> ChangeFeed<I> {
    /// Take every pending change, oldest first.
    pub fn take(&self) -> Vec<CollectionChange<I>> {
        self.state.queue.borrow_mut().drain(..).collect()
    }

    /// Check if changes are waiting.
    pub fn has_pending(&self) -> bool {
        !self.state.queue.borrow().is_empty()
    }

    /// Run `waker` after every change queued on this feed. The list is not
    /// borrowed while it runs, and the change is already queued.
    pub fn set_waker(&self, waker: Waker) {
        *self.state.waker.borrow_mut() = Some(waker);
    }
}

impl<I> Clone for SelectedItems<I> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<I: DataItem> Default for SelectedItems<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: fmt::Debug> fmt::Debug for SelectedItems<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.try_borrow() {
            Ok(state) => f
                .debug_struct("SelectedItems")
                .field("items", &state.items)
                .field("observable", &state.observable)
                .finish(),
            Err(_) => f.write_str("SelectedItems { <borrowed> }"),
        }
    }
}

impl<I> fmt::Debug for ChangeFeed<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("pending", &self.state.queue.borrow().len())
            .field("woken", &self.state.waker.borrow().is_some())
            .finish()
    }
}
