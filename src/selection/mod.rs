//! Selection state, strategies and synchronization.
//!
//! The selected-items list is owned by the host. This module keeps realized
//! node flags consistent with it, resolves ranges over the selectable order,
//! and runs every change through the preview/veto protocol.

mod item;
mod items;
mod preview;
mod range;
mod strategy;
mod sync;

pub use item::DataItem;
pub use items::{ChangeFeed, CollectionChange, SelectedItems, Waker};
pub use preview::{HandlerId, PreviewSelectionChange, SelectionEvents};
pub use range::{first_visible, last_visible, next_visible, previous_visible, resolve_range};
pub use strategy::{
    MultipleSelection, NoSelection, SelectionContext, SelectionMode, SelectionStrategy,
    SingleSelection,
};
pub use sync::Synchronizer;
