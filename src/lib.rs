//! Arborist - selection and navigation for hierarchical, virtualized tree views.
//!
//! Arborist keeps the selection of a tree control consistent with a host-owned
//! list of selected data items while only part of the tree is realized as
//! nodes. Nodes come and go as the host expands and collapses branches; the
//! list stays the source of truth.
//!
//! # Features
//!
//! - Single, multiple and no-selection modes behind one strategy trait
//! - Range and rectangle selection over the visible, enabled nodes
//! - Cancellable previews: any handler can veto a change, and multi-item
//!   changes apply all-or-nothing
//! - Two-way sync with an observable selected-items list
//! - Keyboard/pointer input mode tracking and single tab stop focus handling
//! - A terminal host that browses indented outline files
//!
//! # Example
//!
//! ```
//! use arborist::{SelectedItems, TreeConfig, TreeView};
//!
//! let items = SelectedItems::new();
//! let mut view = TreeView::with_selected_items(TreeConfig::default(), items.clone());
//! let first = view.realize_last(None, "first").unwrap();
//! let second = view.realize_last(None, "second").unwrap();
//!
//! view.select(first).unwrap();
//! view.select_range(second).unwrap();
//! assert_eq!(items.to_vec(), vec!["first", "second"]);
//!
//! items.clear();
//! assert!(!view.node(first).unwrap().is_selected());
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod app;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod interaction;
pub mod outline;
pub mod selection;
pub mod tree;
pub mod ui;
pub mod view;

pub use config::TreeConfig;
pub use error::{ArboristError, Result};
pub use interaction::{FocusTarget, InputMode, Key, Modifiers, PointerButton};
pub use selection::{DataItem, PreviewSelectionChange, SelectedItems, SelectionMode};
pub use tree::{Node, NodeId, TraversalFilter};
pub use view::TreeView;
