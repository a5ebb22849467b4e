//! Data item identity.

use std::fmt::Debug;
use std::rc::Rc;
use std::sync::Arc;

/// An application-owned value that a tree node represents.
///
/// Items are compared by `PartialEq` and never mutated by the tree. The trait
/// is implemented explicitly rather than for every comparable type, so a
/// [`NodeId`](crate::tree::NodeId) can never end up in a selected-items list.
/// Items are owned, `'static` values.
pub trait DataItem: Clone + PartialEq + Debug + 'static {}

macro_rules! data_item {
    ($($ty:ty),* $(,)?) => {
        $(impl DataItem for $ty {})*
    };
}

data_item!(
    String,
    &'static str,
    Rc<str>,
    Arc<str>,
    char,
    u16,
    u32,
    u64,
    usize,
    i32,
    i64,
    std::path::PathBuf,
);
