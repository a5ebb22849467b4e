//! Range resolution and neighbour lookup over the selectable order.

use crate::error::{ArboristError, RangeEndpoint, Result};
use crate::tree::{NodeId, RealizedTree, TraversalFilter};

/// Nodes from `first` to `last`, inclusive, in walk order.
///
/// The walk runs over the visible, enabled nodes and goes backwards when
/// `last` comes before `first`. Nodes that are not visible are left out. When
/// `first == last` the result is that single node, whatever its state.
///
/// Fails with `RangeEndpointNotFound` if either end is not in the selectable
/// order: a stale or hidden endpoint means the caller's anchor is out of date.
pub fn resolve_range<I>(
    tree: &RealizedTree<I>,
    first: NodeId,
    last: NodeId,
) -> Result<Vec<NodeId>> {
    if first == last {
        return Ok(vec![first]);
    }

    let order: Vec<NodeId> = tree.traverse(TraversalFilter::SELECTABLE).collect();
    let first_index = position(&order, first, RangeEndpoint::First)?;
    let last_index = position(&order, last, RangeEndpoint::Last)?;

    let visible = |id: &&NodeId| is_visible(tree, **id);
    let range: Vec<NodeId> = if first_index <= last_index {
        order[first_index..=last_index]
            .iter()
            .filter(visible)
            .copied()
            .collect()
    } else {
        order[last_index..=first_index]
            .iter()
            .rev()
            .filter(visible)
            .copied()
            .collect()
    };
    Ok(range)
}

fn position(order: &[NodeId], node: NodeId, endpoint: RangeEndpoint) -> Result<usize> {
    order.iter().position(|id| *id == node).ok_or_else(|| {
        tracing::warn!("Range {} node {} not found in selectable order", endpoint, node);
        ArboristError::endpoint_not_found(node, endpoint)
    })
}

/// The first visible node after `current` in `order`. With no current node,
/// the first visible node.
pub fn next_visible<I>(
    tree: &RealizedTree<I>,
    current: Option<NodeId>,
    order: &[NodeId],
) -> Option<NodeId> {
    let start = match current {
        Some(id) => order.iter().position(|entry| *entry == id)? + 1,
        None => 0,
    };
    order[start..]
        .iter()
        .copied()
        .find(|id| is_visible(tree, *id))
}

/// The first visible node before `current` in `order`. With no current node,
/// there is nothing before it.
pub fn previous_visible<I>(
    tree: &RealizedTree<I>,
    current: Option<NodeId>,
    order: &[NodeId],
) -> Option<NodeId> {
    let end = order.iter().position(|entry| Some(*entry) == current)?;
    order[..end]
        .iter()
        .rev()
        .copied()
        .find(|id| is_visible(tree, *id))
}

/// The first visible node in `order`.
pub fn first_visible<I>(tree: &RealizedTree<I>, order: &[NodeId]) -> Option<NodeId> {
    order.iter().copied().find(|id| is_visible(tree, *id))
}

/// The last visible node in `order`.
pub fn last_visible<I>(tree: &RealizedTree<I>, order: &[NodeId]) -> Option<NodeId> {
    order.iter().rev().copied().find(|id| is_visible(tree, *id))
}

fn is_visible<I>(tree: &RealizedTree<I>, id: NodeId) -> bool {
    tree.get(id).is_some_and(|node| node.is_visible())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `count` top-level nodes whose items are their positions.
    fn flat(count: usize) -> (RealizedTree<usize>, Vec<NodeId>) {
        let mut tree = RealizedTree::new();
        let ids = (0..count)
            .map(|n| tree.realize_last(None, n).unwrap())
            .collect();
        (tree, ids)
    }

    fn items(tree: &RealizedTree<usize>, ids: &[NodeId]) -> Vec<usize> {
        ids.iter().map(|id| *tree.get(*id).unwrap().item()).collect()
    }

    #[test]
    fn single_node_range_ignores_visibility() {
        let (mut tree, ids) = flat(3);
        tree.node_mut(ids[1]).unwrap().set_visible(false);
        assert_eq!(resolve_range(&tree, ids[1], ids[1]).unwrap(), vec![ids[1]]);
    }

    #[test]
    fn range_skips_invisible_members() {
        let (mut tree, ids) = flat(6);
        tree.node_mut(ids[4]).unwrap().set_visible(false);
        let range = resolve_range(&tree, ids[2], ids[5]).unwrap();
        assert_eq!(items(&tree, &range), vec![2, 3, 5]);
    }

    #[test]
    fn reversed_endpoints_reverse_the_range() {
        let (tree, ids) = flat(6);
        let forward = resolve_range(&tree, ids[1], ids[4]).unwrap();
        let mut backward = resolve_range(&tree, ids[4], ids[1]).unwrap();
        backward.reverse();
        assert_eq!(forward, backward);
        assert_eq!(items(&tree, &forward), vec![1, 2, 3, 4]);
    }

    #[test]
    fn disabled_members_are_left_out() {
        let (mut tree, ids) = flat(4);
        tree.node_mut(ids[2]).unwrap().set_enabled(false);
        let range = resolve_range(&tree, ids[0], ids[3]).unwrap();
        assert_eq!(items(&tree, &range), vec![0, 1, 3]);
    }

    #[test]
    fn missing_endpoint_is_reported() {
        let (mut tree, ids) = flat(3);
        tree.node_mut(ids[2]).unwrap().set_enabled(false);
        let err = resolve_range(&tree, ids[0], ids[2]).unwrap_err();
        assert!(matches!(
            err,
            ArboristError::RangeEndpointNotFound {
                endpoint: RangeEndpoint::Last,
                ..
            }
        ));

        let stale = ids[1];
        tree.unrealize(stale).unwrap();
        let err = resolve_range(&tree, stale, ids[0]).unwrap_err();
        assert!(matches!(
            err,
            ArboristError::RangeEndpointNotFound {
                endpoint: RangeEndpoint::First,
                ..
            }
        ));
    }

    #[test]
    fn neighbours_skip_invisible_nodes() {
        let (mut tree, ids) = flat(4);
        let order = ids.clone();
        tree.node_mut(ids[1]).unwrap().set_visible(false);

        assert_eq!(next_visible(&tree, Some(ids[0]), &order), Some(ids[2]));
        assert_eq!(previous_visible(&tree, Some(ids[2]), &order), Some(ids[0]));
        assert_eq!(next_visible(&tree, None, &order), Some(ids[0]));
        assert_eq!(previous_visible(&tree, None, &order), None);
        assert_eq!(next_visible(&tree, Some(ids[3]), &order), None);

        tree.node_mut(ids[3]).unwrap().set_visible(false);
        assert_eq!(first_visible(&tree, &order), Some(ids[0]));
        assert_eq!(last_visible(&tree, &order), Some(ids[2]));
    }
}
