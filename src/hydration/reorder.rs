//! Reordering claimed children with as few moves as possible.
//!
//! Nodes that are not moved by a reordering always form an increasing
//! subsequence of claim orders, since they keep their relative order. The
//! largest set of nodes that can stay put is therefore a longest increasing
//! subsequence; every other node is moved exactly once.

use tracing::trace;

use crate::error::HostError;
use crate::host::{Host, NodeId};

/// Indices of a longest non-decreasing subsequence of `keys`, in ascending
/// index order.
///
/// Equal keys count as ordered by position, so `[1, 1]` is fully ordered.
pub fn longest_increasing_subsequence(keys: &[usize]) -> Vec<usize> {
    // tails[len - 1] = index of the smallest key ending a subsequence of length len
    let mut tails: Vec<usize> = Vec::with_capacity(keys.len());
    let mut previous: Vec<Option<usize>> = vec![None; keys.len()];

    for (i, &key) in keys.iter().enumerate() {
        // Fast path: extends the longest run found so far
        let len = match tails.last() {
            Some(&last) if keys[last] <= key => tails.len(),
            _ => tails.partition_point(|&t| keys[t] <= key),
        };
        previous[i] = len.checked_sub(1).map(|l| tails[l]);
        if len == tails.len() {
            tails.push(i);
        } else {
            tails[len] = i;
        }
    }

    let mut sequence = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        sequence.push(i);
        cursor = previous[i];
    }
    sequence.reverse();
    sequence
}

/// Put the claimed children of `target` into claim order.
///
/// Runs once per container per hydration; later calls return `Ok(0)`.
/// Children without a claim order (nodes injected outside the claimed
/// structure) are left where they are. Returns the number of moved nodes.
pub fn init_hydrate(host: &Host, target: NodeId) -> Result<usize, HostError> {
    if !host.hydrator.begin_reorder(target) {
        return Ok(0);
    }
    let doc = &host.document;

    let children: Vec<(NodeId, usize)> = doc
        .children(target)
        .into_iter()
        .filter_map(|child| host.hydrator.claim_order(child).map(|order| (child, order)))
        .collect();
    let keys: Vec<usize> = children.iter().map(|&(_, order)| order).collect();

    let stay = longest_increasing_subsequence(&keys);
    let mut stays = vec![false; children.len()];
    for &i in &stay {
        stays[i] = true;
    }
    let fixed: Vec<(NodeId, usize)> = stay.iter().map(|&i| children[i]).collect();

    let mut to_move: Vec<(NodeId, usize)> = children
        .iter()
        .zip(&stays)
        .filter(|&(_, &stays)| !stays)
        .map(|(&child, _)| child)
        .collect();
    // Stable, so equal claim orders keep their live order
    to_move.sort_by_key(|&(_, order)| order);

    let mut j = 0;
    for &(node, order) in &to_move {
        while j < fixed.len() && order >= fixed[j].1 {
            j += 1;
        }
        let anchor = fixed.get(j).map(|&(anchor, _)| anchor);
        trace!(?node, ?anchor, order, "moving claimed node");
        doc.insert_before(target, node, anchor)?;
    }

    if !to_move.is_empty() {
        trace!(?target, moved = to_move.len(), kept = fixed.len(), "reordered claimed children");
    }
    Ok(to_move.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(keys: &[usize], indices: &[usize]) -> Vec<usize> {
        indices.iter().map(|&i| keys[i]).collect()
    }

    #[test]
    fn test_lis_basic() {
        let keys = [3, 1, 4, 1, 5, 9, 2, 6];
        let lis = longest_increasing_subsequence(&keys);
        assert_eq!(lis.len(), 4);
        let picked = values(&keys, &lis);
        assert!(picked.windows(2).all(|w| w[0] <= w[1]));
        assert!(lis.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_lis_edges() {
        assert!(longest_increasing_subsequence(&[]).is_empty());
        assert_eq!(longest_increasing_subsequence(&[7]), vec![0]);
        assert_eq!(longest_increasing_subsequence(&[0, 1, 2, 3]), vec![0, 1, 2, 3]);
        assert_eq!(longest_increasing_subsequence(&[3, 2, 1, 0]).len(), 1);
        assert_eq!(longest_increasing_subsequence(&[1, 1]), vec![0, 1]);
    }

    fn container(host: &Host, orders: &[usize]) -> (NodeId, Vec<NodeId>) {
        let doc = &host.document;
        let target = doc.create_element("ul");
        let nodes: Vec<NodeId> = orders
            .iter()
            .map(|&order| {
                let node = doc.create_element("li");
                doc.append_child(target, node).unwrap();
                host.hydrator.assign_claim_order(node, order);
                node
            })
            .collect();
        (target, nodes)
    }

    #[test]
    fn test_reorder_moves_n_minus_lis() {
        let host = Host::new();
        let orders = [3, 1, 4, 1, 5, 9, 2, 6];
        let (target, _) = container(&host, &orders);
        host.document.reset_stats();

        let moved = init_hydrate(&host, target).unwrap();

        assert_eq!(moved, orders.len() - 4);
        assert_eq!(host.document.stats().moved, orders.len() - 4);
        let after: Vec<usize> = host
            .document
            .children(target)
            .into_iter()
            .filter_map(|child| host.hydrator.claim_order(child))
            .collect();
        assert_eq!(after, vec![1, 1, 2, 3, 4, 5, 6, 9]);
    }

    #[test]
    fn test_reorder_runs_once() {
        let host = Host::new();
        let (target, _) = container(&host, &[1, 0]);
        assert_eq!(init_hydrate(&host, target).unwrap(), 1);
        assert_eq!(init_hydrate(&host, target).unwrap(), 0);
    }

    #[test]
    fn test_unordered_children_stay_put() {
        let host = Host::new();
        let doc = &host.document;
        let (target, nodes) = container(&host, &[2, 0, 1]);
        let injected = doc.create_element("meta");
        doc.insert_before(target, injected, Some(nodes[1])).unwrap();

        init_hydrate(&host, target).unwrap();

        // The LIS [0, 1] stays; node 2 moves to the end
        assert_eq!(doc.children(target), vec![injected, nodes[1], nodes[2], nodes[0]]);
    }

    #[test]
    fn test_equal_orders_keep_live_order_when_moved() {
        let host = Host::new();
        let (target, nodes) = container(&host, &[1, 1, 0, 0]);

        assert_eq!(init_hydrate(&host, target).unwrap(), 2);
        assert_eq!(host.document.children(target), vec![nodes[2], nodes[3], nodes[0], nodes[1]]);
    }
}
