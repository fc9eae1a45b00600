//! Claiming live nodes.
//!
//! A fragment hydrates by requesting its nodes one by one from a [`NodeList`]
//! (the live children of some container). Each request either takes a
//! matching live node out of the list or, when nothing matches, creates a
//! fresh node. Either way the result gets the next claim order.
//!
//! The search starts at the position of the previous match and moves forward
//! first, so markup that is already in the right order is claimed front to
//! back without ever scanning backwards.

use tracing::{debug, trace};

use crate::host::{Document, Host, NodeId};

/// Search cursor and claim counter for one live node list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClaimInfo {
    /// Position of the last non-text match.
    pub last_index: usize,
    /// Claims handed out so far; the next claim gets this as its order.
    pub total_claimed: usize,
}

/// Live, still-unclaimed children of a container.
#[derive(Clone, Debug, Default)]
pub struct NodeList {
    nodes: Vec<NodeId>,
    info: ClaimInfo,
}

impl NodeList {
    pub fn new(nodes: Vec<NodeId>) -> Self {
        Self {
            nodes,
            info: ClaimInfo::default(),
        }
    }

    /// Snapshot the live children of `parent`.
    pub fn children_of(doc: &Document, parent: NodeId) -> Self {
        Self::new(doc.children(parent))
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn info(&self) -> ClaimInfo {
        self.info
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Detach every node nobody claimed.
    pub fn detach_unclaimed(self, doc: &Document) {
        if !self.nodes.is_empty() {
            debug!(count = self.nodes.len(), "detaching unclaimed nodes");
        }
        for node in self.nodes {
            doc.detach(node);
        }
    }
}

/// Find-or-create one node.
///
/// * `predicate` - whether a live node can serve this request
/// * `process` - adapts the matched node; returning a replacement keeps it in
///   the list in place of the match, returning `None` removes the match
/// * `create` - builds a fresh node when nothing matches
/// * `keep_last_index` - leave the search cursor where it is (text claims)
pub fn claim_node<P, F, C>(
    host: &Host,
    nodes: &mut NodeList,
    mut predicate: P,
    process: F,
    create: C,
    keep_last_index: bool,
) -> NodeId
where
    P: FnMut(NodeId) -> bool,
    F: FnOnce(NodeId) -> Option<NodeId>,
    C: FnOnce() -> NodeId,
{
    let start = nodes.info.last_index;
    let len = nodes.nodes.len();

    let mut found = None;
    for i in start..len {
        if predicate(nodes.nodes[i]) {
            found = Some((i, true));
            break;
        }
    }
    if found.is_none() {
        // Walk backwards so we stop at the nearest match before the cursor
        for i in (0..start.min(len)).rev() {
            if predicate(nodes.nodes[i]) {
                found = Some((i, false));
                break;
            }
        }
    }

    let node = match found {
        Some((i, forward)) => {
            let node = nodes.nodes[i];
            let replaced = match process(node) {
                Some(replacement) => {
                    nodes.nodes[i] = replacement;
                    true
                }
                None => {
                    nodes.nodes.remove(i);
                    false
                }
            };
            if !keep_last_index {
                nodes.info.last_index = i;
            } else if !forward && !replaced {
                // The removed entry sat before the cursor
                nodes.info.last_index -= 1;
            }
            trace!(?node, index = i, forward, "claimed live node");
            node
        }
        None => {
            let node = create();
            debug!(?node, "no live node matched, created a fresh one");
            node
        }
    };

    host.hydrator.assign_claim_order(node, nodes.info.total_claimed);
    nodes.info.total_claimed += 1;
    node
}

/// Claim an element by tag name.
///
/// Live attributes missing from `attributes` are removed so the element ends
/// up with exactly the attribute set the fragment expects. Values are left to
/// the fragment's own attribute pass.
pub fn claim_element(host: &Host, nodes: &mut NodeList, name: &str, attributes: &[&str]) -> NodeId {
    let doc = &host.document;
    claim_node(
        host,
        nodes,
        |node| {
            doc.node_name(node)
                .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
        },
        |node| {
            for (key, _) in doc.attributes(node) {
                if !attributes.contains(&key.as_str()) {
                    doc.remove_attribute(node, &key);
                }
            }
            None
        },
        || doc.create_element(name),
        false,
    )
}

/// Claim a text node holding `data`.
///
/// A live node that starts with `data` is reused; if it is longer, it is split
/// and the remainder stays claimable. Any other text node is overwritten.
pub fn claim_text(host: &Host, nodes: &mut NodeList, data: &str) -> NodeId {
    let doc = &host.document;
    claim_node(
        host,
        nodes,
        |node| doc.is_text(node),
        |node| {
            let live = doc.text(node).unwrap_or_default();
            if live.starts_with(data) {
                if live.len() != data.len() {
                    return Some(doc.split_text(node, data.len()));
                }
            } else {
                doc.set_text(node, data);
            }
            None
        },
        || doc.create_text(data),
        true,
    )
}

/// Claim the single-space text node between tags.
pub fn claim_space(host: &Host, nodes: &mut NodeList) -> NodeId {
    claim_text(host, nodes, " ")
}
