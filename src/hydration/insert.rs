//! Insertion during mount.
//!
//! While hydrating, claimed nodes are mostly already in place. Each container
//! keeps a cursor (`end_child`) pointing just past the last node confirmed in
//! position; appending a node either advances the cursor over it or moves the
//! node to the cursor. Outside hydration these are plain insertions that skip
//! moves which would not change anything.

use crate::error::HostError;
use crate::host::{Host, NodeId};

use super::reorder::init_hydrate;

/// Append `node` as the next child of `target` in claim order.
pub fn append_hydration(host: &Host, target: NodeId, node: NodeId) -> Result<(), HostError> {
    let doc = &host.document;

    if !host.is_hydrating() {
        if doc.parent(node) != Some(target) || doc.next_sibling(node).is_some() {
            doc.append_child(target, node)?;
        }
        return Ok(());
    }

    init_hydrate(host, target)?;
    let hydrator = &host.hydrator;

    let mut end = match hydrator.end_child(target) {
        None => doc.first_child(target),
        Some(Some(child)) if doc.parent(child) != Some(target) => doc.first_child(target),
        Some(end) => end,
    };

    // Skip nodes that were never claimed
    while let Some(child) = end {
        if hydrator.claim_order(child).is_some() {
            break;
        }
        end = doc.next_sibling(child);
    }

    if end == Some(node) {
        end = doc.next_sibling(node);
    } else if hydrator.claim_order(node).is_some() || doc.parent(node) != Some(target) {
        doc.insert_before(target, node, end)?;
    }

    hydrator.set_end_child(target, end);
    Ok(())
}

/// Insert `node` under `target` before `anchor`.
///
/// Without an anchor during hydration this is [`append_hydration`].
pub fn insert_hydration(
    host: &Host,
    target: NodeId,
    node: NodeId,
    anchor: Option<NodeId>,
) -> Result<(), HostError> {
    if host.is_hydrating() && anchor.is_none() {
        return append_hydration(host, target, node);
    }
    let doc = &host.document;
    if doc.parent(node) != Some(target) || doc.next_sibling(node) != anchor {
        doc.insert_before(target, node, anchor)?;
    }
    Ok(())
}
