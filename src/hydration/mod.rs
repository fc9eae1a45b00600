//! Hydration - claiming server-rendered nodes instead of creating them.
//!
//! - [`claim`]: find-or-create each node a fragment requests, in request order
//! - [`reorder`]: LIS-based reordering of a container's claimed children
//! - [`insert`]: claim-order aware insertion used while mounting
//!
//! # Claim order
//!
//! Every node handed to a fragment while hydrating gets a claim order: the
//! position at which the fragment asked for it. The first time a fragment
//! inserts into a container, the container's children are reordered so that
//! their live order matches claim order with as few moves as possible.
//!
//! Claim orders live in a side table owned by the [`Hydrator`]; host nodes are
//! never annotated.

pub mod claim;
pub mod insert;
pub mod reorder;

pub use claim::{claim_element, claim_node, claim_space, claim_text, ClaimInfo, NodeList};
pub use insert::{append_hydration, insert_hydration};
pub use reorder::{init_hydrate, longest_increasing_subsequence};

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::host::NodeId;

#[derive(Default)]
struct HydrationState {
    hydrating: bool,
    /// Claim order per claimed node.
    claim_order: HashMap<NodeId, usize>,
    /// Containers whose children were already reordered.
    reordered: HashSet<NodeId>,
    /// Insertion cursor per container. A missing entry means "not started",
    /// `Some(None)` means "at the end".
    end_child: HashMap<NodeId, Option<NodeId>>,
}

/// Claimer state for one host tree.
#[derive(Clone, Default)]
pub struct Hydrator {
    state: Rc<RefCell<HydrationState>>,
}

impl Hydrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter hydration mode.
    pub fn start(&self) {
        self.state.borrow_mut().hydrating = true;
    }

    /// Leave hydration mode and drop all claim metadata.
    pub fn end(&self) {
        let mut state = self.state.borrow_mut();
        state.hydrating = false;
        state.claim_order.clear();
        state.reordered.clear();
        state.end_child.clear();
    }

    pub fn is_hydrating(&self) -> bool {
        self.state.borrow().hydrating
    }

    /// Claim order of a node, if it was claimed during this hydration.
    pub fn claim_order(&self, node: NodeId) -> Option<usize> {
        self.state.borrow().claim_order.get(&node).copied()
    }

    pub(crate) fn assign_claim_order(&self, node: NodeId, order: usize) {
        let previous = self.state.borrow_mut().claim_order.insert(node, order);
        debug_assert!(previous.is_none(), "{node:?} claimed twice");
    }

    /// Mark a container as reordered. Returns false if it already was.
    pub(crate) fn begin_reorder(&self, container: NodeId) -> bool {
        self.state.borrow_mut().reordered.insert(container)
    }

    pub(crate) fn end_child(&self, container: NodeId) -> Option<Option<NodeId>> {
        self.state.borrow().end_child.get(&container).copied()
    }

    pub(crate) fn set_end_child(&self, container: NodeId, end: Option<NodeId>) {
        self.state.borrow_mut().end_child.insert(container, end);
    }
}
