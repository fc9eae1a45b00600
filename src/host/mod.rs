//! Host tree - the node tree components render into.
//!
//! - [`Document`]: arena-backed host tree with mutation statistics
//! - [`dom`]: primitives called by compiled fragment code
//! - [`Host`]: the document paired with its hydration state
//!
//! The runtime only needs the minimal contract `Document` exposes: create
//! nodes, edit attributes and text, insert/remove, read children.

mod document;
mod node;
pub mod dom;

pub use document::{Document, MutationStats};
pub use node::{NodeId, NodeKind};

use crate::hydration::Hydrator;

/// A document together with the claimer state used while hydrating it.
///
/// Cheap to clone; every clone refers to the same tree.
#[derive(Clone, Default)]
pub struct Host {
    pub document: Document,
    pub hydrator: Hydrator,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing document, e.g. one holding server-rendered markup.
    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            hydrator: Hydrator::new(),
        }
    }

    /// Whether fragments are currently claiming live nodes.
    pub fn is_hydrating(&self) -> bool {
        self.hydrator.is_hydrating()
    }
}
