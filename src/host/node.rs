//! Host node records.
//!
//! Nodes are NOT objects. A node is an index into the document's node arena,
//! and all structure (parent, children) lives in the arena records:
//!
//! ```text
//! NodeId(0): Element "section" (parent=None, children=[1, 3])
//! NodeId(1): Element "h2"      (parent=0,    children=[2])
//! NodeId(2): Text "Contact"    (parent=1)
//! NodeId(3): Text " "          (parent=0)
//! ```

use std::fmt;

/// Stable identity of a node inside a [`Document`](super::Document).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Element with a lowercase tag name and attributes in insertion order.
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    /// Text node.
    Text(String),
}

impl NodeKind {
    pub fn is_text(&self) -> bool {
        matches!(self, NodeKind::Text(_))
    }

    pub fn is_element(&self) -> bool {
        matches!(self, NodeKind::Element { .. })
    }
}

/// Arena record for one node.
#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl NodeData {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}
