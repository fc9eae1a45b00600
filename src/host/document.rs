//! Document - the in-process host tree.
//!
//! An arena of nodes behind a cheap-to-clone handle. It exposes exactly the
//! host contract the runtime depends on:
//! - create element / text
//! - set / remove attribute, set text
//! - insert-before / append, remove
//! - read the live child list
//!
//! Every structural mutation is counted in [`MutationStats`] so callers can
//! observe how much work hydration performed.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::HostError;

use super::node::{NodeData, NodeId, NodeKind};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Counters for structural host-tree mutations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MutationStats {
    /// Nodes created (including text split remainders).
    pub created: usize,
    /// Detached nodes inserted under a parent.
    pub inserted: usize,
    /// Attached nodes moved to a new position.
    pub moved: usize,
    /// Nodes removed from their parent.
    pub removed: usize,
}

#[derive(Default)]
struct DocumentInner {
    nodes: Vec<NodeData>,
    stats: MutationStats,
}

impl DocumentInner {
    // Ids index the arena directly; an id from another document may panic
    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData::new(kind));
        self.stats.created += 1;
        id
    }

    fn unlink(&mut self, node: NodeId) {
        if let Some(parent) = self.node(node).parent {
            self.node_mut(parent).children.retain(|&c| c != node);
            self.node_mut(node).parent = None;
        }
    }

    fn is_ancestor(&self, candidate: NodeId, mut of: NodeId) -> bool {
        loop {
            if of == candidate {
                return true;
            }
            match self.node(of).parent {
                Some(parent) => of = parent,
                None => return false,
            }
        }
    }
}

/// Shared handle to a host tree.
///
/// # Panics
///
/// A [`NodeId`] is only valid for the document that created it. Passing an
/// id minted by a larger document panics on the out-of-range lookup.
#[derive(Clone, Default)]
pub struct Document {
    inner: Rc<RefCell<DocumentInner>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Create a detached element. Tag names are stored lowercase.
    pub fn create_element(&self, name: &str) -> NodeId {
        self.inner.borrow_mut().alloc(NodeKind::Element {
            name: name.to_ascii_lowercase(),
            attributes: Vec::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&self, data: &str) -> NodeId {
        self.inner.borrow_mut().alloc(NodeKind::Text(data.to_string()))
    }

    /// Number of nodes ever created in this document.
    pub fn len(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Node content
    // =========================================================================

    pub fn kind(&self, node: NodeId) -> NodeKind {
        self.inner.borrow().node(node).kind.clone()
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        self.inner.borrow().node(node).kind.is_text()
    }

    /// Tag name of an element, `None` for text.
    pub fn node_name(&self, node: NodeId) -> Option<String> {
        match &self.inner.borrow().node(node).kind {
            NodeKind::Element { name, .. } => Some(name.clone()),
            NodeKind::Text(_) => None,
        }
    }

    /// Content of a text node, `None` for elements.
    pub fn text(&self, node: NodeId) -> Option<String> {
        match &self.inner.borrow().node(node).kind {
            NodeKind::Text(data) => Some(data.clone()),
            NodeKind::Element { .. } => None,
        }
    }

    /// Overwrite a text node's content. Ignored on elements.
    pub fn set_text(&self, node: NodeId, data: &str) {
        if let NodeKind::Text(current) = &mut self.inner.borrow_mut().node_mut(node).kind {
            current.clear();
            current.push_str(data);
        }
    }

    /// Split a text node at byte `offset`.
    ///
    /// The node keeps the prefix; a new node holding the remainder is returned
    /// and, when the node is attached, inserted right after it.
    pub fn split_text(&self, node: NodeId, offset: usize) -> NodeId {
        let mut inner = self.inner.borrow_mut();
        let remainder = match &mut inner.node_mut(node).kind {
            NodeKind::Text(data) => {
                let mut at = offset.min(data.len());
                while !data.is_char_boundary(at) {
                    at -= 1;
                }
                data.split_off(at)
            }
            NodeKind::Element { .. } => String::new(),
        };
        let split = inner.alloc(NodeKind::Text(remainder));
        if let Some(parent) = inner.node(node).parent {
            let siblings = &mut inner.node_mut(parent).children;
            let position = siblings.iter().position(|&c| c == node).map_or(siblings.len(), |p| p + 1);
            siblings.insert(position, split);
            inner.node_mut(split).parent = Some(parent);
            inner.stats.inserted += 1;
        }
        split
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        match &self.inner.borrow().node(node).kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone()),
            NodeKind::Text(_) => None,
        }
    }

    /// All attributes of an element, in insertion order.
    pub fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        match &self.inner.borrow().node(node).kind {
            NodeKind::Element { attributes, .. } => attributes.clone(),
            NodeKind::Text(_) => Vec::new(),
        }
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.inner.borrow_mut().node_mut(node).kind {
            match attributes.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => attributes.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.inner.borrow_mut().node_mut(node).kind {
            attributes.retain(|(key, _)| key != name);
        }
    }

    // =========================================================================
    // Structure
    // =========================================================================

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.borrow().node(node).parent
    }

    /// Snapshot of the live child list.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner.borrow().node(node).children.clone()
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.inner.borrow().node(node).children.first().copied()
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let inner = self.inner.borrow();
        let parent = inner.node(node).parent?;
        let siblings = &inner.node(parent).children;
        let position = siblings.iter().position(|&c| c == node)?;
        siblings.get(position + 1).copied()
    }

    /// Insert `node` under `parent` before `anchor`, or at the end when the
    /// anchor is `None`. An attached node is moved.
    pub fn insert_before(&self, parent: NodeId, node: NodeId, anchor: Option<NodeId>) -> Result<(), HostError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(anchor) = anchor {
            if anchor == node {
                return Ok(());
            }
            if inner.node(anchor).parent != Some(parent) {
                return Err(HostError::AnchorNotChild { parent, anchor });
            }
        }
        if inner.is_ancestor(node, parent) {
            return Err(HostError::Cycle { parent, node });
        }

        if inner.node(node).parent.is_some() {
            inner.unlink(node);
            inner.stats.moved += 1;
        } else {
            inner.stats.inserted += 1;
        }

        let siblings = &mut inner.node_mut(parent).children;
        let position = anchor
            .and_then(|anchor| siblings.iter().position(|&c| c == anchor))
            .unwrap_or(siblings.len());
        siblings.insert(position, node);
        inner.node_mut(node).parent = Some(parent);
        Ok(())
    }

    pub fn append_child(&self, parent: NodeId, node: NodeId) -> Result<(), HostError> {
        self.insert_before(parent, node, None)
    }

    pub fn remove_child(&self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        let mut inner = self.inner.borrow_mut();
        if inner.node(child).parent != Some(parent) {
            return Err(HostError::NotAChild { parent, child });
        }
        inner.unlink(child);
        inner.stats.removed += 1;
        Ok(())
    }

    /// Remove `node` from its parent. No-op for detached nodes.
    pub fn detach(&self, node: NodeId) {
        let mut inner = self.inner.borrow_mut();
        if inner.node(node).parent.is_some() {
            inner.unlink(node);
            inner.stats.removed += 1;
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    pub fn stats(&self) -> MutationStats {
        self.inner.borrow().stats
    }

    pub fn reset_stats(&self) {
        self.inner.borrow_mut().stats = MutationStats::default();
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Serialize a node and its subtree as HTML.
    pub fn outer_html(&self, node: NodeId) -> String {
        let inner = self.inner.borrow();
        let mut out = String::new();
        write_node(&inner, node, &mut out);
        out
    }

    /// Serialize the children of a node as HTML.
    pub fn inner_html(&self, node: NodeId) -> String {
        let inner = self.inner.borrow();
        let mut out = String::new();
        for &child in &inner.node(node).children {
            write_node(&inner, child, &mut out);
        }
        out
    }
}

fn write_node(inner: &DocumentInner, node: NodeId, out: &mut String) {
    let data = inner.node(node);
    match &data.kind {
        NodeKind::Text(text) => escape_into(text, false, out),
        NodeKind::Element { name, attributes } => {
            out.push('<');
            out.push_str(name);
            for (key, value) in attributes {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&name.as_str()) {
                return;
            }
            for &child in &data.children {
                write_node(inner, child, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_move_are_counted_separately() {
        let doc = Document::new();
        let root = doc.create_element("div");
        let a = doc.create_element("p");
        let b = doc.create_element("span");

        doc.append_child(root, a).unwrap();
        doc.append_child(root, b).unwrap();
        doc.insert_before(root, b, Some(a)).unwrap();

        assert_eq!(doc.children(root), vec![b, a]);
        let stats = doc.stats();
        assert_eq!(stats.inserted, 2);
        assert_eq!(stats.moved, 1);
    }

    #[test]
    fn test_insert_before_foreign_anchor() {
        let doc = Document::new();
        let root = doc.create_element("div");
        let other = doc.create_element("div");
        let stray = doc.create_element("p");
        let node = doc.create_element("p");
        doc.append_child(other, stray).unwrap();

        let err = doc.insert_before(root, node, Some(stray)).unwrap_err();
        assert_eq!(err, HostError::AnchorNotChild { parent: root, anchor: stray });
    }

    #[test]
    fn test_cycle_rejected() {
        let doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner).unwrap();

        assert!(matches!(doc.append_child(inner, outer), Err(HostError::Cycle { .. })));
    }

    #[test]
    fn test_split_text_inserts_remainder_after() {
        let doc = Document::new();
        let p = doc.create_element("p");
        let t = doc.create_text("hello world");
        doc.append_child(p, t).unwrap();

        let rest = doc.split_text(t, 5);
        assert_eq!(doc.text(t).as_deref(), Some("hello"));
        assert_eq!(doc.text(rest).as_deref(), Some(" world"));
        assert_eq!(doc.children(p), vec![t, rest]);
    }

    #[test]
    fn test_detach_without_parent_is_noop() {
        let doc = Document::new();
        let node = doc.create_text("x");
        doc.detach(node);
        assert_eq!(doc.stats().removed, 0);
    }

    #[test]
    fn test_html_serialization() {
        let doc = Document::new();
        let form = doc.create_element("FORM");
        doc.set_attribute(form, "class", "a\"b");
        let input = doc.create_element("input");
        let text = doc.create_text("1 < 2");
        doc.append_child(form, input).unwrap();
        doc.append_child(form, text).unwrap();

        assert_eq!(doc.outer_html(form), "<form class=\"a&quot;b\"><input>1 &lt; 2</form>");
    }

    #[test]
    fn test_nested_elements_close_in_order() {
        let doc = Document::new();
        let ul = doc.create_element("ul");
        let li = doc.create_element("li");
        doc.set_attribute(li, "data-key", "1");
        doc.append_child(ul, li).unwrap();
        let text = doc.create_text("a & b");
        doc.append_child(li, text).unwrap();

        assert_eq!(doc.outer_html(ul), "<ul><li data-key=\"1\">a &amp; b</li></ul>");
    }

    #[test]
    #[should_panic]
    fn test_foreign_node_id_panics() {
        let big = Document::new();
        big.create_element("div");
        let foreign = big.create_element("p");

        let small = Document::new();
        small.create_element("div");
        small.children(foreign);
    }
}
