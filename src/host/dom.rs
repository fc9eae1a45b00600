//! Host primitives used by compiled fragment code.
//!
//! Thin wrappers over [`Document`] that encode the update rules fragments
//! rely on: attribute writes skip no-op updates, `None` removes, and text
//! writes are skipped when the content already matches.

use crate::fragment::Fragment;

use super::{Document, Host, NodeId};

/// Create a detached element.
pub fn element(doc: &Document, name: &str) -> NodeId {
    doc.create_element(name)
}

/// Create a detached text node.
pub fn text(doc: &Document, data: &str) -> NodeId {
    doc.create_text(data)
}

/// Create the single-space text node compiled templates put between tags.
pub fn space(doc: &Document) -> NodeId {
    doc.create_text(" ")
}

/// Set or remove an attribute. Writing the current value is skipped.
pub fn attr(doc: &Document, node: NodeId, name: &str, value: Option<&str>) {
    match value {
        None => doc.remove_attribute(node, name),
        Some(value) => {
            if doc.attribute(node, name).as_deref() != Some(value) {
                doc.set_attribute(node, name, value);
            }
        }
    }
}

/// Update a text node, skipping the write when nothing changed.
pub fn set_data(doc: &Document, node: NodeId, data: &str) {
    if doc.text(node).as_deref() != Some(data) {
        doc.set_text(node, data);
    }
}

/// Detach a node from its parent. Detached nodes are left alone.
pub fn detach(doc: &Document, node: NodeId) {
    doc.detach(node);
}

/// Snapshot of a node's live children.
pub fn children(doc: &Document, node: NodeId) -> Vec<NodeId> {
    doc.children(node)
}

/// Destroy every live block of a keyed or indexed list.
pub fn destroy_each(host: &Host, blocks: &mut [Option<Box<dyn Fragment>>], detaching: bool) {
    for block in blocks.iter_mut().flatten() {
        block.destroy(host, detaching);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_none_removes() {
        let doc = Document::new();
        let node = element(&doc, "input");
        attr(&doc, node, "type", Some("text"));
        assert_eq!(doc.attribute(node, "type").as_deref(), Some("text"));

        attr(&doc, node, "type", None);
        assert_eq!(doc.attribute(node, "type"), None);
    }

    #[test]
    fn test_set_data_skips_identical() {
        let doc = Document::new();
        let node = text(&doc, "same");
        set_data(&doc, node, "same");
        assert_eq!(doc.text(node).as_deref(), Some("same"));
        set_data(&doc, node, "other");
        assert_eq!(doc.text(node).as_deref(), Some("other"));
    }
}
