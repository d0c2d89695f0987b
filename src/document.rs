//! Introspection Document
//!
//! Arena-owned element tree. Elements are appended and never removed; a
//! [`NodeId`] stays valid for as long as the document that issued it.

use serde::Serialize;

use crate::error::{Result, TypeError};

/// Element tags and attribute keys used in the document
pub mod tags {
    pub const ROOT: &str = "forsyde_types";
    pub const DATA_TYPE: &str = "data_type";
    pub const PRIMITIVE: &str = "primitive";
    pub const VECTOR: &str = "vector";
    pub const TUPLE: &str = "tuple";

    pub const NAME: &str = "name";
    pub const SIZE: &str = "size";
}

/// Handle to an element of a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

/// A single element: tag, attributes in insertion order, children in order
#[derive(Debug, Clone)]
pub struct Element {
    tag: &'static str,
    attributes: Vec<(&'static str, String)>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn attributes(&self) -> &[(&'static str, String)] {
        &self.attributes
    }

    /// Value of the attribute with the given key
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The element tree, rooted at a single `forsyde_types` element
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    /// Create a document holding only the root element
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new(tags::ROOT)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of elements, root included
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always false: the root element exists from construction
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    /// Append a new child element under `parent`
    pub fn append_child(&mut self, parent: NodeId, tag: &'static str) -> Result<NodeId> {
        let id = NodeId(self.elements.len());
        self.elements
            .get_mut(parent.0)
            .ok_or(TypeError::UnknownNode(parent))?
            .children
            .push(id);
        self.elements.push(Element::new(tag));
        Ok(id)
    }

    /// Attach a key/value pair to `node`. Keys are set once.
    pub fn set_attribute(&mut self, node: NodeId, key: &'static str, value: impl Into<String>) -> Result<()> {
        let element = self
            .elements
            .get_mut(node.0)
            .ok_or(TypeError::UnknownNode(node))?;
        if element.attribute(key).is_some() {
            return Err(TypeError::AttributeExists { key: key.to_string() });
        }
        element.attributes.push((key, value.into()));
        Ok(())
    }

    /// Direct children of `id` with their handles
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Element)> + '_ {
        self.get(id)
            .map(|e| e.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |child| self.get(*child).map(|e| (*child, e)))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_root() {
        let doc = Document::new();
        assert_eq!(doc.len(), 1);
        let root = doc.get(doc.root()).unwrap();
        assert_eq!(root.tag(), tags::ROOT);
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.append_child(root, tags::PRIMITIVE).unwrap();
        let b = doc.append_child(root, tags::VECTOR).unwrap();
        let c = doc.append_child(root, tags::TUPLE).unwrap();

        let ids: Vec<_> = doc.children(root).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn test_attribute_set_once() {
        let mut doc = Document::new();
        let node = doc.append_child(doc.root(), tags::DATA_TYPE).unwrap();
        doc.set_attribute(node, tags::NAME, "int").unwrap();

        let result = doc.set_attribute(node, tags::NAME, "float");
        assert!(matches!(result, Err(TypeError::AttributeExists { .. })));
        assert_eq!(doc.get(node).unwrap().attribute(tags::NAME), Some("int"));
    }

    #[test]
    fn test_unknown_parent() {
        let mut other = Document::new();
        let root = other.root();
        let foreign = other.append_child(root, tags::TUPLE).unwrap();
        let foreign = other.append_child(foreign, tags::TUPLE).unwrap();

        let mut doc = Document::new();
        let result = doc.append_child(foreign, tags::PRIMITIVE);
        assert!(matches!(result, Err(TypeError::UnknownNode(_))));
        assert_eq!(doc.len(), 1);
    }
}
