//! DOM Node - arena slot with index links
//!
//! Nodes hold links as [`NodeId`] indices instead of pointers, so a node
//! handle is a plain `Copy` value with identity semantics.

use crate::{BoxMetrics, NodeId};

/// One arena slot
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if root or detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create the window node
    pub fn window() -> Self {
        Self::with_data(NodeData::Window)
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self::with_data(NodeData::Text(content.to_string()))
    }

    /// Create a comment node
    pub fn comment(content: &str) -> Self {
        Self::with_data(NodeData::Comment(content.to_string()))
    }

    /// Create a doctype node
    pub fn doctype(name: &str) -> Self {
        Self::with_data(NodeData::Doctype { name: name.to_string() })
    }

    /// Node type of this node
    pub fn node_type(&self) -> NodeType {
        match &self.data {
            NodeData::Window => NodeType::Window,
            NodeData::Document => NodeType::Document,
            NodeData::Doctype { .. } => NodeType::DocumentType,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Comment(_) => NodeType::Comment,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Global window object, parent of nothing and child of nothing
    Window,
    /// Document root
    Document,
    /// DOCTYPE
    Doctype { name: String },
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Node kind as seen by traversal code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Window,
    Document,
    DocumentType,
    Element,
    Text,
    Comment,
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Tag name as written
    pub tag: String,
    /// Scroll / border offsets, when laid out
    pub metrics: Option<BoxMetrics>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            metrics: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_types() {
        assert_eq!(Node::element("div").node_type(), NodeType::Element);
        assert_eq!(Node::doctype("html").node_type(), NodeType::DocumentType);
        assert_eq!(Node::text("hi").as_text(), Some("hi"));
        assert!(Node::comment("x").as_element().is_none());
    }

    #[test]
    fn test_new_node_is_unlinked() {
        let node = Node::element("span");
        assert!(!node.parent.is_valid());
        assert!(!node.prev_sibling.is_valid());
        assert_eq!(node.as_element().map(|e| e.tag.as_str()), Some("span"));
    }
}
