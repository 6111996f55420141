//! DOM Tree (arena-based allocation)
//!
//! Slot 0 is the window and slot 1 the document; every other node is
//! created detached and linked in with [`DomTree::append_child`] or
//! [`DomTree::insert_before`]. Removed nodes keep their slot, so a stale
//! [`NodeId`] never aliases a different node.

use crate::{BoxMetrics, DomError, DomResult, Node, NodeData, NodeId, NodeType};

/// Arena-based DOM tree for memory efficiency
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the window and an empty document
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::window(), Node::document()],
        }
    }

    /// The window node
    pub fn window(&self) -> NodeId {
        NodeId::WINDOW
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        NodeId::DOCUMENT
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.push(Node::doctype(name))
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    /// Number of nodes in the arena, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true; window and document always exist)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn link(id: NodeId) -> Option<NodeId> {
        id.is_valid().then_some(id)
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| Self::link(n.parent))
    }

    /// Previous sibling of a node
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| Self::link(n.prev_sibling))
    }

    /// Next sibling of a node
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| Self::link(n.next_sibling))
    }

    /// First child of a node
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| Self::link(n.first_child))
    }

    /// Iterate over the children of a node
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Node type, if the id is known
    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.get(id).map(Node::node_type)
    }

    /// Tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| e.tag.as_str())
    }

    /// Whether the node is reachable from the document by parent links
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == NodeId::DOCUMENT {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Ancestors from the parent up to the document (window excluded)
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            out.push(node);
            current = self.parent(node);
        }
        out
    }

    /// The `<html>` element: first element child of the document
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::DOCUMENT)
            .find(|(_, node)| node.is_element())
            .map(|(id, _)| id)
    }

    /// The `<body>` element
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .find(|(_, node)| {
                node.as_element()
                    .is_some_and(|e| e.tag.eq_ignore_ascii_case("body"))
            })
            .map(|(id, _)| id)
    }

    /// Set scroll / border offsets of an element
    pub fn set_metrics(&mut self, id: NodeId, metrics: BoxMetrics) -> DomResult<()> {
        let node = self.get_mut(id).ok_or(DomError::NotFound(id))?;
        let element = node.as_element_mut().ok_or(DomError::InvalidNodeType(id))?;
        element.metrics = Some(metrics);
        Ok(())
    }

    /// Scroll / border offsets of an element, if any were set
    pub fn metrics(&self, id: NodeId) -> Option<BoxMetrics> {
        self.get(id)?.as_element()?.metrics
    }

    /// Append a child node, detaching it from any previous parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` under `parent` (append when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.check_insert(parent, child)?;
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild { parent, child: reference });
            }
            if reference == child {
                return Ok(child);
            }
        }

        if let Some(old_parent) = self.parent(child) {
            self.unlink(old_parent, child);
        }

        let prev = match reference {
            Some(r) => self.nodes[r.index()].prev_sibling,
            None => self.nodes[parent.index()].last_child,
        };
        let next = reference.unwrap_or(NodeId::NONE);

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = next;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }

        tracing::trace!("Inserted {} under {}", child, parent);
        Ok(child)
    }

    /// Remove a child node; the node stays in the arena, detached
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.node(parent)?;
        self.node(child)?;
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.unlink(parent, child);
        tracing::trace!("Removed {} from {}", child, parent);
        Ok(child)
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;

        if !matches!(parent_node.data, NodeData::Document | NodeData::Element(_)) {
            return Err(DomError::InvalidNodeType(parent));
        }
        if matches!(child_node.data, NodeData::Window | NodeData::Document) {
            return Err(DomError::InvalidNodeType(child));
        }
        if child == parent || self.ancestors(parent).contains(&child) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) {
        let (prev, next) = {
            let node = &self.nodes[child.index()];
            (node.prev_sibling, node.next_sibling)
        };
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }
        let node = &mut self.nodes[child.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node's children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.tree.get(id)?;
        self.next = self.tree.next_sibling(id);
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(tree: &DomTree, parent: NodeId) -> Vec<NodeId> {
        tree.children(parent).map(|(id, _)| id).collect()
    }

    #[test]
    fn test_append_and_order() {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        tree.append_child(tree.root(), html).unwrap();
        tree.append_child(html, a).unwrap();
        tree.append_child(html, b).unwrap();

        assert_eq!(ids(&tree, html), vec![a, b]);
        assert_eq!(tree.prev_sibling(b), Some(a));
        assert_eq!(tree.parent(a), Some(html));
        assert_eq!(tree.document_element(), Some(html));
    }

    #[test]
    fn test_insert_before() {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        tree.append_child(tree.root(), html).unwrap();
        tree.append_child(html, b).unwrap();
        tree.insert_before(html, a, Some(b)).unwrap();

        assert_eq!(ids(&tree, html), vec![a, b]);
        assert_eq!(tree.prev_sibling(a), None);
    }

    #[test]
    fn test_remove_child_detaches() {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let a = tree.create_element("a");
        tree.append_child(tree.root(), html).unwrap();
        tree.append_child(html, a).unwrap();
        assert!(tree.is_connected(a));

        tree.remove_child(html, a).unwrap();
        assert!(!tree.is_connected(a));
        assert!(tree.first_child(html).is_none());
        assert_eq!(
            tree.remove_child(html, a),
            Err(DomError::NotAChild { parent: html, child: a })
        );
    }

    #[test]
    fn test_hierarchy_errors() {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let div = tree.create_element("div");
        tree.append_child(tree.root(), html).unwrap();
        tree.append_child(html, div).unwrap();

        assert!(matches!(
            tree.append_child(div, html),
            Err(DomError::HierarchyRequest { .. })
        ));
        let text = tree.create_text("x");
        assert_eq!(tree.append_child(text, div), Err(DomError::InvalidNodeType(text)));
        assert_eq!(
            tree.append_child(html, NodeId::DOCUMENT),
            Err(DomError::InvalidNodeType(NodeId::DOCUMENT))
        );
    }

    #[test]
    fn test_body_and_metrics() {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let body = tree.create_element("BODY");
        tree.append_child(tree.root(), html).unwrap();
        tree.append_child(html, body).unwrap();

        assert_eq!(tree.body(), Some(body));
        tree.set_metrics(body, BoxMetrics::scrolled(5.0, 6.0)).unwrap();
        assert_eq!(tree.metrics(body), Some(BoxMetrics::scrolled(5.0, 6.0)));
        assert_eq!(tree.metrics(html), None);
    }
}
