//! fOS DOM - Document Object Model
//!
//! Arena-allocated element tree used as the host side of event routing:
//! nodes addressed by [`NodeId`], sibling links for structural paths, box
//! metrics for page coordinates, and a [`ListenerTable`] that records native
//! listener registrations and plans their capture → target → bubble order.

mod node;
mod tree;
mod operations;
mod geometry;
mod listeners;

pub use node::{Node, NodeData, NodeType, ElementData};
pub use tree::{DomTree, Children};
pub use operations::{DomError, DomResult};
pub use geometry::BoxMetrics;
pub use listeners::{ListenerTable, Registration, DispatchStep, Phase};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The window node, outermost propagation root
    pub const WINDOW: NodeId = NodeId(0);
    /// The document node
    pub const DOCUMENT: NodeId = NodeId(1);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this id refers to a node slot
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
