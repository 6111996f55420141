//! DOM Node Operations
//!
//! Errors raised by tree mutation.

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("Node not found: {0}")]
    NotFound(NodeId),
    /// Hierarchy error (e.g., inserting ancestor)
    #[error("Hierarchy request error: {child} cannot be placed under {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// Node is not a child
    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    /// Invalid node type for the operation
    #[error("Invalid node type for {0}")]
    InvalidNodeType(NodeId),
}
