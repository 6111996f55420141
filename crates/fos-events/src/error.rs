//! Routing errors
//!
//! Only conditions the caller can act on are errors. Event-time problems
//! (a native event for an element nobody registered) are reported as a
//! skipped [`DispatchOutcome`](crate::DispatchOutcome) instead.

use std::fmt::Debug;

/// Router result type
pub type Result<T> = std::result::Result<T, RouteError>;

/// Errors raised synchronously by router operations
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// Element is not connected to a reachable root
    #[error("Unresolvable path for element {element}")]
    UnresolvablePath { element: String },

    /// Configuration could not be parsed
    #[error("Invalid router configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl RouteError {
    pub(crate) fn unresolvable(element: &impl Debug) -> Self {
        Self::UnresolvablePath {
            element: format!("{element:?}"),
        }
    }
}
