//! Host collaborator interface
//!
//! The router never walks a tree or installs a listener itself; it asks the
//! host. A host supplies an element handle type, tree traversal, two
//! sentinel roots, and native listener registration.

use std::fmt::Debug;
use std::hash::Hash;

/// Node kind as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Window,
    Document,
    DocumentType,
    Element,
    Text,
    Other,
}

/// Which internal callback a native registration points at
///
/// Hosts store this token with the registration and hand it back through
/// [`Router::handle_native`](crate::Router::handle_native) when the native
/// listener fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeListener {
    /// Element-level multiplexed dispatcher
    Dispatch,
    /// Capturing delegation listener at an ancestor
    Delegate,
}

/// Scroll position and border offset of a box
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxMetrics {
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub client_left: f64,
    pub client_top: f64,
}

/// Metrics of the document element and body, either possibly unavailable
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DocumentMetrics {
    pub root: Option<BoxMetrics>,
    pub body: Option<BoxMetrics>,
}

/// Host element tree and native dispatch facility
pub trait Host {
    /// Opaque element handle compared by identity
    type Element: Clone + Eq + Hash + Debug + 'static;

    /// Window-equivalent sentinel root
    fn window(&self) -> Self::Element;

    /// Document-equivalent sentinel root
    fn document(&self) -> Self::Element;

    fn parent_of(&self, element: &Self::Element) -> Option<Self::Element>;

    fn previous_sibling_of(&self, element: &Self::Element) -> Option<Self::Element>;

    fn node_kind_of(&self, element: &Self::Element) -> NodeKind;

    /// Tag name of element nodes; `None` for everything else
    fn tag_name_of(&self, element: &Self::Element) -> Option<&str>;

    /// Scroll and border metrics used for page coordinates
    fn document_metrics(&self) -> DocumentMetrics {
        DocumentMetrics::default()
    }

    fn register_native_listener(
        &mut self,
        element: &Self::Element,
        event_type: &str,
        listener: NativeListener,
        capture: bool,
    );

    fn unregister_native_listener(
        &mut self,
        element: &Self::Element,
        event_type: &str,
        listener: NativeListener,
    );
}
