//! fOS DOM adapter
//!
//! [`DomHost`] pairs an arena [`DomTree`] with a [`ListenerTable`] of native
//! registrations, and [`Router::dispatch`] plays the role of the host's
//! native dispatch: it plans capture → target → bubble over the table and
//! feeds every native listener back into the router.

use fos_dom::{DomTree, ListenerTable, NodeId, NodeType};
use tracing::debug;

use crate::bus::TopicBus;
use crate::host::{BoxMetrics, DocumentMetrics, Host, NativeListener, NodeKind};
use crate::{Event, NativeEvent, Router};

/// Host over the fOS arena tree
#[derive(Debug, Default)]
pub struct DomHost {
    tree: DomTree,
    listeners: ListenerTable<NativeListener>,
}

impl DomHost {
    pub fn new(tree: DomTree) -> Self {
        Self {
            tree,
            listeners: ListenerTable::new(),
        }
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    pub fn listeners(&self) -> &ListenerTable<NativeListener> {
        &self.listeners
    }

    /// Native registrations on `node` for `event_type`
    pub fn native_listener_count(&self, node: NodeId, event_type: &str) -> usize {
        self.listeners.count(node, event_type)
    }
}

fn box_metrics(m: fos_dom::BoxMetrics) -> BoxMetrics {
    BoxMetrics {
        scroll_left: m.scroll_left,
        scroll_top: m.scroll_top,
        client_left: m.client_left,
        client_top: m.client_top,
    }
}

impl Host for DomHost {
    type Element = NodeId;

    fn window(&self) -> NodeId {
        self.tree.window()
    }

    fn document(&self) -> NodeId {
        self.tree.root()
    }

    fn parent_of(&self, element: &NodeId) -> Option<NodeId> {
        self.tree.parent(*element)
    }

    fn previous_sibling_of(&self, element: &NodeId) -> Option<NodeId> {
        self.tree.prev_sibling(*element)
    }

    fn node_kind_of(&self, element: &NodeId) -> NodeKind {
        match self.tree.node_type(*element) {
            Some(NodeType::Window) => NodeKind::Window,
            Some(NodeType::Document) => NodeKind::Document,
            Some(NodeType::DocumentType) => NodeKind::DocumentType,
            Some(NodeType::Element) => NodeKind::Element,
            Some(NodeType::Text) => NodeKind::Text,
            Some(NodeType::Comment) | None => NodeKind::Other,
        }
    }

    fn tag_name_of(&self, element: &NodeId) -> Option<&str> {
        self.tree.tag_name(*element)
    }

    fn document_metrics(&self) -> DocumentMetrics {
        DocumentMetrics {
            root: self.tree.document_element().and_then(|id| self.tree.metrics(id)).map(box_metrics),
            body: self.tree.body().and_then(|id| self.tree.metrics(id)).map(box_metrics),
        }
    }

    fn register_native_listener(&mut self, element: &NodeId, event_type: &str, listener: NativeListener, capture: bool) {
        self.listeners.add(*element, event_type, listener, capture);
    }

    fn unregister_native_listener(&mut self, element: &NodeId, event_type: &str, listener: NativeListener) {
        self.listeners.remove(*element, event_type, listener);
    }
}

impl<B: TopicBus<NodeId>> Router<DomHost, B> {
    /// Fire a native event at `target` and run every native listener in order
    pub fn dispatch(&mut self, target: NodeId, native: impl Into<NativeEvent<NodeId>>) -> Event<NodeId> {
        self.dispatch_with(target, native, true)
    }

    /// Like [`Router::dispatch`], choosing whether the event bubbles
    pub fn dispatch_with(&mut self, target: NodeId, native: impl Into<NativeEvent<NodeId>>, bubbles: bool) -> Event<NodeId> {
        let mut native = native.into();
        if let NativeEvent::Legacy(raw) = &mut native {
            if raw.target.is_none() && raw.src_element.is_none() {
                raw.target = Some(target);
            }
        }
        let mut event = self.normalize(native);
        let event_type = event.event_type.to_lowercase();
        let plan = self
            .host
            .listeners
            .plan(&self.host.tree, target, &event_type, bubbles);

        let mut previous = None;
        for step in plan {
            if event.is_immediate_propagation_stopped() {
                break;
            }
            if event.is_propagation_stopped() && previous != Some(step.node) {
                break;
            }
            previous = Some(step.node);
            let outcome = self.handle_native(&step.node, step.listener, &mut event);
            if self.config.debug {
                debug!(node = %step.node, phase = ?step.phase, outcome = ?outcome, "native listener fired");
            }
        }
        event
    }

    /// Native registrations on `element` for `event_type`
    pub fn native_listener_count(&self, element: NodeId, event_type: &str) -> usize {
        self.host.native_listener_count(element, event_type)
    }
}
