//! Routing over a hand-built host and a recording bus
//!
//! The host here drives native dispatch itself: it stores the listener
//! tokens the router registers and feeds them back through
//! `Router::handle_native`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use fos_events::{
    DispatchOutcome, Emitter, Event, Handler, Host, NativeListener, NodeKind, RawEvent, Router, RouterConfig,
    TopicBus,
};

#[derive(Default)]
struct Node {
    kind: Option<NodeKind>,
    tag: Option<&'static str>,
    parent: Option<&'static str>,
    prev: Option<&'static str>,
}

#[derive(Default)]
struct TableHost {
    nodes: HashMap<&'static str, Node>,
    natives: Vec<(&'static str, String, NativeListener, bool)>,
}

impl TableHost {
    fn page() -> Self {
        let mut host = Self::default();
        host.node("window", NodeKind::Window, None, None, None);
        host.node("document", NodeKind::Document, None, None, None);
        host.node("html", NodeKind::Element, Some("HTML"), Some("document"), None);
        host.node("body", NodeKind::Element, Some("BODY"), Some("html"), None);
        host.node("item1", NodeKind::Element, Some("LI"), Some("body"), None);
        host.node("note", NodeKind::Text, None, Some("body"), Some("item1"));
        host.node("item2", NodeKind::Element, Some("li"), Some("body"), Some("note"));
        host
    }

    fn node(
        &mut self,
        id: &'static str,
        kind: NodeKind,
        tag: Option<&'static str>,
        parent: Option<&'static str>,
        prev: Option<&'static str>,
    ) {
        self.nodes.insert(
            id,
            Node {
                kind: Some(kind),
                tag,
                parent,
                prev,
            },
        );
    }

    fn natives_on(&self, id: &str) -> usize {
        self.natives.iter().filter(|(el, ..)| *el == id).count()
    }
}

impl Host for TableHost {
    type Element = &'static str;

    fn window(&self) -> &'static str {
        "window"
    }

    fn document(&self) -> &'static str {
        "document"
    }

    fn parent_of(&self, element: &&'static str) -> Option<&'static str> {
        self.nodes.get(element)?.parent
    }

    fn previous_sibling_of(&self, element: &&'static str) -> Option<&'static str> {
        self.nodes.get(element)?.prev
    }

    fn node_kind_of(&self, element: &&'static str) -> NodeKind {
        self.nodes
            .get(element)
            .and_then(|n| n.kind)
            .unwrap_or(NodeKind::Other)
    }

    fn tag_name_of(&self, element: &&'static str) -> Option<&str> {
        self.nodes.get(element)?.tag
    }

    fn register_native_listener(&mut self, element: &&'static str, event_type: &str, listener: NativeListener, capture: bool) {
        self.natives.push((*element, event_type.to_string(), listener, capture));
    }

    fn unregister_native_listener(&mut self, element: &&'static str, event_type: &str, listener: NativeListener) {
        self.natives
            .retain(|(el, ty, l, _)| !(el == element && ty == event_type && *l == listener));
    }
}

/// Emitter wrapper that records every emitted topic
#[derive(Default)]
struct RecordingBus {
    inner: Emitter<&'static str>,
    emitted: RefCell<Vec<String>>,
}

impl TopicBus<&'static str> for RecordingBus {
    fn on(&mut self, topic: &str, handler: Handler<&'static str>) {
        self.inner.on(topic, handler);
    }

    fn off(&mut self, topic: &str, handler: &Handler<&'static str>) -> bool {
        self.inner.off(topic, handler)
    }

    fn emit(&self, target: &&'static str, topic: &str, event: &mut Event<&'static str>) -> usize {
        self.emitted.borrow_mut().push(topic.to_string());
        self.inner.emit(target, topic, event)
    }

    fn listeners(&self, topic: &str) -> Vec<Handler<&'static str>> {
        self.inner.listeners(topic)
    }

    fn has_listeners(&self, topic: &str) -> bool {
        self.inner.has_listeners(topic)
    }
}

#[test]
fn test_paths_over_custom_host() {
    let mut router = Router::new(TableHost::page());
    let h = Handler::new(|_: &mut Event<&'static str>| {});
    router.bind(&"item1", "click", h.clone(), false).unwrap();
    router.bind(&"item2", "click", h.clone(), false).unwrap();
    router.bind(&"document", "click", h.clone(), false).unwrap();
    router.bind(&"window", "load", h, false).unwrap();

    assert_eq!(router.path(&"item1"), Some("/html/body/li"));
    assert_eq!(router.path(&"item2"), Some("/html/body/li[2]"));
    assert_eq!(router.path(&"document"), Some("/"));
    assert_eq!(router.path(&"window"), Some(""));
    assert!(router.bind(&"note", "click", Handler::new(|_: &mut Event<&'static str>| {}), false).is_err());
}

#[test]
fn test_native_listener_tokens_round_trip() {
    let mut router = Router::new(TableHost::page());
    let count = Rc::new(RefCell::new(0));
    let c = Rc::clone(&count);
    let h = Handler::new(move |_: &mut Event<&'static str>| *c.borrow_mut() += 1);
    router.bind(&"item2", "click", h.clone(), true).unwrap();
    router.bind(&"item2", "click", h.clone(), true).unwrap();

    assert_eq!(router.host().natives_on("item2"), 1);
    let (_, _, listener, capture) = router.host().natives[0].clone();
    assert_eq!(listener, NativeListener::Dispatch);
    assert!(capture);

    let mut event = router.normalize(RawEvent::new("CLICK").target("item2"));
    let outcome = router.handle_native(&"item2", listener, &mut event);
    assert_eq!(outcome, DispatchOutcome::Delivered { topics: 1, handlers: 2 });
    assert_eq!(*count.borrow(), 2);

    router.unbind(&"item2", "click", &h);
    assert_eq!(router.host().natives_on("item2"), 1);
    router.unbind(&"item2", "click", &h);
    assert_eq!(router.host().natives_on("item2"), 0);
}

#[test]
fn test_custom_bus_sees_delegated_topics() {
    let config = RouterConfig {
        delegate_capture: false,
        ..RouterConfig::default()
    };
    let mut router = Router::with_bus(TableHost::page(), RecordingBus::default(), config);
    router
        .delegate(Some(&"body"), "keyup", Handler::new(|_: &mut Event<&'static str>| {}))
        .unwrap();
    assert!(router.host().natives.iter().any(|(el, ty, l, capture)| {
        *el == "body" && ty == "keyup" && *l == NativeListener::Delegate && !capture
    }));

    let mut event = router.normalize(RawEvent::new("keyup").src_element("item1").key_code(13));
    assert_eq!(event.which, 13);
    let outcome = router.handle_native(&"body", NativeListener::Delegate, &mut event);
    assert_eq!(outcome.handlers(), 1);
    assert_eq!(
        *router.bus().emitted.borrow(),
        vec!["/html/body/li<keyup>".to_string(), "/html/body<keyup>".to_string()]
    );

    let again = router.handle_native(&"body", NativeListener::Delegate, &mut event);
    assert_eq!(again, DispatchOutcome::Skipped(fos_events::SkipReason::AlreadyDelivered));
}
