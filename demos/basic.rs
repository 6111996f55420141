//! Example: path-keyed event routing over an fOS DOM tree
//!
//! Run with `RUST_LOG=debug` to see the router's lifecycle traces.

use std::cell::Cell;
use std::rc::Rc;

use fos_dom::{BoxMetrics, DomTree, NodeId};
use fos_events::{DomHost, Event, Fields, Handler, RawEvent, Router, RouterConfig, Subscription};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree = DomTree::new();
    let html = tree.create_element("html");
    let body = tree.create_element("body");
    let nav = tree.create_element("nav");
    let button = tree.create_element("button");
    tree.append_child(tree.root(), html)?;
    tree.append_child(html, body)?;
    tree.append_child(body, nav)?;
    tree.append_child(nav, button)?;
    tree.set_metrics(html, BoxMetrics::scrolled(0.0, 120.0))?;

    let config = RouterConfig::from_json(r#"{ "debug": true }"#)?;
    let mut router = Router::with_config(DomHost::new(tree), config);

    let clicks = Rc::new(Cell::new(0));
    let counter = Rc::clone(&clicks);
    let on_click = Handler::new(move |e: &mut Event<NodeId>| {
        counter.set(counter.get() + 1);
        println!("click at page ({:?}, {:?}) source={:?}", e.page_x, e.page_y, e.value("source"));
    });
    let subscription = Subscription::augmented(Fields::new().with("source", "toolbar")).with_listener(on_click.clone());
    router.bind(&button, "click", subscription, false)?;
    println!("button path: {}", router.path(&button).unwrap_or("<unresolved>"));

    router.delegate(None, "click", Handler::new(|e: &mut Event<NodeId>| {
        println!("delegated click, target {}", e.target);
    }))?;

    // A button added after delegation is still routed.
    let late = router.host_mut().tree_mut().create_element("button");
    router.host_mut().tree_mut().append_child(nav, late)?;

    router.dispatch(button, RawEvent::new("click").client(10.0, 20.0).button(1));
    router.dispatch(late, RawEvent::new("click"));

    router.unbind(&button, "click", &on_click);
    router.dispatch(button, RawEvent::new("click"));

    println!("element handler ran {} time(s)", clicks.get());
    Ok(())
}
