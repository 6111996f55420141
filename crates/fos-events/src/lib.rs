//! fOS Events - path-keyed event routing
//!
//! A publish/subscribe layer between a host element tree's native event
//! dispatch and application handlers. Subscriptions are addressed by
//! structural path and event type (`/html/body/div<click>`) instead of by
//! element reference:
//!
//! - [`path`] derives a structural path for an element that carries no
//!   identity of its own.
//! - [`Registry`] multiplexes any number of handlers onto at most one native
//!   listener per (element, event type).
//! - [`normalize()`] turns heterogeneous native payloads into one [`Event`].
//! - [`Router::delegate`] routes ancestor-level subscriptions to descendants,
//!   including ones added later.
//!
//! # Example
//! ```rust
//! use fos_dom::{DomTree, NodeId};
//! use fos_events::{DomHost, Event, Handler, RawEvent, Router};
//!
//! let mut tree = DomTree::new();
//! let html = tree.create_element("html");
//! let body = tree.create_element("body");
//! tree.append_child(tree.root(), html).unwrap();
//! tree.append_child(html, body).unwrap();
//!
//! let mut router = Router::new(DomHost::new(tree));
//! let handler = Handler::new(|e: &mut Event<NodeId>| e.prevent_default());
//! router.bind(&body, "click", handler, false).unwrap();
//! assert_eq!(router.path(&body), Some("/html/body"));
//!
//! let event = router.dispatch(body, RawEvent::new("click"));
//! assert!(event.is_default_prevented());
//! ```

pub mod augment;
pub mod bus;
pub mod config;
mod delegate;
pub mod error;
pub mod event;
pub mod host;
pub mod normalize;
pub mod path;
pub mod registry;
mod router;
pub mod topic;
pub mod adapters;

pub use augment::{Augmentations, FieldValue, Fields, ALL_TYPES};
pub use bus::{Emitter, Handler, TopicBus};
pub use config::RouterConfig;
pub use error::{Result, RouteError};
pub use event::{Event, NativeEvent, RawEvent};
pub use host::{BoxMetrics, DocumentMetrics, Host, NativeListener, NodeKind};
pub use normalize::normalize;
pub use registry::{Entry, Registry, Slot};
pub use router::{DispatchOutcome, Router, SkipReason, Subscription};

#[cfg(feature = "dom")]
pub use adapters::dom::DomHost;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
