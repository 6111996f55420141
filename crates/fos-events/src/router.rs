//! Router - public API
//!
//! Ties the pieces together: the [`Registry`] owns native listener slots,
//! the [`TopicBus`] owns handlers, and every native firing flows through
//! [`Router::handle_native`] → normalization → augmentation → emission.

use serde_json::Value;
use tracing::debug;

use crate::augment::{Augmentations, Fields};
use crate::bus::{Emitter, Handler, TopicBus};
use crate::config::RouterConfig;
use crate::host::{Host, NativeListener};
use crate::normalize::normalize;
use crate::registry::Registry;
use crate::topic::{event_types, topic};
use crate::{Event, NativeEvent, Result};

/// What a subscription call registers
///
/// Either a plain handler, or an augmentation record: default fields for
/// the topic plus an optional handler.
#[derive(Debug, Clone)]
pub enum Subscription<E> {
    Handler(Handler<E>),
    Augmented {
        listener: Option<Handler<E>>,
        fields: Fields<E>,
    },
}

impl<E> Subscription<E> {
    /// Augmentation record without a handler
    pub fn augmented(fields: Fields<E>) -> Self {
        Self::Augmented { listener: None, fields }
    }

    /// Attach the handler to an augmentation record
    pub fn with_listener(self, handler: Handler<E>) -> Self {
        match self {
            Self::Handler(_) => Self::Handler(handler),
            Self::Augmented { fields, .. } => Self::Augmented {
                listener: Some(handler),
                fields,
            },
        }
    }

    /// The handler passed on to the bus, if any
    pub fn listener(&self) -> Option<&Handler<E>> {
        match self {
            Self::Handler(h) => Some(h),
            Self::Augmented { listener, .. } => listener.as_ref(),
        }
    }
}

impl<E> From<Handler<E>> for Subscription<E> {
    fn from(handler: Handler<E>) -> Self {
        Self::Handler(handler)
    }
}

/// Why a native firing produced no emission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The element has no registry entry (torn down while events were queued)
    UnknownElement,
    /// A delegated event's target is not connected to the document
    UnresolvableTarget,
    /// Every topic this firing maps to already received the event
    AlreadyDelivered,
}

/// Result of handling one native listener invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered { topics: usize, handlers: usize },
    Skipped(SkipReason),
}

impl DispatchOutcome {
    /// Handlers invoked, zero when skipped
    pub fn handlers(&self) -> usize {
        match self {
            Self::Delivered { handlers, .. } => *handlers,
            Self::Skipped(_) => 0,
        }
    }
}

/// Path-keyed event router over a host tree
pub struct Router<H: Host, B = Emitter<<H as Host>::Element>> {
    pub(crate) host: H,
    pub(crate) bus: B,
    pub(crate) registry: Registry<H::Element>,
    pub(crate) augmentations: Augmentations<H::Element>,
    pub(crate) config: RouterConfig,
}

impl<H: Host> Router<H> {
    /// Router with the default emitter and configuration
    pub fn new(host: H) -> Self {
        Self::with_config(host, RouterConfig::default())
    }

    pub fn with_config(host: H, config: RouterConfig) -> Self {
        Self::with_bus(host, Emitter::new(), config)
    }
}

impl<H: Host, B: TopicBus<H::Element>> Router<H, B> {
    /// Router over a caller-supplied bus
    pub fn with_bus(host: H, bus: B, config: RouterConfig) -> Self {
        let mut registry = Registry::new();
        registry.set_debug(config.debug);
        Self {
            host,
            bus,
            registry,
            augmentations: Augmentations::new(),
            config,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Direct host access, e.g. for tree mutation or raw native listeners
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn registry(&self) -> &Registry<H::Element> {
        &self.registry
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Toggle lifecycle tracing
    pub fn debug(&mut self, on: bool) {
        self.config.debug = on;
        self.registry.set_debug(on);
    }

    /// Subscribe to each event type in a whitespace-separated list
    ///
    /// The first subscription for an (element, type) pair installs the one
    /// native listener for it; later ones only add handlers to the topic.
    pub fn bind(
        &mut self,
        element: &H::Element,
        types: &str,
        subscription: impl Into<Subscription<H::Element>>,
        capture: bool,
    ) -> Result<()> {
        let subscription = subscription.into();
        for event_type in event_types(types) {
            let topic = self
                .registry
                .ensure_topic(&mut self.host, element, &event_type, capture)?;
            if let Subscription::Augmented { fields, .. } = &subscription {
                let written = self.registry.merge_augmentation(element, &event_type, fields);
                if self.config.debug {
                    debug!(topic = %topic, written, "augmented topic");
                }
            }
            if let Some(handler) = subscription.listener() {
                self.bus.on(&topic, handler.clone());
                if self.config.debug {
                    debug!(topic = %topic, "bound handler");
                }
            }
        }
        Ok(())
    }

    /// Remove a handler bound with [`Router::bind`]
    ///
    /// Unknown elements are ignored. When a topic runs out of handlers its
    /// native listener is removed.
    pub fn unbind(&mut self, element: &H::Element, types: &str, handler: &Handler<H::Element>) {
        let Some(path) = self.registry.path(element).map(str::to_owned) else {
            if self.config.debug {
                debug!(element = ?element, types, "unbind ignored: element not registered");
            }
            return;
        };
        for event_type in event_types(types) {
            let topic = topic(&path, &event_type);
            self.bus.off(&topic, handler);
            if self.config.debug {
                debug!(topic = %topic, remaining = self.bus.listeners(&topic).len(), "unbound handler");
            }
            self.release_if_idle(element, &event_type, &topic);
        }
    }

    /// Drop every native listener for (element, type) once its topic is empty
    ///
    /// `bind` and `delegate` on the same element share one topic, so either
    /// teardown releases both listener kinds.
    pub(crate) fn release_if_idle(&mut self, element: &H::Element, event_type: &str, topic: &str) {
        if !self.config.release_empty_topics || self.bus.has_listeners(topic) {
            return;
        }
        self.registry.release_topic(&mut self.host, element, event_type);
        self.registry.release_delegation(&mut self.host, element, event_type);
    }

    /// Cached path of a registered element
    pub fn path(&self, element: &H::Element) -> Option<&str> {
        self.registry.path(element)
    }

    /// Add router-wide default fields for an event type (or `"*"`)
    pub fn augment(&mut self, event_type: &str, fields: Fields<H::Element>) {
        let written = self.augmentations.augment(event_type, &fields);
        if self.config.debug {
            debug!(event_type, written, "global augmentation");
        }
    }

    /// Add one router-wide function field, named `name`, for every event type
    pub fn augment_fn(&mut self, name: &str, f: impl Fn(&Event<H::Element>) -> Value + 'static) -> bool {
        let added = self.augmentations.augment_fn(name, f);
        if self.config.debug {
            debug!(name, added, "global function augmentation");
        }
        added
    }

    /// Remove a router-wide field
    pub fn remove_augmentation(&mut self, event_type: &str, name: &str) -> bool {
        let removed = self.augmentations.remove(event_type, name);
        if self.config.debug {
            debug!(event_type, name, removed, "removed global augmentation");
        }
        removed
    }

    /// Per-path augmentation without subscribing a handler
    pub fn augment_element(&mut self, element: &H::Element, types: &str, fields: Fields<H::Element>) -> Result<()> {
        self.bind(element, types, Subscription::augmented(fields), false)
    }

    /// Normalize a native payload and apply router-wide augmentation
    pub fn normalize(&self, native: impl Into<NativeEvent<H::Element>>) -> Event<H::Element> {
        let mut event = normalize(native.into(), &self.host.document(), &self.host.document_metrics());
        self.augmentations.apply(&mut event);
        event
    }

    /// Entry point for hosts: a native listener installed by this router fired
    ///
    /// `current` is the element the native listener is registered on and
    /// `event` the canonical event for this physical dispatch; hosts reuse
    /// the same event for every listener of one dispatch.
    pub fn handle_native(
        &mut self,
        current: &H::Element,
        listener: NativeListener,
        event: &mut Event<H::Element>,
    ) -> DispatchOutcome {
        match listener {
            NativeListener::Dispatch => self.dispatch_at(current, event),
            NativeListener::Delegate => self.route_delegated(current, event),
        }
    }

    fn dispatch_at(&self, current: &H::Element, event: &mut Event<H::Element>) -> DispatchOutcome {
        let event_type = event.event_type.to_lowercase();
        let Some(path) = self.registry.path(current) else {
            if self.config.debug {
                debug!(element = ?current, event_type = %event_type, "dispatch ignored: element not registered");
            }
            return DispatchOutcome::Skipped(SkipReason::UnknownElement);
        };
        let topic = topic(path, &event_type);
        match self.publish(current, &topic, &event_type, event) {
            Some(handlers) => DispatchOutcome::Delivered { topics: 1, handlers },
            None => DispatchOutcome::Skipped(SkipReason::AlreadyDelivered),
        }
    }

    /// Emit on `topic` unless this event already went there
    ///
    /// `owner` supplies per-path augmentation and becomes the current target.
    pub(crate) fn publish(
        &self,
        owner: &H::Element,
        topic: &str,
        event_type: &str,
        event: &mut Event<H::Element>,
    ) -> Option<usize> {
        if event.was_delivered(topic) {
            if self.config.debug {
                debug!(topic, "already delivered");
            }
            return None;
        }
        if let Some(fields) = self.registry.get(owner).and_then(|e| e.augmentation(event_type)) {
            event.apply_defaults(fields);
        }
        event.mark_delivered(topic);
        let handlers = self.bus.emit(owner, topic, event);
        if self.config.debug {
            debug!(topic, handlers, "dispatched");
        }
        Some(handlers)
    }

    /// Re-resolve an element's path after a structural change
    ///
    /// Handlers registered under the element's old topics move to the new ones.
    pub fn refresh(&mut self, element: &H::Element) -> Result<String> {
        let (previous, fresh) = self.registry.refresh(&self.host, element)?;
        let Some(previous) = previous.filter(|p| *p != fresh) else {
            return Ok(fresh);
        };
        let mut types: Vec<String> = Vec::new();
        if let Some(entry) = self.registry.get(element) {
            for event_type in entry.multiplexed_types().chain(entry.delegated_types()) {
                if !types.iter().any(|t| t == event_type) {
                    types.push(event_type.to_string());
                }
            }
        }
        for event_type in types {
            let from = topic(&previous, &event_type);
            let to = topic(&fresh, &event_type);
            for handler in self.bus.listeners(&from) {
                self.bus.off(&from, &handler);
                self.bus.on(&to, handler);
            }
            if self.config.debug {
                debug!(from = %from, to = %to, "moved topic");
            }
        }
        Ok(fresh)
    }

    /// Lifecycle hook: the host dropped `element` for good
    pub fn discard(&mut self, element: &H::Element) -> bool {
        self.registry.discard(&mut self.host, element)
    }
}
