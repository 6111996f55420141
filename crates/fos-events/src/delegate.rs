//! Delegation router
//!
//! `delegate` installs one capturing native listener per event type at an
//! ancestor (the document unless told otherwise) and subscribes the handler
//! under the ancestor's topic. When that listener fires, the event is
//! published under the *target's* topic first, so handlers bound on the
//! concrete element see it through the same channel, and then under the
//! ancestor's topic, which is how delegated handlers reach descendants that
//! did not exist when `delegate` was called.

use tracing::debug;

use crate::bus::{Handler, TopicBus};
use crate::host::Host;
use crate::router::{DispatchOutcome, Router, SkipReason};
use crate::topic::{event_types, topic};
use crate::{Event, Result};

impl<H: Host, B: TopicBus<H::Element>> Router<H, B> {
    /// Subscribe `handler` at an ancestor for each listed event type
    pub fn delegate(&mut self, root: Option<&H::Element>, types: &str, handler: Handler<H::Element>) -> Result<()> {
        let root = root.cloned().unwrap_or_else(|| self.host.document());
        let capture = self.config.delegate_capture;
        for event_type in event_types(types) {
            let topic = self
                .registry
                .ensure_delegation(&mut self.host, &root, &event_type, capture)?;
            self.bus.on(&topic, handler.clone());
            if self.config.debug {
                debug!(topic = %topic, "delegated handler");
            }
        }
        Ok(())
    }

    /// Remove a delegated handler; the capture listener goes with the last one
    pub fn undelegate(&mut self, root: Option<&H::Element>, types: &str, handler: &Handler<H::Element>) {
        let root = root.cloned().unwrap_or_else(|| self.host.document());
        let Some(path) = self.registry.path(&root).map(str::to_owned) else {
            if self.config.debug {
                debug!(element = ?root, types, "undelegate ignored: element not registered");
            }
            return;
        };
        for event_type in event_types(types) {
            let topic = topic(&path, &event_type);
            self.bus.off(&topic, handler);
            self.release_if_idle(&root, &event_type, &topic);
        }
    }

    pub(crate) fn route_delegated(&self, root: &H::Element, event: &mut Event<H::Element>) -> DispatchOutcome {
        let event_type = event.event_type.to_lowercase();
        let Some(root_path) = self.registry.path(root) else {
            if self.config.debug {
                debug!(element = ?root, event_type = %event_type, "delegation ignored: root not registered");
            }
            return DispatchOutcome::Skipped(SkipReason::UnknownElement);
        };
        let target = event.target.clone();
        let Some(target_path) = self.registry.resolve_path(&self.host, &target) else {
            if self.config.debug {
                debug!(target = ?target, event_type = %event_type, "delegation ignored: target unresolvable");
            }
            return DispatchOutcome::Skipped(SkipReason::UnresolvableTarget);
        };

        let mut topics = 0;
        let mut handlers = 0;
        let target_topic = topic(&target_path, &event_type);
        if let Some(n) = self.publish(&target, &target_topic, &event_type, event) {
            topics += 1;
            handlers += n;
        }
        if target_path != root_path && !event.is_propagation_stopped() {
            let root_topic = topic(root_path, &event_type);
            if let Some(n) = self.publish(root, &root_topic, &event_type, event) {
                topics += 1;
                handlers += n;
            }
        }

        if topics == 0 {
            DispatchOutcome::Skipped(SkipReason::AlreadyDelivered)
        } else {
            DispatchOutcome::Delivered { topics, handlers }
        }
    }
}
