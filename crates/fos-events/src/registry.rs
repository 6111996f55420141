//! Registry and listener multiplexer
//!
//! One [`Entry`] per element that has ever been bound, delegated from or
//! augmented: its cached path, the event types it currently multiplexes,
//! and per-type augmentation. The registry is the only place that installs
//! or removes native listeners, which keeps every (element, event type,
//! listener kind) slot at zero or one native registration.
//!
//! Entries are keyed by the host's identity handle and never hold the host
//! node itself. Hosts that drop nodes call [`Registry::discard`] (through
//! [`Router::discard`](crate::Router::discard)) so entries do not outlive
//! their elements.

use std::collections::hash_map::Entry as MapEntry;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use tracing::debug;

use crate::augment::Fields;
use crate::host::{Host, NativeListener};
use crate::topic::topic;
use crate::{path, Result, RouteError};

/// Active native dispatch slot for one event type
#[derive(Debug, Clone)]
pub struct Slot<E> {
    /// Capture flag the native listener was installed with
    pub capture: bool,
    /// Defaults merged into every event dispatched on this topic
    pub augmentation: Fields<E>,
}

/// Bookkeeping for one element
#[derive(Debug, Clone)]
pub struct Entry<E> {
    path: String,
    slots: HashMap<String, Slot<E>>,
    delegated: HashSet<String>,
}

impl<E> Entry<E> {
    fn new(path: String) -> Self {
        Self {
            path,
            slots: HashMap::new(),
            delegated: HashSet::new(),
        }
    }

    /// Cached structural path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether a dispatch listener is installed for `event_type`
    pub fn is_multiplexed(&self, event_type: &str) -> bool {
        self.slots.contains_key(event_type)
    }

    pub fn multiplexed_types(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Whether a delegation listener is installed for `event_type`
    pub fn is_delegated(&self, event_type: &str) -> bool {
        self.delegated.contains(event_type)
    }

    pub fn delegated_types(&self) -> impl Iterator<Item = &str> {
        self.delegated.iter().map(String::as_str)
    }

    pub fn slot(&self, event_type: &str) -> Option<&Slot<E>> {
        self.slots.get(event_type)
    }

    /// Augmentation for `event_type`, if the type is multiplexed
    pub fn augmentation(&self, event_type: &str) -> Option<&Fields<E>> {
        self.slots.get(event_type).map(|s| &s.augmentation)
    }
}

/// Element → entry association
#[derive(Debug)]
pub struct Registry<E> {
    entries: HashMap<E, Entry<E>>,
    debug: bool,
}

impl<E: Clone + Eq + Hash + std::fmt::Debug> Registry<E> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            debug: false,
        }
    }

    pub(crate) fn set_debug(&mut self, on: bool) {
        self.debug = on;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, element: &E) -> Option<&Entry<E>> {
        self.entries.get(element)
    }

    pub fn contains(&self, element: &E) -> bool {
        self.entries.contains_key(element)
    }

    /// Cached path of a registered element
    pub fn path(&self, element: &E) -> Option<&str> {
        self.entries.get(element).map(Entry::path)
    }

    /// Cached path when registered, otherwise a fresh (uncached) resolution
    pub fn resolve_path<H: Host<Element = E> + ?Sized>(&self, host: &H, element: &E) -> Option<String> {
        match self.entries.get(element) {
            Some(entry) => Some(entry.path.clone()),
            None => path::resolve(host, element),
        }
    }

    /// Look up the entry for `element`, resolving and caching its path first
    pub fn map_element<H: Host<Element = E> + ?Sized>(&mut self, host: &H, element: &E) -> Result<&mut Entry<E>> {
        match self.entries.entry(element.clone()) {
            MapEntry::Occupied(entry) => Ok(entry.into_mut()),
            MapEntry::Vacant(slot) => {
                let path = path::resolve(host, element).ok_or_else(|| RouteError::unresolvable(element))?;
                if self.debug {
                    debug!(element = ?element, path = %path, "mapped element");
                }
                Ok(slot.insert(Entry::new(path)))
            }
        }
    }

    /// Make sure a dispatch listener exists for (element, type); returns the topic
    pub fn ensure_topic<H: Host<Element = E> + ?Sized>(
        &mut self,
        host: &mut H,
        element: &E,
        event_type: &str,
        capture: bool,
    ) -> Result<String> {
        let debug = self.debug;
        let entry = self.map_element(&*host, element)?;
        let topic = topic(&entry.path, event_type);
        if !entry.slots.contains_key(event_type) {
            host.register_native_listener(element, event_type, NativeListener::Dispatch, capture);
            entry.slots.insert(
                event_type.to_string(),
                Slot {
                    capture,
                    augmentation: Fields::new(),
                },
            );
            if debug {
                debug!(topic = %topic, capture, "attached native listener");
            }
        }
        Ok(topic)
    }

    /// Remove the dispatch listener for (element, type), dropping its augmentation
    pub fn release_topic<H: Host<Element = E> + ?Sized>(&mut self, host: &mut H, element: &E, event_type: &str) -> bool {
        let Some(entry) = self.entries.get_mut(element) else {
            return false;
        };
        if entry.slots.remove(event_type).is_none() {
            return false;
        }
        host.unregister_native_listener(element, event_type, NativeListener::Dispatch);
        if self.debug {
            debug!(topic = %topic(&entry.path, event_type), "detached native listener");
        }
        true
    }

    /// Merge augmentation into an active slot; first writer wins per field
    pub fn merge_augmentation(&mut self, element: &E, event_type: &str, fields: &Fields<E>) -> usize {
        self.entries
            .get_mut(element)
            .and_then(|entry| entry.slots.get_mut(event_type))
            .map(|slot| slot.augmentation.merge_defaults(fields))
            .unwrap_or(0)
    }

    /// Ensure the topic, then merge augmentation into it
    pub fn augment<H: Host<Element = E> + ?Sized>(
        &mut self,
        host: &mut H,
        element: &E,
        event_type: &str,
        fields: &Fields<E>,
        capture: bool,
    ) -> Result<String> {
        let topic = self.ensure_topic(host, element, event_type, capture)?;
        let written = self.merge_augmentation(element, event_type, fields);
        if self.debug {
            debug!(topic = %topic, written, "augmented topic");
        }
        Ok(topic)
    }

    /// Make sure a delegation listener exists at `root` for a type; returns the root topic
    pub fn ensure_delegation<H: Host<Element = E> + ?Sized>(
        &mut self,
        host: &mut H,
        root: &E,
        event_type: &str,
        capture: bool,
    ) -> Result<String> {
        let debug = self.debug;
        let entry = self.map_element(&*host, root)?;
        let topic = topic(&entry.path, event_type);
        if entry.delegated.insert(event_type.to_string()) {
            host.register_native_listener(root, event_type, NativeListener::Delegate, capture);
            if debug {
                debug!(topic = %topic, capture, "attached delegation listener");
            }
        }
        Ok(topic)
    }

    /// Remove the delegation listener at `root` for a type
    pub fn release_delegation<H: Host<Element = E> + ?Sized>(&mut self, host: &mut H, root: &E, event_type: &str) -> bool {
        let Some(entry) = self.entries.get_mut(root) else {
            return false;
        };
        if !entry.delegated.remove(event_type) {
            return false;
        }
        host.unregister_native_listener(root, event_type, NativeListener::Delegate);
        if self.debug {
            debug!(topic = %topic(&entry.path, event_type), "detached delegation listener");
        }
        true
    }

    /// Re-resolve a path after the tree changed
    ///
    /// Returns the previous path (if the element was registered) and the new
    /// one. On failure the cached entry is left untouched.
    pub fn refresh<H: Host<Element = E> + ?Sized>(&mut self, host: &H, element: &E) -> Result<(Option<String>, String)> {
        let fresh = path::resolve(host, element).ok_or_else(|| RouteError::unresolvable(element))?;
        let previous = match self.entries.get_mut(element) {
            Some(entry) => Some(std::mem::replace(&mut entry.path, fresh.clone())),
            None => {
                self.entries.insert(element.clone(), Entry::new(fresh.clone()));
                None
            }
        };
        if self.debug {
            debug!(element = ?element, previous = ?previous, path = %fresh, "refreshed path");
        }
        Ok((previous, fresh))
    }

    /// Forget an element, removing every native listener installed for it
    pub fn discard<H: Host<Element = E> + ?Sized>(&mut self, host: &mut H, element: &E) -> bool {
        let Some(entry) = self.entries.remove(element) else {
            return false;
        };
        for event_type in entry.slots.keys() {
            host.unregister_native_listener(element, event_type, NativeListener::Dispatch);
        }
        for event_type in &entry.delegated {
            host.unregister_native_listener(element, event_type, NativeListener::Delegate);
        }
        if self.debug {
            debug!(element = ?element, path = %entry.path, "discarded element");
        }
        true
    }
}

impl<E: Clone + Eq + Hash + std::fmt::Debug> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}
