//! Augmentation
//!
//! Default fields merged into dispatched events. A field is only written when
//! the event does not already carry it, so the first writer always wins.
//! Two scopes exist: per-path augmentation kept by the registry for one
//! (element, event type) slot, and the router-wide [`Augmentations`] table
//! applied to every event of a type.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::Event;

/// Scope key matching every event type in [`Augmentations`]
pub const ALL_TYPES: &str = "*";

/// Value of an augmentation field: a plain default or a function of the event
pub enum FieldValue<E> {
    Value(Value),
    Function(Rc<dyn Fn(&Event<E>) -> Value>),
}

impl<E> FieldValue<E> {
    /// Wrap a function computing the field from the event it is read on
    pub fn function(f: impl Fn(&Event<E>) -> Value + 'static) -> Self {
        Self::Function(Rc::new(f))
    }

    /// Produce the value, evaluating functions against `event`
    pub fn evaluate(&self, event: &Event<E>) -> Value {
        match self {
            Self::Value(v) => v.clone(),
            Self::Function(f) => f(event),
        }
    }
}

impl<E> Clone for FieldValue<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(v) => Self::Value(v.clone()),
            Self::Function(f) => Self::Function(Rc::clone(f)),
        }
    }
}

impl<E> PartialEq for FieldValue<E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<E> fmt::Debug for FieldValue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Function(_) => f.write_str("<function>"),
        }
    }
}

impl<E> From<Value> for FieldValue<E> {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Named augmentation fields, kept in name order
pub struct Fields<E>(BTreeMap<String, FieldValue<E>>);

impl<E> Fields<E> {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder: add a plain value
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), FieldValue::Value(value.into()));
        self
    }

    /// Builder: add a function field
    pub fn with_fn(mut self, name: &str, f: impl Fn(&Event<E>) -> Value + 'static) -> Self {
        self.0.insert(name.to_string(), FieldValue::function(f));
        self
    }

    /// Insert or replace a field
    pub fn insert(&mut self, name: &str, value: FieldValue<E>) -> Option<FieldValue<E>> {
        self.0.insert(name.to_string(), value)
    }

    /// Insert a field only when absent; returns whether it was written
    pub fn insert_default(&mut self, name: &str, value: FieldValue<E>) -> bool {
        if self.0.contains_key(name) {
            return false;
        }
        self.0.insert(name.to_string(), value);
        true
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue<E>> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue<E>> {
        self.0.remove(name)
    }

    /// Merge `other` into `self` without overwriting existing keys
    pub fn merge_defaults(&mut self, other: &Fields<E>) -> usize {
        let mut written = 0;
        for (name, value) in other.iter() {
            if self.insert_default(name, value.clone()) {
                written += 1;
            }
        }
        written
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue<E>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<E> Default for Fields<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Fields<E> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<E> PartialEq for Fields<E> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<E> fmt::Debug for Fields<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

/// Router-wide default fields, keyed by event type or [`ALL_TYPES`]
///
/// Starts empty; only the router's augment operations change it, and it is
/// read once per dispatched event right after normalization.
pub struct Augmentations<E> {
    by_type: HashMap<String, Fields<E>>,
}

impl<E> Augmentations<E> {
    pub fn new() -> Self {
        Self { by_type: HashMap::new() }
    }

    /// Merge fields for an event type (first writer wins per field)
    pub fn augment(&mut self, event_type: &str, fields: &Fields<E>) -> usize {
        self.by_type
            .entry(event_type.to_lowercase())
            .or_default()
            .merge_defaults(fields)
    }

    /// Register one function field, named `name`, for every event type
    pub fn augment_fn(&mut self, name: &str, f: impl Fn(&Event<E>) -> Value + 'static) -> bool {
        self.by_type
            .entry(ALL_TYPES.to_string())
            .or_default()
            .insert_default(name, FieldValue::function(f))
    }

    /// Remove a field previously added for an event type (or [`ALL_TYPES`])
    pub fn remove(&mut self, event_type: &str, name: &str) -> bool {
        let key = event_type.to_lowercase();
        let Some(fields) = self.by_type.get_mut(&key) else {
            return false;
        };
        let removed = fields.remove(name).is_some();
        if fields.is_empty() {
            self.by_type.remove(&key);
        }
        removed
    }

    /// Fields registered for an exact scope key
    pub fn fields_for(&self, event_type: &str) -> Option<&Fields<E>> {
        self.by_type.get(&event_type.to_lowercase())
    }

    /// Apply type-specific fields, then the catch-all ones
    pub fn apply(&self, event: &mut Event<E>) {
        let ty = event.event_type.to_lowercase();
        for key in [ty.as_str(), ALL_TYPES] {
            if let Some(fields) = self.by_type.get(key) {
                event.apply_defaults(fields);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl<E> Default for Augmentations<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Augmentations<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.by_type.iter()).finish()
    }
}
