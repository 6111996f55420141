//! Events
//!
//! [`RawEvent`] mirrors what a legacy host hands over: optional, partly
//! redundant fields. [`Event`] is the canonical record handlers see. A host
//! that already produces canonical events passes them as
//! [`NativeEvent::Compliant`] and normalization leaves them untouched.

use serde_json::Value;

use crate::augment::{FieldValue, Fields};

/// Names of the canonical fields; augmentation never writes these
pub const CANONICAL_FIELDS: &[&str] = &[
    "type",
    "target",
    "relatedTarget",
    "currentTarget",
    "clientX",
    "clientY",
    "pageX",
    "pageY",
    "which",
    "button",
    "wheelDelta",
    "preventDefault",
    "stopPropagation",
    "stopImmediatePropagation",
    "isDefaultPrevented",
    "isPropagationStopped",
    "isImmediatePropagationStopped",
];

/// Legacy native event payload
#[derive(Debug, Clone)]
pub struct RawEvent<E> {
    pub event_type: String,
    pub target: Option<E>,
    /// Alternate target field used by older hosts
    pub src_element: Option<E>,
    pub from_element: Option<E>,
    pub to_element: Option<E>,
    pub client_x: Option<f64>,
    pub client_y: Option<f64>,
    pub char_code: Option<u32>,
    pub key_code: Option<u32>,
    /// Legacy button bit pattern (1 primary, 4 middle, 2 secondary)
    pub button: Option<u16>,
    pub wheel_delta: Option<f64>,
    pub detail: Option<f64>,
    /// Any other own properties; copied as-is
    pub fields: Fields<E>,
}

impl<E> RawEvent<E> {
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            target: None,
            src_element: None,
            from_element: None,
            to_element: None,
            client_x: None,
            client_y: None,
            char_code: None,
            key_code: None,
            button: None,
            wheel_delta: None,
            detail: None,
            fields: Fields::new(),
        }
    }

    pub fn target(mut self, target: E) -> Self {
        self.target = Some(target);
        self
    }

    pub fn src_element(mut self, element: E) -> Self {
        self.src_element = Some(element);
        self
    }

    pub fn from_to(mut self, from: Option<E>, to: Option<E>) -> Self {
        self.from_element = from;
        self.to_element = to;
        self
    }

    pub fn client(mut self, x: f64, y: f64) -> Self {
        self.client_x = Some(x);
        self.client_y = Some(y);
        self
    }

    pub fn char_code(mut self, code: u32) -> Self {
        self.char_code = Some(code);
        self
    }

    pub fn key_code(mut self, code: u32) -> Self {
        self.key_code = Some(code);
        self
    }

    pub fn button(mut self, bits: u16) -> Self {
        self.button = Some(bits);
        self
    }

    pub fn wheel_delta(mut self, delta: f64) -> Self {
        self.wheel_delta = Some(delta);
        self
    }

    pub fn detail(mut self, detail: f64) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name, FieldValue::Value(value.into()));
        self
    }
}

/// Canonical event record
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    pub event_type: String,
    pub target: E,
    pub related_target: Option<E>,
    /// Element the current emission is running for
    pub current_target: Option<E>,
    pub client_x: Option<f64>,
    pub client_y: Option<f64>,
    /// Document-relative pointer position
    pub page_x: Option<f64>,
    pub page_y: Option<f64>,
    /// Normalized key code
    pub which: u32,
    /// 0 primary, 1 middle, 2 secondary
    pub button: u8,
    pub wheel_delta: f64,
    /// Copied and augmented fields
    pub fields: Fields<E>,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
    delivered: Vec<String>,
}

impl<E> Event<E> {
    /// Create a canonical event with neutral defaults
    pub fn new(event_type: &str, target: E) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            related_target: None,
            current_target: None,
            client_x: None,
            client_y: None,
            page_x: None,
            page_y: None,
            which: 0,
            button: 0,
            wheel_delta: 0.0,
            fields: Fields::new(),
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
            delivered: Vec::new(),
        }
    }

    /// Stop the host's default action
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop propagation to further elements
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation and skip the remaining handlers of this emission
    pub fn stop_immediate_propagation(&mut self) {
        self.immediate_propagation_stopped = true;
        self.stop_propagation();
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }

    /// Raw field lookup
    pub fn field(&self, name: &str) -> Option<&FieldValue<E>> {
        self.fields.get(name)
    }

    /// Field value, with function fields evaluated against this event
    pub fn value(&self, name: &str) -> Option<Value> {
        self.fields.get(name).map(|v| v.evaluate(self))
    }

    /// Whether the event already carries `name`, canonically or as a field
    pub fn has_field(&self, name: &str) -> bool {
        CANONICAL_FIELDS.contains(&name) || self.fields.contains(name)
    }

    /// Merge default fields; existing fields are never overwritten
    pub fn apply_defaults(&mut self, defaults: &Fields<E>) -> usize {
        let mut written = 0;
        for (name, value) in defaults.iter() {
            if !self.has_field(name) {
                self.fields.insert(name, value.clone());
                written += 1;
            }
        }
        written
    }

    pub(crate) fn was_delivered(&self, topic: &str) -> bool {
        self.delivered.iter().any(|t| t == topic)
    }

    pub(crate) fn mark_delivered(&mut self, topic: &str) {
        self.delivered.push(topic.to_string());
    }

    /// Topics this event has been emitted on, in order
    pub fn delivered_topics(&self) -> &[String] {
        &self.delivered
    }
}

/// Input to normalization
#[derive(Debug, Clone)]
pub enum NativeEvent<E> {
    /// Legacy payload that needs normalizing
    Legacy(RawEvent<E>),
    /// Event that already exposes the canonical capabilities
    Compliant(Event<E>),
}

impl<E> From<RawEvent<E>> for NativeEvent<E> {
    fn from(raw: RawEvent<E>) -> Self {
        Self::Legacy(raw)
    }
}

impl<E> From<Event<E>> for NativeEvent<E> {
    fn from(event: Event<E>) -> Self {
        Self::Compliant(event)
    }
}
