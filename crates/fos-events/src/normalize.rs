//! Normalizer
//!
//! Turns a [`NativeEvent`] into the canonical [`Event`]. Pure: the only
//! inputs are the payload, the document handle used as fallback target, and
//! the document's scroll metrics.

use crate::host::{BoxMetrics, DocumentMetrics};
use crate::{Event, NativeEvent, RawEvent};

/// Legacy wheel `detail` is in lines; one line is 40 delta units
pub const WHEEL_DETAIL_SCALE: f64 = 40.0;

/// Normalize a native event
///
/// Compliant events are returned unchanged, which makes the function
/// idempotent: feeding its output back in yields the same record.
pub fn normalize<E: Clone + PartialEq>(
    native: NativeEvent<E>,
    document: &E,
    metrics: &DocumentMetrics,
) -> Event<E> {
    match native {
        NativeEvent::Compliant(event) => event,
        NativeEvent::Legacy(raw) => from_raw(raw, document, metrics),
    }
}

fn from_raw<E: Clone + PartialEq>(raw: RawEvent<E>, document: &E, metrics: &DocumentMetrics) -> Event<E> {
    let target = raw
        .target
        .or(raw.src_element)
        .unwrap_or_else(|| document.clone());
    let related_target = related_target(&target, raw.from_element, raw.to_element);

    let mut event = Event::new(&raw.event_type, target);
    event.related_target = related_target;
    event.client_x = raw.client_x;
    event.client_y = raw.client_y;
    if let Some(x) = raw.client_x {
        event.page_x = Some(x + scroll_offset(metrics, |m| m.scroll_left) - scroll_offset(metrics, |m| m.client_left));
    }
    if let Some(y) = raw.client_y {
        event.page_y = Some(y + scroll_offset(metrics, |m| m.scroll_top) - scroll_offset(metrics, |m| m.client_top));
    }
    event.which = key_code(raw.char_code, raw.key_code);
    event.button = button(raw.button);
    event.wheel_delta = wheel_delta(raw.wheel_delta, raw.detail);
    event.fields = raw.fields;
    event
}

/// "from" when the target is not the "from" element, otherwise "to"
pub fn related_target<E: PartialEq>(target: &E, from: Option<E>, to: Option<E>) -> Option<E> {
    if from.as_ref() == Some(target) { to } else { from }
}

/// Document element metric, then body metric, then zero; zero counts as unset
fn scroll_offset(metrics: &DocumentMetrics, pick: impl Fn(&BoxMetrics) -> f64) -> f64 {
    [metrics.root, metrics.body]
        .into_iter()
        .flatten()
        .map(|m| pick(&m))
        .find(|v| *v != 0.0)
        .unwrap_or(0.0)
}

/// Character code, falling back to the key code
pub fn key_code(char_code: Option<u32>, key_code: Option<u32>) -> u32 {
    match char_code {
        Some(code) if code != 0 => code,
        _ => key_code.unwrap_or(0),
    }
}

/// Legacy button bits to 0 primary / 1 middle / 2 secondary
pub fn button(bits: Option<u16>) -> u8 {
    match bits {
        Some(b) if b & 1 != 0 => 0,
        Some(b) if b & 4 != 0 => 1,
        Some(b) if b & 2 != 0 => 2,
        _ => 0,
    }
}

/// Existing wheel delta, else the legacy detail inverted and scaled
pub fn wheel_delta(delta: Option<f64>, detail: Option<f64>) -> f64 {
    match (delta, detail) {
        (Some(d), _) if d != 0.0 => d,
        (_, Some(detail)) if detail != 0.0 => -detail * WHEEL_DETAIL_SCALE,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DOC: u32 = 1;

    fn norm(raw: RawEvent<u32>) -> Event<u32> {
        normalize(raw.into(), &DOC, &DocumentMetrics::default())
    }

    #[test]
    fn test_target_fallbacks() {
        assert_eq!(norm(RawEvent::new("click").target(5).src_element(6)).target, 5);
        assert_eq!(norm(RawEvent::new("click").src_element(6)).target, 6);
        assert_eq!(norm(RawEvent::new("click")).target, DOC);
    }

    #[test]
    fn test_related_target_cross_reference() {
        let out = norm(RawEvent::new("mouseout").target(5).from_to(Some(5), Some(8)));
        assert_eq!(out.related_target, Some(8));

        let over = norm(RawEvent::new("mouseover").target(5).from_to(Some(3), Some(5)));
        assert_eq!(over.related_target, Some(3));

        assert_eq!(norm(RawEvent::new("click").target(5)).related_target, None);
    }

    #[test]
    fn test_button_bit_mapping() {
        assert_eq!(button(Some(2)), 2);
        assert_eq!(button(Some(4)), 1);
        assert_eq!(button(Some(1)), 0);
        assert_eq!(button(Some(3)), 0);
        assert_eq!(button(Some(6)), 1);
        assert_eq!(button(Some(0)), 0);
        assert_eq!(button(None), 0);
    }

    #[test]
    fn test_key_code_fallback() {
        assert_eq!(key_code(Some(97), Some(65)), 97);
        assert_eq!(key_code(Some(0), Some(13)), 13);
        assert_eq!(key_code(None, Some(27)), 27);
        assert_eq!(key_code(None, None), 0);
    }

    #[test]
    fn test_wheel_delta() {
        assert_eq!(wheel_delta(Some(120.0), Some(3.0)), 120.0);
        assert_eq!(wheel_delta(None, Some(3.0)), -120.0);
        assert_eq!(wheel_delta(Some(0.0), Some(-1.0)), 40.0);
        assert_eq!(wheel_delta(None, None), 0.0);
    }

    #[test]
    fn test_page_coordinates() {
        let metrics = DocumentMetrics {
            root: Some(BoxMetrics { scroll_left: 0.0, scroll_top: 30.0, client_left: 2.0, client_top: 0.0 }),
            body: Some(BoxMetrics { scroll_left: 15.0, scroll_top: 99.0, client_left: 0.0, client_top: 1.0 }),
        };
        let event = normalize(RawEvent::new("click").target(5).client(10.0, 20.0).into(), &DOC, &metrics);
        assert_eq!(event.page_x, Some(10.0 + 15.0 - 2.0));
        assert_eq!(event.page_y, Some(20.0 + 30.0 - 1.0));

        let bare = norm(RawEvent::new("click").client(4.0, 5.0));
        assert_eq!((bare.page_x, bare.page_y), (Some(4.0), Some(5.0)));

        let keyboard = norm(RawEvent::new("keydown"));
        assert_eq!(keyboard.page_x, None);
    }

    #[test]
    fn test_extra_fields_are_copied() {
        let event = norm(RawEvent::new("input").target(5).field("data", "a"));
        assert_eq!(event.value("data"), Some(json!("a")));
    }

    #[test]
    fn test_idempotent() {
        let raw = RawEvent::new("mousedown")
            .target(5)
            .client(1.0, 2.0)
            .button(4)
            .detail(2.0)
            .field("pointerId", 3);
        let once = norm(raw);
        let twice = normalize(once.clone().into(), &DOC, &DocumentMetrics::default());
        assert_eq!(once, twice);
        assert_eq!(twice.button, 1);
        assert_eq!(twice.wheel_delta, -80.0);
    }

    #[test]
    fn test_compliant_event_untouched() {
        let mut event = Event::new("click", 9u32);
        event.prevent_default();
        event.button = 2;
        let out = normalize(event.clone().into(), &DOC, &DocumentMetrics::default());
        assert_eq!(out, event);
        assert!(out.is_default_prevented());
    }
}
