//! Topic keys
//!
//! A topic is `path<type>`, e.g. `/html/body/div<click>`.

/// Build the topic for a path and (already lowercased) event type
pub fn topic(path: &str, event_type: &str) -> String {
    format!("{path}<{event_type}>")
}

/// Split a whitespace-separated, case-insensitive event type list
pub fn event_types(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split_whitespace().map(str::to_lowercase)
}
