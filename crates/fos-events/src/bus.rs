//! Topic bus
//!
//! The generic publish/subscribe primitive the router sits on. Anything
//! implementing [`TopicBus`] can be plugged in; [`Emitter`] is the default:
//! topic → ordered handler list, emission in registration order, and a
//! stop-immediate check before every handler.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::Event;

/// Shared event handler; equality is identity of the underlying closure
pub struct Handler<E>(Rc<RefCell<dyn FnMut(&mut Event<E>)>>);

impl<E> Handler<E> {
    pub fn new(f: impl FnMut(&mut Event<E>) + 'static) -> Self {
        Self(Rc::new(RefCell::new(f)))
    }

    /// Invoke the handler. Panics if the handler is re-entered from itself.
    pub fn call(&self, event: &mut Event<E>) {
        (&mut *self.0.borrow_mut())(event)
    }
}

impl<E> Clone for Handler<E> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<E> PartialEq for Handler<E> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<E> Eq for Handler<E> {}

impl<E> fmt::Debug for Handler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// Publish/subscribe keyed by string topics
pub trait TopicBus<E> {
    /// Append a handler to a topic
    fn on(&mut self, topic: &str, handler: Handler<E>);

    /// Remove one registration of `handler`; returns whether one was found
    fn off(&mut self, topic: &str, handler: &Handler<E>) -> bool;

    /// Run the topic's handlers with `target` as current target, in order.
    /// Returns how many handlers ran.
    fn emit(&self, target: &E, topic: &str, event: &mut Event<E>) -> usize;

    /// Snapshot of a topic's handlers
    fn listeners(&self, topic: &str) -> Vec<Handler<E>>;

    fn has_listeners(&self, topic: &str) -> bool;
}

/// Default in-process [`TopicBus`]
pub struct Emitter<E> {
    topics: HashMap<String, Vec<Handler<E>>>,
}

impl<E> Emitter<E> {
    pub fn new() -> Self {
        Self { topics: HashMap::new() }
    }

    /// Number of topics with at least one handler
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.topics.iter().map(|(topic, list)| (topic, list.len())))
            .finish()
    }
}

impl<E: Clone> TopicBus<E> for Emitter<E> {
    fn on(&mut self, topic: &str, handler: Handler<E>) {
        self.topics.entry(topic.to_string()).or_default().push(handler);
    }

    fn off(&mut self, topic: &str, handler: &Handler<E>) -> bool {
        let Some(list) = self.topics.get_mut(topic) else {
            return false;
        };
        let found = list.iter().position(|h| h == handler);
        if let Some(index) = found {
            list.remove(index);
        }
        if list.is_empty() {
            self.topics.remove(topic);
        }
        found.is_some()
    }

    fn emit(&self, target: &E, topic: &str, event: &mut Event<E>) -> usize {
        let Some(list) = self.topics.get(topic) else {
            return 0;
        };
        let mut invoked = 0;
        for handler in list {
            if event.is_immediate_propagation_stopped() {
                break;
            }
            event.current_target = Some(target.clone());
            handler.call(event);
            invoked += 1;
        }
        invoked
    }

    fn listeners(&self, topic: &str) -> Vec<Handler<E>> {
        self.topics.get(topic).cloned().unwrap_or_default()
    }

    fn has_listeners(&self, topic: &str) -> bool {
        self.topics.get(topic).is_some_and(|list| !list.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> Handler<u32> {
        let log = Rc::clone(log);
        Handler::new(move |_| log.borrow_mut().push(name))
    }

    #[test]
    fn test_emit_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = Emitter::new();
        bus.on("/<click>", recorder(&log, "a"));
        bus.on("/<click>", recorder(&log, "b"));
        bus.on("/x<click>", recorder(&log, "other"));

        let mut event = Event::new("click", 7u32);
        assert_eq!(bus.emit(&1, "/<click>", &mut event), 2);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert_eq!(event.current_target, Some(1));
    }

    #[test]
    fn test_stop_immediate_skips_rest() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = Emitter::new();
        bus.on("t", Handler::new(|e: &mut Event<u32>| e.stop_immediate_propagation()));
        bus.on("t", recorder(&log, "late"));

        let mut event = Event::new("click", 1u32);
        assert_eq!(bus.emit(&1, "t", &mut event), 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_off_removes_one_registration() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = Emitter::new();
        let h = recorder(&log, "h");
        bus.on("t", h.clone());
        bus.on("t", h.clone());

        assert!(bus.off("t", &h));
        assert_eq!(bus.listeners("t").len(), 1);
        assert!(bus.off("t", &h));
        assert!(!bus.has_listeners("t"));
        assert!(!bus.off("t", &h));
        assert_eq!(bus.topic_count(), 0);
    }

    #[test]
    fn test_handler_identity() {
        let a: Handler<u32> = Handler::new(|_| {});
        let b: Handler<u32> = Handler::new(|_| {});
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
