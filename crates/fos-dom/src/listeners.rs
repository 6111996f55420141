//! Native listener table
//!
//! Per-node listener registrations, and the ordered plan a native dispatch
//! walks: capture listeners from the window down to the target's parent,
//! the target's own listeners, then bubble listeners back up.

use std::collections::HashMap;

use crate::{DomTree, NodeId};

/// Dispatch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Capture,
    Target,
    Bubble,
}

/// A single listener registration on a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration<L> {
    pub event_type: String,
    pub listener: L,
    pub capture: bool,
}

/// One listener invocation in a dispatch plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStep<L> {
    pub node: NodeId,
    pub listener: L,
    pub phase: Phase,
}

/// Listener registrations keyed by node
#[derive(Debug)]
pub struct ListenerTable<L> {
    by_node: HashMap<NodeId, Vec<Registration<L>>>,
}

impl<L: Copy + Eq> ListenerTable<L> {
    pub fn new() -> Self {
        Self { by_node: HashMap::new() }
    }

    /// Register a listener. Identical (type, listener, capture) triples are
    /// deduplicated, as native dispatch facilities do.
    pub fn add(&mut self, node: NodeId, event_type: &str, listener: L, capture: bool) -> bool {
        let list = self.by_node.entry(node).or_default();
        if list
            .iter()
            .any(|r| r.event_type == event_type && r.listener == listener && r.capture == capture)
        {
            return false;
        }
        list.push(Registration {
            event_type: event_type.to_string(),
            listener,
            capture,
        });
        true
    }

    /// Remove every registration of `listener` for `event_type` on `node`
    pub fn remove(&mut self, node: NodeId, event_type: &str, listener: L) -> bool {
        let Some(list) = self.by_node.get_mut(&node) else {
            return false;
        };
        let before = list.len();
        list.retain(|r| !(r.event_type == event_type && r.listener == listener));
        let removed = list.len() < before;
        if list.is_empty() {
            self.by_node.remove(&node);
        }
        removed
    }

    /// Registrations on a node for an event type
    pub fn registrations(&self, node: NodeId, event_type: &str) -> impl Iterator<Item = &Registration<L>> {
        self.by_node
            .get(&node)
            .into_iter()
            .flatten()
            .filter(move |r| r.event_type == event_type)
    }

    /// Number of registrations on a node for an event type
    pub fn count(&self, node: NodeId, event_type: &str) -> usize {
        self.registrations(node, event_type).count()
    }

    /// Total registrations across all nodes
    pub fn total(&self) -> usize {
        self.by_node.values().map(Vec::len).sum()
    }

    /// Build the ordered listener plan for an event fired at `target`
    pub fn plan(&self, tree: &DomTree, target: NodeId, event_type: &str, bubbles: bool) -> Vec<DispatchStep<L>> {
        let mut ancestors = tree.ancestors(target);
        if target == NodeId::DOCUMENT || ancestors.last() == Some(&NodeId::DOCUMENT) {
            ancestors.push(NodeId::WINDOW);
        }

        let mut steps = Vec::new();

        for &node in ancestors.iter().rev() {
            for r in self.registrations(node, event_type).filter(|r| r.capture) {
                steps.push(DispatchStep { node, listener: r.listener, phase: Phase::Capture });
            }
        }

        let at_target = self.registrations(target, event_type);
        let (capturing, rest): (Vec<_>, Vec<_>) = at_target.partition(|r| r.capture);
        for r in capturing.into_iter().chain(rest) {
            steps.push(DispatchStep { node: target, listener: r.listener, phase: Phase::Target });
        }

        if bubbles {
            for &node in &ancestors {
                for r in self.registrations(node, event_type).filter(|r| !r.capture) {
                    steps.push(DispatchStep { node, listener: r.listener, phase: Phase::Bubble });
                }
            }
        }

        steps
    }
}

impl<L: Copy + Eq> Default for ListenerTable<L> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let div = tree.create_element("div");
        tree.append_child(tree.root(), html).unwrap();
        tree.append_child(html, div).unwrap();
        (tree, html, div)
    }

    #[test]
    fn test_add_deduplicates() {
        let mut table = ListenerTable::new();
        assert!(table.add(NodeId(3), "click", 1u8, false));
        assert!(!table.add(NodeId(3), "click", 1u8, false));
        assert!(table.add(NodeId(3), "click", 1u8, true));
        assert_eq!(table.count(NodeId(3), "click"), 2);
    }

    #[test]
    fn test_remove_ignores_capture_flag() {
        let mut table = ListenerTable::new();
        table.add(NodeId(3), "click", 1u8, true);
        table.add(NodeId(3), "click", 1u8, false);
        assert!(table.remove(NodeId(3), "click", 1));
        assert_eq!(table.total(), 0);
        assert!(!table.remove(NodeId(3), "click", 1));
    }

    #[test]
    fn test_plan_order() {
        let (tree, html, div) = sample();
        let mut table = ListenerTable::new();
        table.add(NodeId::DOCUMENT, "click", 'd', true);
        table.add(html, "click", 'h', false);
        table.add(div, "click", 't', false);
        table.add(NodeId::WINDOW, "click", 'w', true);
        table.add(div, "keyup", 'k', false);

        let plan = table.plan(&tree, div, "click", true);
        let order: Vec<(char, Phase)> = plan.iter().map(|s| (s.listener, s.phase)).collect();
        assert_eq!(order, vec![
            ('w', Phase::Capture),
            ('d', Phase::Capture),
            ('t', Phase::Target),
            ('h', Phase::Bubble),
        ]);

        let no_bubble = table.plan(&tree, div, "click", false);
        assert_eq!(no_bubble.len(), 3);
    }

    #[test]
    fn test_detached_target_skips_window() {
        let (mut tree, _, _) = sample();
        let loose = tree.create_element("p");
        let mut table = ListenerTable::new();
        table.add(NodeId::WINDOW, "click", 'w', true);
        table.add(loose, "click", 'p', false);

        let plan = table.plan(&tree, loose, "click", true);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].phase, Phase::Target);
    }
}
