//! Structural paths
//!
//! An element's path is its tag chain from the document down, each segment
//! suffixed with its 1-based position among preceding same-tag siblings when
//! that position is greater than one: `/html/body/div[2]/span`. The window
//! resolves to `""` and the document to `"/"`.
//!
//! Only previous-sibling links are consulted, so the first of several
//! same-tag siblings carries no suffix, exactly like a sole sibling.

use crate::host::{Host, NodeKind};

/// Resolve the structural path of `element`
///
/// Returns `None` when the element is not connected to the host's document
/// (or is neither an element nor one of the two sentinel roots).
pub fn resolve<H: Host + ?Sized>(host: &H, element: &H::Element) -> Option<String> {
    if *element == host.window() {
        return Some(String::new());
    }
    let document = host.document();
    if *element == document {
        return Some("/".to_string());
    }

    let mut segments = Vec::new();
    let mut current = element.clone();
    while host.node_kind_of(&current) == NodeKind::Element {
        let tag = host.tag_name_of(&current)?;
        segments.push(segment(tag, position(host, &current, tag)));
        current = host.parent_of(&current)?;
    }

    if current != document || segments.is_empty() {
        return None;
    }
    segments.reverse();
    Some(format!("/{}", segments.join("/")))
}

/// 1-based position among preceding siblings with the same tag; doctypes are skipped
fn position<H: Host + ?Sized>(host: &H, element: &H::Element, tag: &str) -> usize {
    let mut position = 1;
    let mut sibling = host.previous_sibling_of(element);
    while let Some(node) = sibling {
        match host.node_kind_of(&node) {
            NodeKind::DocumentType => {}
            NodeKind::Element => {
                if host.tag_name_of(&node).is_some_and(|t| t.eq_ignore_ascii_case(tag)) {
                    position += 1;
                }
            }
            _ => {}
        }
        sibling = host.previous_sibling_of(&node);
    }
    position
}

fn segment(tag: &str, position: usize) -> String {
    let tag = tag.to_lowercase();
    if position > 1 {
        format!("{tag}[{position}]")
    } else {
        tag
    }
}

#[cfg(all(test, feature = "dom"))]
mod tests {
    use super::*;
    use crate::adapters::dom::DomHost;
    use fos_dom::{DomTree, NodeId};

    fn page() -> (DomHost, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let doctype = tree.create_doctype("html");
        let html = tree.create_element("HTML");
        let body = tree.create_element("body");
        let div1 = tree.create_element("div");
        let div2 = tree.create_element("div");
        let span = tree.create_element("span");
        tree.append_child(tree.root(), doctype).unwrap();
        tree.append_child(tree.root(), html).unwrap();
        tree.append_child(html, body).unwrap();
        tree.append_child(body, div1).unwrap();
        tree.append_child(body, div2).unwrap();
        tree.append_child(div2, span).unwrap();
        (DomHost::new(tree), body, div1, div2, span)
    }

    #[test]
    fn test_sentinels() {
        let (host, ..) = page();
        assert_eq!(resolve(&host, &NodeId::WINDOW), Some(String::new()));
        assert_eq!(resolve(&host, &NodeId::DOCUMENT), Some("/".to_string()));
    }

    #[test]
    fn test_sibling_positions() {
        let (host, body, div1, div2, span) = page();
        assert_eq!(resolve(&host, &body).as_deref(), Some("/html/body"));
        assert_eq!(resolve(&host, &div1).as_deref(), Some("/html/body/div"));
        assert_eq!(resolve(&host, &div2).as_deref(), Some("/html/body/div[2]"));
        assert_eq!(resolve(&host, &span).as_deref(), Some("/html/body/div[2]/span"));
    }

    #[test]
    fn test_other_tags_and_text_do_not_count() {
        let (mut host, body, _, _, _) = page();
        let text = host.tree_mut().create_text("hello");
        let p = host.tree_mut().create_element("p");
        let div3 = host.tree_mut().create_element("div");
        let comment = host.tree_mut().create_comment("div");
        host.tree_mut().append_child(body, text).unwrap();
        host.tree_mut().append_child(body, p).unwrap();
        host.tree_mut().append_child(body, comment).unwrap();
        host.tree_mut().append_child(body, div3).unwrap();

        assert_eq!(resolve(&host, &p).as_deref(), Some("/html/body/p"));
        assert_eq!(resolve(&host, &div3).as_deref(), Some("/html/body/div[3]"));
        assert_eq!(resolve(&host, &text), None);
        assert_eq!(resolve(&host, &comment), None);
    }

    #[test]
    fn test_detached_is_unresolvable() {
        let (mut host, body, div1, _, _) = page();
        let loose = host.tree_mut().create_element("div");
        assert_eq!(resolve(&host, &loose), None);

        host.tree_mut().remove_child(body, div1).unwrap();
        assert_eq!(resolve(&host, &div1), None);
    }
}
