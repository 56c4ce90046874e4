//! Caption extraction.
//!
//! `systemd-analyze plot` writes the "Startup finished in ..." summary and the
//! host/kernel line as `<text>` elements outside of any `<g>`. They read better
//! as prose above the chart, so they are lifted out of the drawing.

use super::document::{Element, Node};

/// Remove every `<text>` whose parent is not a `<g>` and return its content in
/// document order alongside the reduced tree.
pub fn extract_captions(root: Element) -> (Element, Vec<String>) {
    let mut captions = Vec::new();
    let root = strip_captions(root, &mut captions);
    (root, captions)
}

fn strip_captions(mut element: Element, captions: &mut Vec<String>) -> Element {
    let in_group = element.is("g");
    let children = std::mem::take(&mut element.children);

    element.children = children
        .into_iter()
        .filter_map(|child| match child {
            Node::Element(child) if child.is("text") && !in_group => {
                captions.push(child.text_content());
                None
            }
            Node::Element(child) => Some(Node::Element(strip_captions(child, captions))),
            other => Some(other),
        })
        .collect();

    element
}
