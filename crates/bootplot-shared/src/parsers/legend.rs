//! Legend removal and display scaling.
//!
//! The plot is always the first top-level `<g>` and the colour legend the
//! second. The legend is redrawn by the presentation layer, so it is dropped.

use super::document::{Element, Node};
use crate::error::StructureError;

/// The chart renders at half its native size to fit typical viewports.
pub const DEFAULT_SCALE: f32 = 0.5;

/// Drop the legend group and apply `scale` to the root element.
///
/// Fewer than two top-level groups means the output is not a plot we
/// understand; that is reported rather than rendering half a chart.
pub fn strip_legend(mut root: Element, scale: f32) -> Result<Element, StructureError> {
    let groups: Vec<usize> = root
        .children
        .iter()
        .enumerate()
        .filter_map(|(i, child)| match child {
            Node::Element(e) if e.is("g") => Some(i),
            _ => None,
        })
        .collect();

    if groups.len() < 2 {
        return Err(StructureError::MissingGroups(groups.len()));
    }

    root.children.remove(groups[1]);
    apply_scale(&mut root, scale);
    Ok(root)
}

/// The retained plot group (first top-level `<g>`).
pub fn plot_group_mut(root: &mut Element) -> Option<&mut Element> {
    root.child_elements_mut().find(|e| e.is("g"))
}

/// Merge a `scale` declaration into the inline style, replacing any previous one.
fn apply_scale(root: &mut Element, scale: f32) {
    let mut declarations: Vec<String> = root
        .attribute("style")
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty())
        .filter(|decl| {
            decl.split_once(':')
                .map(|(property, _)| property.trim() != "scale")
                .unwrap_or(true)
        })
        .map(str::to_string)
        .collect();

    declarations.push(format!("scale: {}", scale));
    root.set_attribute("style", &declarations.join("; "));
}
