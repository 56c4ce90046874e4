//! Boot plot annotation pipeline.
//!
//! Turns raw `systemd-analyze plot` output into an interactive document:
//!
//! 1. `document`: parse into an owned tree (well-formedness, `<svg>` root)
//! 2. `captions`: lift top-level text out of the drawing
//! 3. `legend`: drop the legend group, scale the chart
//! 4. `labels`: tag unit labels with `data-*` attributes and a marker class
//!
//! Steps 1-3 can reject the document. Step 4 never fails: labels that do not
//! match are simply left alone.

pub mod captions;
pub mod document;
pub mod labels;
pub mod legend;

pub use captions::extract_captions;
pub use document::{Element, Node, PrologItem, SvgDocument};
pub use labels::{
    tag_entry_labels, EntryLabel, ATTR_SERVICE, ATTR_TIME, ATTR_TIME_UNIT, MARKER_CLASS,
};
pub use legend::{plot_group_mut, strip_legend, DEFAULT_SCALE};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PlotError, StructureError};

/// Presentation knobs for the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotateOptions {
    pub scale: f32,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
        }
    }
}

/// Output of a successful pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedPlot {
    /// Annotated document; legend removed, captions removed, labels tagged.
    pub document: SvgDocument,
    /// Top-level text, in document order.
    pub captions: Vec<String>,
    /// Labels that were tagged, in document order.
    pub entries: Vec<EntryLabel>,
}

impl AnnotatedPlot {
    /// Outer markup of the `<svg>` element, for embedding in a host page.
    pub fn markup(&self) -> String {
        self.document.root.to_markup()
    }

    /// The tagged label node for a unit, if one was drawn.
    pub fn entry_element(&self, service: &str) -> Option<&Element> {
        self.document
            .root
            .find(&|e: &Element| e.has_class(MARKER_CLASS) && e.attribute(ATTR_SERVICE) == Some(service))
    }
}

/// Run the full pipeline over raw tool output.
pub fn annotate(raw: &str, options: &AnnotateOptions) -> Result<AnnotatedPlot, PlotError> {
    let document = SvgDocument::parse(raw).inspect_err(|e| warn!("Rejected plot output: {}", e))?;
    let SvgDocument { prolog, root } = document;

    // Captions come out first: the legend check below looks at the reduced tree.
    let (root, captions) = extract_captions(root);

    let mut root = strip_legend(root, options.scale).map_err(|reason| {
        warn!("Rejected plot output: {}", reason);
        PlotError::malformed(reason, raw)
    })?;

    let entries = match plot_group_mut(&mut root) {
        Some(plot) => tag_entry_labels(plot),
        None => return Err(PlotError::malformed(StructureError::MissingGroups(0), raw)),
    };

    debug!(
        "Annotated plot: {} caption(s), {} clickable entries",
        captions.len(),
        entries.len()
    );

    Ok(AnnotatedPlot {
        document: SvgDocument { prolog, root },
        captions,
        entries,
    })
}
