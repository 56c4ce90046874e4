//! Shared types and the annotation pipeline for bootplot.
//!
//! Everything in here is pure: no processes, no files. The control binary
//! supplies tool output and consumes the annotated result.

pub mod error;
pub mod mode;
pub mod navigation;
pub mod parsers;
pub mod result;

pub use error::{PlotError, StructureError};
pub use mode::Mode;
pub use navigation::{resolve_click, ClickTarget, NavigationRequest, Navigator, RecordingNavigator};
pub use parsers::{annotate, AnnotateOptions, AnnotatedPlot, EntryLabel};
pub use result::{FailureKind, PipelineResult, PlotFailure};

/// Default analysis binary
pub const ANALYZE_BINARY: &str = "systemd-analyze";
