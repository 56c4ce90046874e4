//! Visible state of one plot request.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PlotError;
use crate::mode::Mode;
use crate::parsers::{annotate, AnnotateOptions, AnnotatedPlot};

/// Which stage failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The tool could not be run or gave no output.
    Acquisition,
    /// The output was not a plot we can render.
    Parse,
}

/// User-facing failure: a mode-specific message and the text to troubleshoot with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotFailure {
    pub kind: FailureKind,
    pub message: String,
    pub detail: String,
}

impl PlotFailure {
    pub fn from_error(mode: Mode, binary: &str, error: &PlotError) -> Self {
        let command = mode.command_line(binary);
        let (kind, verb) = if error.is_acquisition() {
            (FailureKind::Acquisition, "reading")
        } else {
            (FailureKind::Parse, "parsing")
        };
        Self {
            kind,
            message: format!("There was an error {} the output of {}", verb, command),
            detail: error.raw().to_string(),
        }
    }
}

impl fmt::Display for PlotFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Exactly one of these holds per request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PipelineResult {
    #[default]
    Loading,
    Success(AnnotatedPlot),
    Failure(PlotFailure),
}

impl PipelineResult {
    /// Collapse an acquisition outcome into a terminal state.
    pub fn from_outcome(
        mode: Mode,
        binary: &str,
        outcome: Result<String, PlotError>,
        options: &AnnotateOptions,
    ) -> Self {
        match outcome.and_then(|raw| annotate(&raw, options)) {
            Ok(plot) => PipelineResult::Success(plot),
            Err(e) => PipelineResult::Failure(PlotFailure::from_error(mode, binary, &e)),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PipelineResult::Loading)
    }

    pub fn as_success(&self) -> Option<&AnnotatedPlot> {
        match self {
            PipelineResult::Success(plot) => Some(plot),
            _ => None,
        }
    }

    pub fn as_failure(&self) -> Option<&PlotFailure> {
        match self {
            PipelineResult::Failure(f) => Some(f),
            _ => None,
        }
    }
}
