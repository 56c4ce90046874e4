//! Error types for the boot plot pipeline.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlotError {
    /// The analysis tool could not be run or returned nothing usable.
    #[error("Acquisition error: {0}")]
    Acquisition(String),

    /// Output was not a plot document we can re-render.
    #[error("Malformed document: {reason}")]
    MalformedDocument { reason: StructureError, raw: String },
}

/// Why a document was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("not well-formed markup: {0}")]
    NotWellFormed(String),

    #[error("root element is <{0}>, expected <svg>")]
    UnexpectedRoot(String),

    #[error("expected plot and legend groups, found {0} top-level group(s)")]
    MissingGroups(usize),
}

impl PlotError {
    pub fn acquisition(msg: impl Into<String>) -> Self {
        PlotError::Acquisition(msg.into())
    }

    pub fn malformed(reason: StructureError, raw: &str) -> Self {
        PlotError::MalformedDocument {
            reason,
            raw: raw.to_string(),
        }
    }

    pub fn is_acquisition(&self) -> bool {
        matches!(self, PlotError::Acquisition(_))
    }

    /// Text worth showing to the user when troubleshooting.
    /// For malformed documents this is the offending tool output.
    pub fn raw(&self) -> &str {
        match self {
            PlotError::Acquisition(msg) => msg,
            PlotError::MalformedDocument { raw, .. } => raw,
        }
    }
}
