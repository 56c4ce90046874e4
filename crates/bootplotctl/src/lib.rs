//! bootplotctl library - exposes modules for integration tests

pub mod acquire;
pub mod config;
pub mod render;
pub mod session;

pub use acquire::{Acquirer, SavedPlot, SystemdAnalyze};
pub use config::Config;
pub use render::OutputFormat;
pub use session::{PlotSession, RequestTicket};

/// Exit code for success
pub const EXIT_SUCCESS: u8 = 0;

/// Exit code when the plot could not be produced
pub const EXIT_FAILURE: u8 = 1;
