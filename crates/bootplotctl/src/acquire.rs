//! Acquisition: running `systemd-analyze plot` and collecting its output.
//!
//! Production code uses `SystemdAnalyze`, which spawns the real tool.
//! Tests plug in their own `Acquirer` to control output and timing.

use async_trait::async_trait;
use bootplot_shared::{Mode, PlotError};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::AnalyzeConfig;

/// Source of raw plot markup for a mode.
#[async_trait]
pub trait Acquirer: Send + Sync {
    async fn acquire(&self, mode: Mode) -> Result<String, PlotError>;
}

/// Runs the analysis binary as a child process.
#[derive(Debug, Clone)]
pub struct SystemdAnalyze {
    binary: String,
    timeout: Duration,
}

impl SystemdAnalyze {
    pub fn new(binary: &str, timeout: Duration) -> Self {
        Self {
            binary: binary.to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &AnalyzeConfig) -> Self {
        Self::new(&config.binary, config.timeout())
    }
}

#[async_trait]
impl Acquirer for SystemdAnalyze {
    async fn acquire(&self, mode: Mode) -> Result<String, PlotError> {
        let command_line = mode.command_line(&self.binary);
        let start = Instant::now();
        info!("Running {}", command_line);

        let output = match timeout(
            self.timeout,
            Command::new(&self.binary)
                .args(mode.analyze_args())
                .kill_on_drop(true)
                .output(),
        )
        .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!("Failed to run {}: {}", command_line, e);
                return Err(PlotError::acquisition(format!("{}: {}", self.binary, e)));
            }
            Err(_) => {
                warn!("Timeout after {:?}: {}", self.timeout, command_line);
                return Err(PlotError::acquisition(format!(
                    "{} timed out after {}s",
                    command_line,
                    self.timeout.as_secs()
                )));
            }
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(
                "{} exited with {} after {}ms",
                command_line, output.status, elapsed_ms
            );
            let detail = if stderr.is_empty() {
                format!("{} exited with {}", command_line, output.status)
            } else {
                stderr
            };
            return Err(PlotError::acquisition(detail));
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| {
            PlotError::acquisition(format!("{} produced non-UTF-8 output: {}", command_line, e))
        })?;
        if stdout.trim().is_empty() {
            return Err(PlotError::acquisition(format!(
                "{} produced no output",
                command_line
            )));
        }

        info!(
            "{} finished in {}ms ({} bytes)",
            command_line,
            elapsed_ms,
            stdout.len()
        );
        Ok(stdout)
    }
}

/// Reads a previously saved plot instead of running the tool.
#[derive(Debug, Clone)]
pub struct SavedPlot {
    path: PathBuf,
}

impl SavedPlot {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

#[async_trait]
impl Acquirer for SavedPlot {
    async fn acquire(&self, mode: Mode) -> Result<String, PlotError> {
        info!("Reading saved {} plot from {}", mode, self.path.display());
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| PlotError::acquisition(format!("{}: {}", self.path.display(), e)))
    }
}
