//! Configuration management for bootplotctl.
//!
//! Loads settings from /etc/bootplot/config.toml or uses defaults.

use anyhow::Result;
use bootplot_shared::parsers::DEFAULT_SCALE;
use bootplot_shared::{AnnotateOptions, Mode, ANALYZE_BINARY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/bootplot/config.toml";

/// How the analysis tool is run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeConfig {
    /// Binary to invoke (resolved through PATH)
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Per-invocation timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_binary() -> String {
    ANALYZE_BINARY.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            timeout_secs: default_timeout(),
        }
    }
}

impl AnalyzeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Chart scale factor applied to the svg root
    #[serde(default = "default_scale")]
    pub scale: f32,

    /// Host context passed along with navigation requests
    #[serde(default = "default_host")]
    pub host: String,

    /// Mode shown when none is given on the command line
    #[serde(default)]
    pub default_mode: Mode,
}

fn default_scale() -> f32 {
    DEFAULT_SCALE
}

fn default_host() -> String {
    "localhost".to_string()
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            host: default_host(),
            default_mode: Mode::default(),
        }
    }
}

/// Full configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analyze: AnalyzeConfig,

    #[serde(default)]
    pub view: ViewConfig,
}

impl Config {
    /// Load config from `path` (or the system path), falling back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.unwrap_or_else(|| Path::new(CONFIG_PATH));
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Config::default();
        }
        Self::load_from_path(path).unwrap_or_else(|e| {
            warn!("Invalid config {}, using defaults: {}", path.display(), e);
            Config::default()
        })
    }

    /// Load config from specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn annotate_options(&self) -> AnnotateOptions {
        AnnotateOptions {
            scale: self.view.scale,
        }
    }
}
