//! Startup analysis mode: system manager or user manager.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which startup sequence to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    System,
    #[default]
    User,
}

impl Mode {
    /// Arguments passed to `systemd-analyze` for this mode.
    pub fn analyze_args(&self) -> &'static [&'static str] {
        match self {
            Mode::System => &["plot"],
            Mode::User => &["--user", "plot"],
        }
    }

    /// Printable command line, used in logs and failure messages.
    pub fn command_line(&self, binary: &str) -> String {
        let mut parts = vec![binary];
        parts.extend_from_slice(self.analyze_args());
        parts.join(" ")
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::System => "system",
            Mode::User => "user",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(Mode::System),
            "user" => Ok(Mode::User),
            other => Err(format!("unknown mode '{}' (expected system or user)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_args() {
        assert_eq!(Mode::System.analyze_args(), &["plot"]);
        assert_eq!(Mode::User.analyze_args(), &["--user", "plot"]);
    }

    #[test]
    fn test_command_line() {
        assert_eq!(Mode::System.command_line("systemd-analyze"), "systemd-analyze plot");
        assert_eq!(
            Mode::User.command_line("systemd-analyze"),
            "systemd-analyze --user plot"
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("System".parse::<Mode>(), Ok(Mode::System));
        assert_eq!(" user ".parse::<Mode>(), Ok(Mode::User));
        assert!("kernel".parse::<Mode>().is_err());
    }

    #[test]
    fn test_default_is_user() {
        assert_eq!(Mode::default(), Mode::User);
    }
}
