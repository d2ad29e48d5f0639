//! Input mode tracking for the session.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;

/// How the session interprets plain input lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InputMode {
    /// Lines are appended as text; `sh:` lines run in the shell.
    #[default]
    #[value(name = "sh")]
    Shell,
    /// Lines that parse as Sam commands edit the buffer.
    Sam,
    /// Lines are sent to the chat model.
    Ai,
}

impl FromStr for InputMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sh" | "shell" => Ok(InputMode::Shell),
            "sam" | "edit" => Ok(InputMode::Sam),
            "ai" => Ok(InputMode::Ai),
            other => bail!("Unknown mode: {other}"),
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputMode::Shell => "sh",
            InputMode::Sam => "sam",
            InputMode::Ai => "ai",
        };
        f.write_str(name)
    }
}
