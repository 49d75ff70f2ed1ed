//! Output formatting for CLI commands
//!
//! Handlers never print directly; they go through [`OutputFormatter`] so
//! that `--json` and `--no-color` behave the same across every command.

use crate::error::Result;
use colored::Colorize;
use serde::Serialize;

/// Formats command output for the terminal
#[derive(Debug, Clone, Copy)]
pub struct OutputFormatter {
    json: bool,
    no_color: bool,
}

impl OutputFormatter {
    /// Create a formatter from the global CLI flags
    #[must_use]
    pub const fn new(json: bool, no_color: bool) -> Self {
        Self { json, no_color }
    }

    /// Whether `--json` was requested
    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.json
    }

    /// Print an informational line
    pub fn info(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }

    /// Print a success line
    pub fn success(&self, message: &str) {
        if self.json {
            return;
        }
        if self.no_color {
            println!("✓ {message}");
        } else {
            println!("{} {message}", "✓".green());
        }
    }

    /// Print a warning line
    pub fn warning(&self, message: &str) {
        if self.json {
            return;
        }
        if self.no_color {
            println!("⚠ {message}");
        } else {
            println!("{} {}", "⚠".yellow(), message.yellow());
        }
    }

    /// Print an error line to stderr
    pub fn error(&self, message: &str) {
        if self.no_color {
            eprintln!("✗ {message}");
        } else {
            eprintln!("{} {}", "✗".red(), message.red());
        }
    }

    /// Print a value as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
