//! Command-line interface
//!
//! Argument definitions live in [`commands`], per-command logic in
//! [`handlers`], and terminal output goes through [`OutputFormatter`].

pub mod commands;
pub mod handlers;
mod output;

pub use commands::{Cli, Commands};
pub use output::OutputFormatter;
