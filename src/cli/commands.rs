//! Command-line argument definitions
//!
//! The binary wraps three operational commands around the HTTP service:
//! `migrate` prepares the database, `seed` loads demo data, and `serve`
//! runs the server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Support ticket management service
#[derive(Debug, Parser)]
#[command(name = "helpdesk", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "HELPDESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output results as JSON where a command produces data
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create or upgrade the database schema
    Migrate,

    /// Seed demo accounts and reference data into the database
    ///
    /// Prints the generated credentials; running it again on a seeded
    /// database changes nothing.
    Seed,

    /// Start the HTTP server
    Serve {
        /// Bind address, overriding the configuration
        #[arg(long)]
        host: Option<String>,

        /// Port, overriding the configuration
        #[arg(short, long)]
        port: Option<u16>,
    },
}
