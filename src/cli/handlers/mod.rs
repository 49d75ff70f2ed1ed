//! Command handlers
//!
//! One module per command. Handlers load configuration themselves so each
//! command works standalone.

mod migrate;
mod seed;
mod serve;

pub use migrate::handle_migrate_command;
pub use seed::handle_seed_command;
pub use serve::handle_serve_command;
