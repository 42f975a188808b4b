//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod commands;
mod config;
mod logging;

pub use commands::{handle_graph, handle_sources, handle_status, parse_target};
pub use config::{ConfigSubcommand, handle_config_command};
pub use logging::init_logging;
