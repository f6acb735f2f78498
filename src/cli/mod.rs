//! Command-line interface components
//!
//! This module contains CLI-specific code for the Sold Fetcher application,
//! including argument parsing, command handlers and progress display.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{Cli, Commands, ConfigAction, ConfigArgs, FetchArgs, GlobalArgs};
pub use commands::{collect_locations, handle_config, handle_fetch, parse_locations};
pub use progress::{ProgressConfig, ProgressDisplay};
