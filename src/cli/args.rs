//! Command-line argument parsing for Sold Fetcher
//!
//! This module defines the CLI structure using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Sold Fetcher - Download sold-property records
#[derive(Parser, Debug)]
#[command(
    name = "sold_fetcher",
    version,
    about = "Fetch sold-property records for one or more locations",
    long_about = "Fetches every page of sold-property records for each location, with paced requests,
automatic retry with exponential backoff, and concurrent multi-location fetching."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch sold properties for one or more locations
    Fetch(FetchArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the fetch command
#[derive(Args, Debug, Clone, Default)]
pub struct FetchArgs {
    /// Location identifier (repeatable)
    #[arg(short, long = "location", value_name = "LOCATION")]
    pub locations: Vec<String>,

    /// File with one location identifier per line
    #[arg(long, value_name = "FILE")]
    pub locations_file: Option<PathBuf>,

    /// Months of sale history to request
    #[arg(long)]
    pub sold_in: Option<u32>,

    /// Search radius (forces multi-location mode)
    #[arg(long)]
    pub radius: Option<f64>,

    /// Number of locations fetched concurrently
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Write the JSON output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a commented default configuration file
    Init {
        /// Destination path (defaults to the user config directory)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level from the global flags, if any was given
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}

impl FetchArgs {
    /// Check argument values that clap cannot
    pub fn validate(&self) -> Result<(), String> {
        if self.locations.is_empty() && self.locations_file.is_none() {
            return Err("Specify at least one --location or a --locations-file".to_string());
        }

        if self.sold_in == Some(0) {
            return Err("--sold-in must be at least 1".to_string());
        }

        if let Some(radius) = self.radius {
            if !radius.is_finite() || radius < 0.0 {
                return Err(format!("--radius must be non-negative, got {}", radius));
            }
        }

        if self.concurrency == Some(0) {
            return Err("--concurrency must be greater than 0".to_string());
        }

        Ok(())
    }
}
