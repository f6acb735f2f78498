//! Sold Fetcher CLI application
//!
//! Command-line interface for fetching sold-property records for one or more
//! locations, printing them as JSON.

use std::error::Error;
use std::process;

use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use sold_fetcher::cli::{handle_config, handle_fetch, Cli, Commands};
use sold_fetcher::config::{AppConfig, LoggingConfig};
use sold_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();

    // Logging settings come from the config file unless a flag overrides them
    let logging = AppConfig::load(cli.global.config.clone())
        .await
        .map(|config| config.logging)
        .unwrap_or_default();
    init_logging(&cli, &logging);

    info!("Sold Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Fetch(args) => {
            info!("Executing fetch command");
            handle_fetch(args, cli.global.config, cli.global.quiet).await
        }
        Commands::Config(args) => {
            info!("Executing config command");
            handle_config(args, cli.global.config).await
        }
    }
}

/// Initialize logging from CLI verbosity flags or the configured level
fn init_logging(cli: &Cli, logging: &LoggingConfig) {
    let level = cli
        .log_level()
        .map(|level| level.to_string().to_lowercase())
        .unwrap_or_else(|| logging.level.clone());

    let mut filter = EnvFilter::from_default_env();
    match format!("sold_fetcher={}", level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(_) => {
            filter = filter.add_directive(LevelFilter::INFO.into());
            eprintln!("Unknown log level '{}', using info", level);
        }
    }

    // Logs go to stderr so JSON output on stdout stays clean
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(logging.colored_output)
        .with_level(cli.global.very_verbose)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
