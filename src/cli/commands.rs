//! Command handlers for Sold Fetcher CLI
//!
//! This module implements the command handlers that connect CLI arguments to
//! the fetch client and configuration layer.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::app::{Property, SoldPropertiesClient};
use crate::cli::{ConfigAction, ConfigArgs, FetchArgs, ProgressConfig, ProgressDisplay};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Handle the fetch command
///
/// Loads configuration, collects location identifiers from flags and the
/// locations file, fetches every location and writes the properties as JSON.
pub async fn handle_fetch(args: FetchArgs, config_path: Option<PathBuf>, quiet: bool) -> Result<()> {
    let start_time = Instant::now();
    args.validate().map_err(AppError::generic)?;

    let mut runtime = AppConfig::load(config_path).await?.to_runtime_config()?;
    if let Some(limit) = args.concurrency {
        runtime.coordinator = runtime.coordinator.with_concurrency_limit(limit);
    }

    let identifiers = collect_locations(&args.locations, args.locations_file.as_deref()).await?;
    if identifiers.is_empty() {
        warn!("No location identifiers given");
        return Err(AppError::generic("No location identifiers to fetch"));
    }

    let sold_in = args.sold_in.unwrap_or(runtime.query.sold_in);
    let single_location = identifiers.len() == 1 && args.radius.is_none();
    let radius = args.radius.unwrap_or(runtime.query.radius);

    info!(
        "Fetching {} location(s), sold in the last {} months",
        identifiers.len(),
        sold_in
    );

    let (progress_tx, progress_rx) = mpsc::channel(runtime.coordinator.progress_buffer_size);
    let display = ProgressDisplay::new(
        ProgressConfig {
            enable_progress_bar: !quiet,
            ..Default::default()
        },
        identifiers.len(),
    )?;
    let progress_handle = display.spawn(progress_rx);

    let result = {
        let client = SoldPropertiesClient::new(
            runtime.client,
            runtime.pacing,
            runtime.retry,
            runtime.coordinator,
        )?
        .with_progress(progress_tx);

        if single_location {
            client.fetch_location(&identifiers[0], sold_in).await
        } else {
            client
                .fetch_for_identifiers(&identifiers, sold_in, radius)
                .await
        }
    };

    // The client owned the last sender, so the display can drain and finish
    let stats = progress_handle
        .await
        .map_err(|e| AppError::generic(format!("Progress display failed: {}", e)))?;
    let properties = result?;

    write_output(&properties, args.output.as_deref()).await?;

    info!(
        "Fetch completed: {} properties from {} pages in {:?}",
        properties.len(),
        stats.pages_fetched,
        start_time.elapsed()
    );
    if !quiet {
        eprintln!(
            "Fetched {} properties for {} location(s) in {:.1}s",
            properties.len(),
            identifiers.len(),
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

/// Handle the config command
pub async fn handle_config(args: ConfigArgs, config_path: Option<PathBuf>) -> Result<()> {
    match args.action {
        ConfigAction::Init { path, force } => {
            let path = match path {
                Some(path) => path,
                None => AppConfig::default_config_path().ok_or_else(|| {
                    AppError::generic("Could not determine user config directory")
                })?,
            };

            AppConfig::write_default(&path, force).await?;
            println!("Created configuration file: {}", path.display());
            Ok(())
        }
        ConfigAction::Show => {
            let config = AppConfig::load(config_path).await?;
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

/// Location identifiers from flags followed by those in `locations_file`
///
/// Order is preserved and duplicates are kept.
pub async fn collect_locations(
    locations: &[String],
    locations_file: Option<&Path>,
) -> Result<Vec<String>> {
    let mut identifiers: Vec<String> = locations
        .iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();

    if let Some(path) = locations_file {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::generic(format!(
                "Failed to read locations file {}: {}",
                path.display(),
                e
            ))
        })?;
        let from_file = parse_locations(&content);
        debug!(
            "Read {} locations from {}",
            from_file.len(),
            path.display()
        );
        identifiers.extend(from_file);
    }

    Ok(identifiers)
}

/// One identifier per line; blank lines and `#` comments are skipped
pub fn parse_locations(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

async fn write_output(properties: &[Property], output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(properties)?;

    match output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            info!("Wrote {} properties to {}", properties.len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
