//! Settings, logging and storage handles shared by the handlers.

use anyhow::{Context, Result};
use joinery::domain::settings::Settings;
use joinery::kernel::config::load_config;
use joinery::storage::Storage;
use joinery_logger::{Logger, parse_level};
use std::path::Path;

/// Loads settings from the config file (optional) and `JOINERY__` environment overrides.
///
/// # Errors
/// Returns an error if the file exists but is malformed.
pub fn load_settings(path: &Path) -> Result<Settings> {
    load_config(Some(path)).context("Configuration is malformed")
}

/// Initializes console logging (stderr) and, when configured, file logging.
///
/// # Errors
/// Returns an error for an unknown log level or a logger that cannot start.
pub fn init_logger(settings: &Settings, verbose: u8) -> Result<Logger> {
    let level = parse_level(&settings.logging.level).context("Invalid logging settings")?;

    let builder = Logger::builder().name("joinery").level(level).verbosity(verbose);
    let logger = match &settings.logging.directory {
        Some(directory) => builder.path(directory).json(settings.logging.json).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}

/// The output directory, created on first use.
///
/// # Errors
/// Returns an error if the directory cannot be created or resolved.
pub async fn output_storage(settings: &Settings) -> Result<Storage> {
    let root = &settings.generator.output_dir;
    Storage::builder()
        .root(root)
        .connect()
        .await
        .with_context(|| format!("Output directory {} is not usable", root.display()))
}

/// The schema directory; it must already exist.
///
/// # Errors
/// Returns an error if the directory is missing.
pub async fn schema_storage(settings: &Settings) -> Result<Storage> {
    let root = &settings.generator.schema_dir;
    Storage::builder()
        .root(root)
        .create(false)
        .connect()
        .await
        .with_context(|| format!("Schema directory {} is not readable", root.display()))
}
