use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment prefix for overrides, e.g. `JOINERY__GENERATOR__OUTPUT_DIR`.
pub const ENV_PREFIX: &str = "JOINERY";

/// Custom error type for config loading.
#[joinery_derive::joinery_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads `T` from an optional config file layered under `JOINERY__` environment overrides.
///
/// `path` defaults to `"joinery"`; without an extension every format the `config` crate
/// knows is tried (`joinery.toml`, `joinery.yaml`, ...). A missing file is not an error, so
/// `T`'s `#[serde(default)]` values apply. Nested keys use double underscores:
/// `JOINERY__GENERATOR__OUTPUT_DIR=out` sets `generator.output_dir`.
///
/// # Errors
/// When the file exists but does not parse, or the merged values do not fit `T`.
///
/// # Example
/// ```rust
/// use joinery_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// #[serde(default)]
/// struct Generator {
///     concurrency: usize,
/// }
///
/// let cfg: Generator = load_config(Some("config/missing")).unwrap_or_default();
/// assert_eq!(cfg.concurrency, 0);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from("joinery"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    if effective_path.extension().is_some() && !effective_path.exists() {
        debug!(path = %effective_path.display(), "Config file not found, using defaults");
    } else {
        info!(path = %effective_path.display(), "Loading config");
    }

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
