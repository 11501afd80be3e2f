use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level application settings shared across the generator and the CLI.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SettingsInner {
    pub generator: GeneratorSettings,
    pub logging: LoggingSettings,
}

/// Thin Arc-wrapped settings for inexpensive cloning into generation tasks.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(flatten, default)]
    inner: Arc<SettingsInner>,
}

impl Deref for Settings {
    type Target = SettingsInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for Settings {
    fn deref_mut(&mut self) -> &mut SettingsInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Where schema facts are read from and domain files are written to.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub schema_dir: PathBuf,
    pub output_dir: PathBuf,
    /// File extension for both schema facts and domain files.
    pub extension: String,
    /// Upper bound on schemas processed at the same time.
    pub concurrency: usize,
}

/// Log output knobs; `RUST_LOG` still takes precedence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
    pub directory: Option<PathBuf>,
}

// --- Default ---

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from("schemas"),
            output_dir: PathBuf::from("domains"),
            extension: "toml".to_owned(),
            concurrency: 4,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_owned(), json: false, directory: None }
    }
}
