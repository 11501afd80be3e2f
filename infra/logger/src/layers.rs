use crate::builder::LoggerConfig;
use crate::error::LoggerError;
use std::io::IsTerminal;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::{EnvFilter, Layer, Registry};

pub(crate) type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

const LOG_FILE_SUFFIX: &str = "log";

/// Compact human-readable events on stderr; colored only on a terminal.
pub(crate) fn console_layer() -> BoxedLayer {
    let ansi = std::io::stderr().is_terminal();
    layer().compact().with_writer(std::io::stderr).with_ansi(ansi).boxed()
}

/// Rolling file output through a non-blocking writer.
pub(crate) fn file_layer(
    config: &LoggerConfig,
    directory: &Path,
    name: &str,
) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    std::fs::create_dir_all(directory).map_err(|e| LoggerError::Internal {
        message: e.to_string().into(),
        context: Some(format!("Failed to create log directory: {}", directory.display()).into()),
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(config.rotation.clone())
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(config.max_files)
        .build(directory)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let plain = layer().with_writer(writer).with_ansi(false);
    let boxed = if config.json { plain.json().boxed() } else { plain.boxed() };
    Ok((boxed, guard))
}

/// The configured level as default directive, refined by an explicit filter or `RUST_LOG`.
pub(crate) fn env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    match &config.env_filter {
        None => Ok(builder.from_env_lossy()),
        Some(filter) => builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
            message: format!("Invalid env filter '{filter}': {e}").into(),
            context: None,
        }),
    }
}
