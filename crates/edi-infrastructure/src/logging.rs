//! Structured logging with tracing
//!
//! The filter starts from the configured level and can give the synthesis
//! engine (`edi_application`) its own level, so a pass can be traced
//! member by member without raising the level of the whole process.
//! `EDI_LOG` replaces the computed filter entirely.
//!
//! ```toml
//! [logging]
//! level = "warn"
//! synthesis_level = "debug"
//! ```

use std::path::Path;

use edi_domain::error::{Error, Result};

// Re-export LoggingConfig for convenience
pub use crate::config::LoggingConfig;
use crate::constants::{DEFAULT_LOG_FILE_STEM, LOG_ENV_VAR, SYNTHESIS_LOG_TARGET};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize logging with the provided configuration
///
/// Fails if a level is invalid or a global subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;

    let mut layers = vec![stdout_layer(config.json_format)];
    if let Some(path) = &config.file_output {
        layers.push(file_layer(path, config.json_format));
    }

    tracing_subscriber::registry()
        .with(layers.with_filter(filter))
        .try_init()
        .map_err(|err| Error::Infrastructure {
            message: format!("Failed to install tracing subscriber: {err}"),
            source: Some(Box::new(err)),
        })?;

    info!(
        level = %config.level,
        synthesis_level = config.synthesis_level.as_deref().unwrap_or(&config.level),
        "Logging initialized"
    );
    Ok(())
}

/// Event filter for `config`, unless `EDI_LOG` is set
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV_VAR) {
        return Ok(filter);
    }
    let mut filter = EnvFilter::default().add_directive(parse_log_level(&config.level)?.into());
    if let Some(level) = &config.synthesis_level {
        let level = parse_log_level(level)?;
        let directive = format!("{SYNTHESIS_LOG_TARGET}={}", level.as_str().to_ascii_lowercase());
        filter = filter.add_directive(directive.parse().map_err(|err| {
            Error::configuration_with_source(format!("Invalid log directive {directive}"), err)
        })?);
    }
    Ok(filter)
}

fn stdout_layer(json: bool) -> BoxedLayer {
    let layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);
    if json { layer.json().boxed() } else { layer.boxed() }
}

fn file_layer(path: &Path, json: bool) -> BoxedLayer {
    let appender = tracing_appender::rolling::daily(
        path.parent().unwrap_or_else(|| Path::new(".")),
        path.file_stem()
            .unwrap_or_else(|| std::ffi::OsStr::new(DEFAULT_LOG_FILE_STEM)),
    );
    let layer = fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true);
    if json { layer.json().boxed() } else { layer.boxed() }
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::configuration(format!(
            "Invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}

/// Log configuration loading status
pub fn log_config_loaded(config_path: &Path, found: bool) {
    if found {
        info!(path = %config_path.display(), "Configuration file loaded");
    } else {
        warn!(path = %config_path.display(), "Configuration file not found, using defaults");
    }
}
