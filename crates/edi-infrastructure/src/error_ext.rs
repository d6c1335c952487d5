//! Configuration error context
//!
//! Turns figment, TOML and file-system failures into domain errors that name
//! the offending configuration key or file.

use std::io;
use std::path::Path;

use edi_domain::error::{Error, Result};

/// Context for figment extraction failures
///
/// ```ignore
/// let config: AppConfig = figment.extract().extract_context(Some(&path))?;
/// // Invalid configuration at `synthesis.reuse_subtypes` (TOML file edi.toml): ...
/// ```
pub trait ExtractContext<T> {
    /// Name the failing key and where its value came from
    ///
    /// `file` is reported when figment does not know the value's origin.
    fn extract_context(self, file: Option<&Path>) -> Result<T>;
}

impl<T> ExtractContext<T> for std::result::Result<T, figment::Error> {
    fn extract_context(self, file: Option<&Path>) -> Result<T> {
        self.map_err(|err| {
            let key = if err.path.is_empty() {
                "<root>".to_string()
            } else {
                err.path.join(".")
            };
            let origin = match (&err.metadata, file) {
                (Some(metadata), _) => match &metadata.source {
                    Some(source) => format!("{} {source}", metadata.name),
                    None => metadata.name.to_string(),
                },
                (None, Some(file)) => file.display().to_string(),
                (None, None) => "defaults".to_string(),
            };
            Error::configuration(format!(
                "Invalid configuration at `{key}` ({origin}): {}",
                err.kind
            ))
        })
    }
}

/// Context for reading, writing and serializing a configuration file
pub trait ConfigFileContext<T> {
    /// Attach the attempted `action` and the file it targeted
    fn config_file_context(self, action: &str, path: &Path) -> Result<T>;
}

impl<T> ConfigFileContext<T> for std::result::Result<T, io::Error> {
    fn config_file_context(self, action: &str, path: &Path) -> Result<T> {
        self.map_err(|err| {
            Error::io_with_source(
                format!("Failed to {action} configuration file {}", path.display()),
                err,
            )
        })
    }
}

impl<T> ConfigFileContext<T> for std::result::Result<T, toml::ser::Error> {
    fn config_file_context(self, action: &str, path: &Path) -> Result<T> {
        self.map_err(|err| {
            Error::configuration_with_source(
                format!("Failed to {action} configuration for {}", path.display()),
                err,
            )
        })
    }
}
