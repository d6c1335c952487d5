//! Configuration types

use std::path::PathBuf;

use edi_application::enhance::SynthesisOptions;
use edi_domain::constants::DEFAULT_TYPE_NAME_PREFIX;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LOG_LEVEL;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Subtype synthesis settings
    pub synthesis: SynthesisConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Subtype synthesis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Prefix of synthesized subtype names
    pub type_name_prefix: String,

    /// Share one subtype between registrations of the same class
    pub reuse_subtypes: bool,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            type_name_prefix: DEFAULT_TYPE_NAME_PREFIX.to_string(),
            reuse_subtypes: true,
        }
    }
}

impl From<&SynthesisConfig> for SynthesisOptions {
    fn from(config: &SynthesisConfig) -> Self {
        Self {
            type_name_prefix: config.type_name_prefix.clone(),
            reuse_subtypes: config.reuse_subtypes,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,

    /// Log to a daily-rolling file in addition to stdout
    pub file_output: Option<PathBuf>,

    /// Level for synthesis pass events, `level` when unset
    pub synthesis_level: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
            synthesis_level: None,
        }
    }
}
