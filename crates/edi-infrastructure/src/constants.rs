//! Infrastructure constants

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "EDI";

/// Separator between nested configuration keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "edi.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "edi";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the configured log filter
pub const LOG_ENV_VAR: &str = "EDI_LOG";

/// Log target of the synthesis engine
pub const SYNTHESIS_LOG_TARGET: &str = "edi_application";

/// File stem of rolling log files when the configured path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "edi";

/// Separator used when printing a resolution path
pub const RESOLUTION_PATH_SEPARATOR: &str = " -> ";
