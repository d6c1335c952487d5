//! Configuration
//!
//! Layered configuration: built-in defaults, then a TOML file, then
//! `EDI_`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::{AppConfig, LoggingConfig, SynthesisConfig};
