//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns around the synthesis engine.
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | TOML + environment configuration through figment |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |
//!
//! ### Container
//! | Module | Description |
//! |--------|-------------|
//! | [`container`] | Service collection and provider |
//! | [`bootstrap`] | `add_enhanced_service_provider` registration hook |

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod container;
pub mod error_ext;
pub mod logging;

// Re-export commonly used types
pub use bootstrap::ServiceCollectionExt;
pub use config::{AppConfig, ConfigLoader};
pub use container::{ServiceCollection, ServiceProvider};
pub use error_ext::{ConfigFileContext, ExtractContext};
