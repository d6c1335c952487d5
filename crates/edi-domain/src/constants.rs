//! Domain layer constants
//!
//! Naming conventions shared by the engine and the infrastructure layer.

/// Default prefix of synthesized subtype names (`DI_InjectionService`)
pub const DEFAULT_TYPE_NAME_PREFIX: &str = "DI_";

/// Method name used to identify constructors in diagnostics (`InjectionService::new`)
pub const CONSTRUCTOR_NAME: &str = "new";
