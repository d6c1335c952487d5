//! Service container
//!
//! A small registration table and resolver the synthesis engine plugs into.
//! Registrations are [`ServiceDescriptor`](edi_domain::ServiceDescriptor)s;
//! the provider resolves a runtime type's constructor parameters by matching
//! each parameter type against registered service kinds.

pub mod collection;
pub mod provider;

pub use collection::ServiceCollection;
pub use provider::ServiceProvider;
