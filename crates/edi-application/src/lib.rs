//! Application Layer - Enhanced DI
//!
//! The synthesis engine. Given service registrations and the interceptors
//! configured for them, it derives a runtime subtype for every implementation
//! class that declares injection targets or intercepted methods, and rewrites
//! the registrations to point at those subtypes.
//!
//! ## Components
//!
//! | Module | Role |
//! |--------|------|
//! | [`interception`] | interceptor registry and per-call context |
//! | [`invoker`] | call-through to original method bodies |
//! | [`constructor`] | injecting constructors |
//! | [`weaver`] | intercepting overrides |
//! | [`synthesizer`] | per-class subtype synthesis |
//! | [`binder`] | post-synthesis deferred bindings |
//! | [`enhance`] | the synthesis pass over a registration batch |
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `edi-domain`: metamodel, runtime types, errors
//! - `tracing` and `linkme`

pub mod binder;
pub mod constructor;
pub mod enhance;
pub mod interception;
pub mod invoker;
pub mod synthesizer;
pub mod weaver;

pub use binder::DeferredBinder;
pub use constructor::InjectingConstructor;
pub use enhance::{
    EnhancedRegistrations, EnhancerBuilder, PendingBatch, SynthesisOptions, SynthesisPass,
    SynthesisReport,
};
pub use interception::{
    CallContext, INTERCEPTORS, Interceptor, InterceptorEntry, InterceptorRegistry,
    list_registered_interceptors,
};
pub use invoker::Invoker;
pub use synthesizer::ClassSynthesizer;
pub use weaver::InterceptionWeaver;
