//! # Enhanced DI - Domain Layer
//!
//! Core types shared by the synthesis engine and the container:
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`value`] | boxed values, declared value types, argument lists |
//! | [`marker`] | markers and marker kinds |
//! | [`class`] | class descriptors and the typed class builder |
//! | [`object`] | runtime types, instances, typed object references |
//! | [`service`] | service registrations |
//! | [`ports`] | dispatch and construction seams implemented by the engine |
//! | [`error`] | the crate-wide error type |

pub mod class;
pub mod constants;
pub mod error;
pub mod marker;
pub mod object;
pub mod ports;
pub mod service;
pub mod value;

pub use class::{ClassBuilder, ClassDescriptor, InjectionTarget, MethodDescriptor, MethodIdentity};
pub use error::{Error, Result};
pub use marker::{Inject, Marker, MarkerKind, MarkerSet};
pub use object::{Instance, Object, Receiver, RuntimeType};
pub use service::{Implementation, Lifetime, ServiceDescriptor, ServiceKind};
pub use value::{Arguments, Boxable, PassingKind, Value, ValueType};
