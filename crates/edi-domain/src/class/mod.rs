//! Class metamodel
//!
//! Explicitly declared classes stand in for reflected ones: [`ClassBuilder`] records
//! members with typed accessors, [`ClassDescriptor`] exposes them to the engine.

pub mod builder;
pub mod descriptor;

pub use builder::ClassBuilder;
pub use descriptor::{
    AccessError, ClassDescriptor, FieldDescriptor, InjectionTarget, MemberKind, MethodDescriptor,
    MethodIdentity, ParameterDescriptor, PropertyDescriptor, State,
};
