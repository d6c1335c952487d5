//! Class descriptors
//!
//! The enumeration capability the engine consumes: a class's fields, properties,
//! methods, constructors and the markers attached to each. Descriptors are immutable
//! once built and cheap to clone (every closure is shared).

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::constants::CONSTRUCTOR_NAME;
use crate::error::{Error, Result};
use crate::marker::{Marker, MarkerKind, MarkerSet};
use crate::ports::MethodBody;
use crate::value::{Value, ValueType};

/// Type-erased struct state of an instance
pub type State = dyn Any + Send + Sync;

pub(crate) type AllocateFn = dyn Fn() -> Box<State> + Send + Sync;
pub(crate) type InitFn = dyn Fn(&mut State) -> bool + Send + Sync;
pub(crate) type SetterFn =
    dyn Fn(&mut State, &Value) -> std::result::Result<(), AccessError> + Send + Sync;

/// Failure to write a member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// The state is not an instance of the declaring class
    Target,
    /// The value does not convert to the member type
    Value,
    /// The member has no setter
    ReadOnly,
}

/// Kind of class member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Plain field, assigned directly
    Field,
    /// Property, assigned through its setter
    Property,
    /// Method
    Method,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field => f.write_str("field"),
            Self::Property => f.write_str("property"),
            Self::Method => f.write_str("method"),
        }
    }
}

/// Identity of a method: declaring class and method name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodIdentity {
    class: String,
    method: String,
}

impl MethodIdentity {
    /// Create a method identity
    pub fn new(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
        }
    }

    /// Identity of a class's constructor
    pub fn constructor(class: impl Into<String>) -> Self {
        Self::new(class, CONSTRUCTOR_NAME)
    }

    /// Declaring class name
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Method name
    pub fn method(&self) -> &str {
        &self.method
    }
}

impl fmt::Display for MethodIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.class, self.method)
    }
}

/// A field declaration
#[derive(Clone)]
pub struct FieldDescriptor {
    pub(crate) name: String,
    pub(crate) value_type: ValueType,
    pub(crate) markers: Vec<Marker>,
    pub(crate) setter: Arc<SetterFn>,
}

impl FieldDescriptor {
    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared field type
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Markers attached to the field
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Whether the field carries the injection marker
    pub fn is_injectable(&self) -> bool {
        self.markers.iter().any(Marker::is_inject)
    }

    /// Store a value directly into the field
    pub fn assign(&self, state: &mut State, value: &Value) -> std::result::Result<(), AccessError> {
        (self.setter)(state, value)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("markers", &self.markers)
            .finish()
    }
}

/// A property declaration
#[derive(Clone)]
pub struct PropertyDescriptor {
    pub(crate) name: String,
    pub(crate) value_type: ValueType,
    pub(crate) markers: Vec<Marker>,
    pub(crate) setter: Option<Arc<SetterFn>>,
}

impl PropertyDescriptor {
    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared property type
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Markers attached to the property
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Whether the property carries the injection marker
    pub fn is_injectable(&self) -> bool {
        self.markers.iter().any(Marker::is_inject)
    }

    /// Whether the property exposes a setter
    pub fn has_setter(&self) -> bool {
        self.setter.is_some()
    }

    /// Store a value through the property setter
    pub fn set(&self, state: &mut State, value: &Value) -> std::result::Result<(), AccessError> {
        match &self.setter {
            Some(setter) => setter(state, value),
            None => Err(AccessError::ReadOnly),
        }
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("has_setter", &self.has_setter())
            .field("markers", &self.markers)
            .finish()
    }
}

/// A method parameter
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    pub(crate) position: usize,
    pub(crate) name: Option<String>,
    pub(crate) value_type: ValueType,
    pub(crate) markers: Vec<Marker>,
}

impl ParameterDescriptor {
    /// Zero-based position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Declared name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Declared parameter type
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Markers attached to the parameter
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

/// A method declaration
pub struct MethodDescriptor {
    pub(crate) identity: MethodIdentity,
    pub(crate) parameters: Vec<ParameterDescriptor>,
    pub(crate) return_type: ValueType,
    pub(crate) is_virtual: bool,
    pub(crate) markers: Vec<Marker>,
    pub(crate) body: Arc<dyn MethodBody>,
}

impl MethodDescriptor {
    /// Method identity
    pub fn identity(&self) -> &MethodIdentity {
        &self.identity
    }

    /// Method name
    pub fn name(&self) -> &str {
        self.identity.method()
    }

    /// Parameters, in order
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Declared parameter types, in order
    pub fn parameter_types(&self) -> Vec<ValueType> {
        self.parameters.iter().map(|p| p.value_type).collect()
    }

    /// Declared return type
    pub fn return_type(&self) -> ValueType {
        self.return_type
    }

    /// Whether the method can be overridden
    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    /// Markers attached to the method
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Whether the method carries a marker of the given kind
    pub fn has_marker(&self, kind: MarkerKind) -> bool {
        self.markers.has_kind(kind)
    }

    /// The original method body
    pub fn body(&self) -> &Arc<dyn MethodBody> {
        &self.body
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("identity", &self.identity)
            .field("parameters", &self.parameters)
            .field("return_type", &self.return_type)
            .field("is_virtual", &self.is_virtual)
            .field("markers", &self.markers)
            .finish()
    }
}

/// A field or property tagged for constructor injection
#[derive(Debug, Clone)]
pub enum InjectionTarget {
    /// Injected field
    Field(FieldDescriptor),
    /// Injected property
    Property(PropertyDescriptor),
}

impl InjectionTarget {
    /// Member name
    pub fn name(&self) -> &str {
        match self {
            Self::Field(field) => field.name(),
            Self::Property(property) => property.name(),
        }
    }

    /// Member kind
    pub fn kind(&self) -> MemberKind {
        match self {
            Self::Field(_) => MemberKind::Field,
            Self::Property(_) => MemberKind::Property,
        }
    }

    /// Declared member type
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Field(field) => field.value_type(),
            Self::Property(property) => property.value_type(),
        }
    }

    /// Store a value: direct assignment for fields, the setter for properties
    pub fn assign(&self, state: &mut State, value: &Value) -> std::result::Result<(), AccessError> {
        match self {
            Self::Field(field) => field.assign(state, value),
            Self::Property(property) => property.set(state, value),
        }
    }
}

/// A class declaration
pub struct ClassDescriptor {
    pub(crate) name: String,
    pub(crate) state_type: TypeId,
    pub(crate) state_type_name: &'static str,
    pub(crate) markers: Vec<Marker>,
    pub(crate) fields: Vec<FieldDescriptor>,
    pub(crate) properties: Vec<PropertyDescriptor>,
    pub(crate) methods: Vec<Arc<MethodDescriptor>>,
    pub(crate) allocate: Arc<AllocateFn>,
    pub(crate) default_constructor: Option<Arc<InitFn>>,
}

impl ClassDescriptor {
    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identity of the Rust type holding instance state
    pub fn state_type_id(&self) -> TypeId {
        self.state_type
    }

    /// Name of the Rust type holding instance state
    pub fn state_type_name(&self) -> &'static str {
        self.state_type_name
    }

    /// Class-level markers
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Fields, in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Properties, in declaration order
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Methods, in declaration order
    pub fn methods(&self) -> &[Arc<MethodDescriptor>] {
        &self.methods
    }

    /// Look up a method by name
    pub fn method(&self, name: &str) -> Option<&Arc<MethodDescriptor>> {
        self.methods.iter().find(|m| m.name() == name)
    }

    /// Whether the class exposes an accessible no-argument constructor
    pub fn has_default_constructor(&self) -> bool {
        self.default_constructor.is_some()
    }

    /// Fields then properties carrying the injection marker, each group in declaration order
    pub fn injection_targets(&self) -> Vec<InjectionTarget> {
        let fields = self
            .fields
            .iter()
            .filter(|f| f.is_injectable())
            .cloned()
            .map(InjectionTarget::Field);
        let properties = self
            .properties
            .iter()
            .filter(|p| p.is_injectable())
            .cloned()
            .map(InjectionTarget::Property);
        fields.chain(properties).collect()
    }

    /// Allocate default state, without running any constructor
    pub fn allocate(&self) -> Box<State> {
        (self.allocate)()
    }

    /// Run the no-argument constructor over allocated state
    pub fn run_default_constructor(&self, state: &mut State) -> Result<()> {
        let constructor =
            self.default_constructor
                .as_ref()
                .ok_or_else(|| Error::MissingBaseConstructor {
                    class: self.name.clone(),
                })?;
        if constructor(state) {
            Ok(())
        } else {
            Err(Error::TargetTypeMismatch {
                method: MethodIdentity::constructor(&self.name).to_string(),
                expected: self.state_type_name.to_string(),
                found: "foreign state".to_string(),
            })
        }
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("state_type", &self.state_type_name)
            .field("markers", &self.markers)
            .field("fields", &self.fields)
            .field("properties", &self.properties)
            .field("methods", &self.methods)
            .field("has_default_constructor", &self.has_default_constructor())
            .finish()
    }
}
