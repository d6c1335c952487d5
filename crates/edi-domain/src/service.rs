//! Service registrations
//!
//! The registration data model shared with the container. The engine reads
//! registrations and may only replace their implementation type.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::object::RuntimeType;
use crate::value::{Value, ValueType};

/// Identity of a service
#[derive(Clone, Copy)]
pub struct ServiceKind {
    id: TypeId,
    name: &'static str,
}

impl ServiceKind {
    /// Service identified by the Rust type `S` (a state type, a `dyn Trait`, ...)
    pub fn of<S: ?Sized + Any>() -> Self {
        Self {
            id: TypeId::of::<S>(),
            name: std::any::type_name::<S>(),
        }
    }

    /// Service satisfying a declared value type
    pub fn for_value_type(value_type: ValueType) -> Self {
        Self {
            id: value_type.id(),
            name: value_type.name(),
        }
    }

    /// Type identity
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified service type name
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ServiceKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceKind {}

impl Hash for ServiceKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceKind({})", self.name)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Instance sharing policy of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// One instance per provider
    Singleton,
    /// A new instance per resolution
    Transient,
}

/// What a registration resolves to
#[derive(Clone)]
pub enum Implementation {
    /// Instances of a runtime type, constructed by the container
    Type(Arc<RuntimeType>),
    /// A pre-built value
    Instance(Value),
}

/// A service registration
#[derive(Clone)]
pub struct ServiceDescriptor {
    service: ServiceKind,
    implementation: Implementation,
    lifetime: Lifetime,
}

impl ServiceDescriptor {
    /// Register a runtime type for a service
    pub fn new(service: ServiceKind, implementation: Arc<RuntimeType>, lifetime: Lifetime) -> Self {
        Self {
            service,
            implementation: Implementation::Type(implementation),
            lifetime,
        }
    }

    /// Register a singleton runtime type
    pub fn singleton(service: ServiceKind, implementation: Arc<RuntimeType>) -> Self {
        Self::new(service, implementation, Lifetime::Singleton)
    }

    /// Register a transient runtime type
    pub fn transient(service: ServiceKind, implementation: Arc<RuntimeType>) -> Self {
        Self::new(service, implementation, Lifetime::Transient)
    }

    /// Register a pre-built value
    pub fn instance(service: ServiceKind, value: Value) -> Self {
        Self {
            service,
            implementation: Implementation::Instance(value),
            lifetime: Lifetime::Singleton,
        }
    }

    /// Service kind
    pub fn service(&self) -> ServiceKind {
        self.service
    }

    /// Lifetime
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Implementation
    pub fn implementation(&self) -> &Implementation {
        &self.implementation
    }

    /// Implementation runtime type, `None` for pre-built values
    pub fn implementation_type(&self) -> Option<&Arc<RuntimeType>> {
        match &self.implementation {
            Implementation::Type(runtime_type) => Some(runtime_type),
            Implementation::Instance(_) => None,
        }
    }

    /// Same registration with a replacement implementation type
    pub fn with_implementation_type(&self, implementation: Arc<RuntimeType>) -> Self {
        Self {
            service: self.service,
            implementation: Implementation::Type(implementation),
            lifetime: self.lifetime,
        }
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let implementation = match &self.implementation {
            Implementation::Type(runtime_type) => runtime_type.name().to_string(),
            Implementation::Instance(value) => format!("{value:?}"),
        };
        f.debug_struct("ServiceDescriptor")
            .field("service", &self.service)
            .field("implementation", &implementation)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}
