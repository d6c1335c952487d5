//! Runtime types and instances
//!
//! A [`RuntimeType`] pairs a class descriptor with a dispatch table keyed by method
//! name and a constructor strategy. Original classes get a table pointing at their own
//! bodies; synthesized subtypes inherit their base's table and replace entries.
//! Every call on an [`Instance`] goes through its runtime type's table.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use crate::class::{ClassDescriptor, MethodDescriptor, MethodIdentity, State};
use crate::error::{Error, Result};
use crate::marker::Marker;
use crate::ports::{InstanceConstructor, MethodDispatch};
use crate::value::{Arguments, Boxable, Value, ValueType};

/// Dispatch entry running a method's own body
struct OriginalMethod {
    method: Arc<MethodDescriptor>,
}

impl MethodDispatch for OriginalMethod {
    fn dispatch(&self, target: &Instance, args: &[Value]) -> Result<Value> {
        self.method.body().call(target, args)
    }
}

/// Constructor of an original class: allocate, then run the no-argument constructor
struct DefaultConstructor {
    class: Arc<ClassDescriptor>,
}

impl InstanceConstructor for DefaultConstructor {
    fn parameter_types(&self) -> Vec<ValueType> {
        Vec::new()
    }

    fn construct(&self, runtime_type: &Arc<RuntimeType>, args: Vec<Value>) -> Result<Instance> {
        if !args.is_empty() {
            return Err(Error::ArgumentCountMismatch {
                method: MethodIdentity::constructor(runtime_type.name()).to_string(),
                expected: 0,
                found: args.len(),
            });
        }
        let mut state = self.class.allocate();
        self.class.run_default_constructor(&mut *state)?;
        Instance::new(Arc::clone(runtime_type), state)
    }
}

/// A class as seen at runtime
pub struct RuntimeType {
    name: String,
    class: Arc<ClassDescriptor>,
    base: Option<Arc<RuntimeType>>,
    constructor: Arc<dyn InstanceConstructor>,
    dispatch: HashMap<String, Arc<dyn MethodDispatch>>,
}

impl RuntimeType {
    /// Runtime type of an original class
    pub fn original(class: ClassDescriptor) -> Arc<Self> {
        Self::from_class(Arc::new(class))
    }

    /// Runtime type of an already shared class descriptor
    pub fn from_class(class: Arc<ClassDescriptor>) -> Arc<Self> {
        let dispatch = class
            .methods()
            .iter()
            .map(|method| {
                let entry: Arc<dyn MethodDispatch> = Arc::new(OriginalMethod {
                    method: Arc::clone(method),
                });
                (method.name().to_string(), entry)
            })
            .collect();
        Arc::new(Self {
            name: class.name().to_string(),
            constructor: Arc::new(DefaultConstructor {
                class: Arc::clone(&class),
            }),
            class,
            base: None,
            dispatch,
        })
    }

    /// Derive a subtype of `base`
    ///
    /// The subtype inherits the base's constructor unless one is given, and the base's
    /// dispatch table with `overrides` replacing the named entries.
    pub fn derive(
        base: &Arc<RuntimeType>,
        name: impl Into<String>,
        constructor: Option<Arc<dyn InstanceConstructor>>,
        overrides: Vec<(String, Arc<dyn MethodDispatch>)>,
    ) -> Arc<Self> {
        let mut dispatch = base.dispatch.clone();
        dispatch.extend(overrides);
        Arc::new(Self {
            name: name.into(),
            class: Arc::clone(&base.class),
            base: Some(Arc::clone(base)),
            constructor: constructor.unwrap_or_else(|| Arc::clone(&base.constructor)),
            dispatch,
        })
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Descriptor of the declaring (original) class
    pub fn class(&self) -> &Arc<ClassDescriptor> {
        &self.class
    }

    /// Base type, `None` for original classes
    pub fn base(&self) -> Option<&Arc<RuntimeType>> {
        self.base.as_ref()
    }

    /// Whether this type was synthesized from a base
    pub fn is_synthesized(&self) -> bool {
        self.base.is_some()
    }

    /// Whether `other` is this type or one of its bases
    pub fn is_derived_from(&self, other: &RuntimeType) -> bool {
        let mut current = Some(self);
        while let Some(runtime_type) = current {
            if std::ptr::eq(runtime_type, other) {
                return true;
            }
            current = runtime_type.base.as_deref();
        }
        false
    }

    /// Class-level markers, shared with the original class
    pub fn markers(&self) -> &[Marker] {
        self.class.markers()
    }

    /// Method declaration by name
    pub fn method(&self, name: &str) -> Option<&Arc<MethodDescriptor>> {
        self.class.method(name)
    }

    /// Dispatch table entry by method name
    pub fn dispatch_entry(&self, name: &str) -> Option<&Arc<dyn MethodDispatch>> {
        self.dispatch.get(name)
    }

    /// Whether the named method's entry replaces the original body
    pub fn is_overridden(&self, name: &str) -> bool {
        self.dispatch
            .get(name)
            .is_some_and(|entry| entry.is_override())
    }

    /// Positional constructor parameter types
    pub fn constructor_parameters(&self) -> Vec<ValueType> {
        self.constructor.parameter_types()
    }

    /// Create an instance
    pub fn construct(self: &Arc<Self>, args: Vec<Value>) -> Result<Instance> {
        self.constructor.construct(self, args)
    }
}

impl fmt::Debug for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut overridden: Vec<&str> = self
            .dispatch
            .iter()
            .filter(|(_, entry)| entry.is_override())
            .map(|(name, _)| name.as_str())
            .collect();
        overridden.sort_unstable();
        f.debug_struct("RuntimeType")
            .field("name", &self.name)
            .field("class", &self.class.name())
            .field("base", &self.base.as_ref().map(|b| b.name()))
            .field("constructor", &self.constructor_parameters())
            .field("overridden", &overridden)
            .finish()
    }
}

/// An object: runtime type plus boxed state
pub struct Instance {
    runtime_type: Arc<RuntimeType>,
    state: Box<State>,
}

impl Instance {
    /// Pair constructed state with its runtime type
    pub fn new(runtime_type: Arc<RuntimeType>, state: Box<State>) -> Result<Self> {
        let found = (*state).type_id();
        if found != runtime_type.class().state_type_id() {
            return Err(Error::internal(format!(
                "state of {} does not match class state type {}",
                runtime_type.name(),
                runtime_type.class().state_type_name()
            )));
        }
        Ok(Self {
            runtime_type,
            state,
        })
    }

    /// Runtime type of the instance
    pub fn runtime_type(&self) -> &Arc<RuntimeType> {
        &self.runtime_type
    }

    /// Runtime type name
    pub fn type_name(&self) -> &str {
        self.runtime_type.name()
    }

    /// Borrow the state as `T`
    pub fn state<T: Any>(&self) -> Option<&T> {
        self.state.downcast_ref::<T>()
    }

    /// Identity of the state type
    pub fn state_type_id(&self) -> TypeId {
        (*self.state).type_id()
    }

    /// Whether the state is a `T`
    pub fn is_instance_of<T: Any>(&self) -> bool {
        self.state.is::<T>()
    }

    /// Virtual call through the dispatch table
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        let entry =
            self.runtime_type
                .dispatch_entry(method)
                .ok_or_else(|| Error::UnknownMethod {
                    class: self.runtime_type.name().to_string(),
                    method: method.to_string(),
                })?;
        entry.dispatch(self, args)
    }

    /// Typed virtual call
    pub fn invoke<A: Arguments, R: Boxable>(&self, method: &str, args: A) -> Result<R> {
        let result = self.call(method, &args.into_values())?;
        R::from_value(&result).ok_or_else(|| Error::ReturnTypeMismatch {
            method: MethodIdentity::new(self.runtime_type.name(), method).to_string(),
            expected: R::value_type().name().to_string(),
            found: result.type_name().to_string(),
        })
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("runtime_type", &self.runtime_type.name())
            .finish_non_exhaustive()
    }
}

/// The receiver handed to method bodies: typed state plus the live instance
///
/// Dereferences to the state. Calls made through [`Receiver::call`] dispatch
/// virtually, so an original body calling a sibling method reaches its override.
pub struct Receiver<'a, T> {
    instance: &'a Instance,
    state: &'a T,
}

impl<'a, T> Receiver<'a, T> {
    /// Create a receiver over a live instance and its state
    pub fn new(instance: &'a Instance, state: &'a T) -> Self {
        Self { instance, state }
    }

    /// The live instance
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Virtual call on the receiver
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        self.instance.call(method, args)
    }

    /// Typed virtual call on the receiver
    pub fn invoke<A: Arguments, R: Boxable>(&self, method: &str, args: A) -> Result<R> {
        self.instance.invoke(method, args)
    }
}

impl<T> Clone for Receiver<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Receiver<'_, T> {}

impl<T> Deref for Receiver<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.state
    }
}

/// Shared reference to an instance whose state is a `T`
///
/// The typed form of a reference-typed dependency: inject an `Object<Dependency>` to
/// read the dependency's state directly and still call it virtually.
pub struct Object<T> {
    instance: Arc<Instance>,
    _state: PhantomData<fn() -> T>,
}

impl<T: Any> Object<T> {
    /// Wrap an instance, `None` unless its state is a `T`
    pub fn new(instance: Arc<Instance>) -> Option<Self> {
        instance.is_instance_of::<T>().then(|| Self {
            instance,
            _state: PhantomData,
        })
    }

    /// The underlying instance
    pub fn instance(&self) -> &Arc<Instance> {
        &self.instance
    }

    /// Unwrap the underlying instance
    pub fn into_instance(self) -> Arc<Instance> {
        self.instance
    }

    /// Typed virtual call
    pub fn invoke<A: Arguments, R: Boxable>(&self, method: &str, args: A) -> Result<R> {
        self.instance.invoke(method, args)
    }
}

impl<T> Clone for Object<T> {
    fn clone(&self) -> Self {
        Self {
            instance: Arc::clone(&self.instance),
            _state: PhantomData,
        }
    }
}

impl<T: Any> Deref for Object<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self.instance.state::<T>() {
            Some(state) => state,
            // Object::new only admits instances whose state is a T
            None => unreachable!("Object<{}> over foreign state", std::any::type_name::<T>()),
        }
    }
}

impl<T> fmt::Debug for Object<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Object").field(&self.instance).finish()
    }
}
