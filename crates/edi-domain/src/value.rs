//! Boxed values and declared value types
//!
//! Every argument, return value and injected dependency crosses the engine as a
//! [`Value`]: a shared, type-erased box that remembers the name of the type it holds.
//! Declarations (parameters, fields, properties, return types) carry a [`ValueType`]
//! describing what they accept.
//!
//! Conversion follows boxing semantics:
//!
//! - value-typed declarations ([`PassingKind::Value`]) unwrap a clone of the boxed value
//! - reference-typed declarations ([`PassingKind::Reference`]) check the boxed value and
//!   share it without copying (`Arc<T>`, [`Object<T>`], `Arc<Instance>`)

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::object::{Instance, Object};

/// How a declared type receives boxed values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassingKind {
    /// Copied out of the box on conversion
    Value,
    /// Shared by reference; conversion is a checked cast
    Reference,
}

/// Declared type of a parameter, member or return value
#[derive(Clone, Copy)]
pub struct ValueType {
    id: TypeId,
    name: &'static str,
    kind: PassingKind,
}

impl ValueType {
    /// Value-typed declaration of `T`
    pub fn value<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind: PassingKind::Value,
        }
    }

    /// Reference-typed declaration of `T`
    pub fn reference<T: ?Sized + Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind: PassingKind::Reference,
        }
    }

    /// The unit type, used for methods without a result
    pub fn unit() -> Self {
        Self::value::<()>()
    }

    /// Type identity
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Passing kind
    pub fn kind(&self) -> PassingKind {
        self.kind
    }

    /// Whether this is the unit type
    pub fn is_unit(&self) -> bool {
        self.id == TypeId::of::<()>()
    }

    /// Whether a boxed value converts to this declared type
    ///
    /// Reference declarations naming a class state type also accept instances of
    /// that class and of any runtime type derived from it.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.runtime_type_id() == self.id {
            return true;
        }
        match self.kind {
            PassingKind::Value => false,
            PassingKind::Reference => value
                .downcast_ref::<Instance>()
                .is_some_and(|instance| instance.state_type_id() == self.id),
        }
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.kind == other.kind
    }
}

impl Eq for ValueType {}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PassingKind::Value => write!(f, "{}", self.name),
            PassingKind::Reference => write!(f, "&{}", self.name),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A boxed, shareable value
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    /// Box a value
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Box an already shared value without copying it
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The boxed unit value
    pub fn unit() -> Self {
        Self::new(())
    }

    /// Name of the boxed type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Identity of the boxed type
    pub fn runtime_type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }

    /// Whether the box holds a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrow the boxed value as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Share the boxed value as `Arc<T>`
    pub fn downcast_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Unwrap into a `T`, converting through [`Boxable`]
    pub fn get<T: Boxable>(&self) -> Option<T> {
        T::from_value(self)
    }

    /// Whether two values share the same box
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>", self.type_name)
    }
}

/// Conversion between Rust values and boxed [`Value`]s
pub trait Boxable: Sized + Send + Sync + 'static {
    /// The declared type this Rust type stands for
    fn value_type() -> ValueType;

    /// Box the value
    fn into_value(self) -> Value;

    /// Convert a boxed value, `None` when the box does not hold a compatible value
    fn from_value(value: &Value) -> Option<Self>;
}

/// Implement [`Boxable`] for `Clone` types passed by value
///
/// ```ignore
/// #[derive(Clone)]
/// struct Greeting(String);
/// edi_domain::boxable_value!(Greeting);
/// ```
#[macro_export]
macro_rules! boxable_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::value::Boxable for $ty {
                fn value_type() -> $crate::value::ValueType {
                    $crate::value::ValueType::value::<$ty>()
                }

                fn into_value(self) -> $crate::value::Value {
                    $crate::value::Value::new(self)
                }

                fn from_value(value: &$crate::value::Value) -> Option<Self> {
                    value.downcast_ref::<$ty>().cloned()
                }
            }
        )+
    };
}

boxable_value!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
);

impl<T: Any + Send + Sync> Boxable for Arc<T> {
    fn value_type() -> ValueType {
        ValueType::reference::<T>()
    }

    fn into_value(self) -> Value {
        Value::from_arc(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.downcast_arc::<T>()
    }
}

impl<T: Any + Send + Sync> Boxable for Object<T> {
    fn value_type() -> ValueType {
        ValueType::reference::<T>()
    }

    fn into_value(self) -> Value {
        Value::from_arc(self.into_instance())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.downcast_arc::<Instance>().and_then(Object::new)
    }
}

/// A positional argument list
///
/// Implemented for tuples of up to eight [`Boxable`] values; `()` is the empty list.
pub trait Arguments: Sized {
    /// Declared parameter types, in order
    fn parameter_types() -> Vec<ValueType>;

    /// Convert boxed arguments, `Err(position)` at the first one that does not convert
    fn from_values(values: &[Value]) -> std::result::Result<Self, usize>;

    /// Box every argument, in order
    fn into_values(self) -> Vec<Value>;
}

impl Arguments for () {
    fn parameter_types() -> Vec<ValueType> {
        Vec::new()
    }

    fn from_values(_values: &[Value]) -> std::result::Result<Self, usize> {
        Ok(())
    }

    fn into_values(self) -> Vec<Value> {
        Vec::new()
    }
}

macro_rules! impl_arguments {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Boxable),+> Arguments for ($($name,)+) {
            fn parameter_types() -> Vec<ValueType> {
                vec![$($name::value_type()),+]
            }

            fn from_values(values: &[Value]) -> std::result::Result<Self, usize> {
                Ok(($(
                    values
                        .get($idx)
                        .and_then($name::from_value)
                        .ok_or::<usize>($idx)?,
                )+))
            }

            fn into_values(self) -> Vec<Value> {
                vec![$(self.$idx.into_value()),+]
            }
        }
    };
}

impl_arguments!(A: 0);
impl_arguments!(A: 0, B: 1);
impl_arguments!(A: 0, B: 1, C: 2);
impl_arguments!(A: 0, B: 1, C: 2, D: 3);
impl_arguments!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_arguments!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_arguments!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_arguments!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
