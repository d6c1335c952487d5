//! Typed class builder
//!
//! Classes are declared explicitly instead of being discovered: every member is
//! registered with a typed accessor and markers are attached by member name.
//!
//! ```ignore
//! let class = ClassBuilder::<Greeter>::new("Greeter")
//!     .field("prefix", |g: &mut Greeter, v: String| g.prefix = v)
//!     .inject("prefix")
//!     .virtual_method("greet", |this, (who,): (String,)| format!("{} {who}", this.prefix))
//!     .annotate("greet", Logged)
//!     .build()?;
//! ```

use std::any::Any;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

use super::descriptor::{
    AccessError, ClassDescriptor, FieldDescriptor, InitFn, MethodDescriptor, MethodIdentity,
    ParameterDescriptor, PropertyDescriptor, SetterFn, State,
};
use crate::error::{Error, Result};
use crate::marker::{Inject, Marker};
use crate::object::{Instance, Receiver};
use crate::ports::MethodBody;
use crate::value::{Arguments, Boxable, Value};

struct PendingMethod {
    name: String,
    parameters: Vec<ParameterDescriptor>,
    return_type: crate::value::ValueType,
    is_virtual: bool,
    markers: Vec<Marker>,
    body: Arc<dyn MethodBody>,
}

enum Annotation {
    Class(Marker),
    Member(String, Marker),
    Parameter(String, usize, Marker),
    ParameterName(String, usize, String),
}

/// Builder for a [`ClassDescriptor`] over state type `T`
///
/// `T::default()` stands for raw allocation; the no-argument constructor is a separate
/// body run over the allocated state. Classes get an implicit empty no-argument
/// constructor unless [`ClassBuilder::without_default_constructor`] is called.
pub struct ClassBuilder<T> {
    name: String,
    fields: Vec<FieldDescriptor>,
    properties: Vec<PropertyDescriptor>,
    methods: Vec<PendingMethod>,
    annotations: Vec<Annotation>,
    default_constructor: Option<Arc<InitFn>>,
    _state: PhantomData<fn() -> T>,
}

impl<T: Default + Any + Send + Sync> ClassBuilder<T> {
    /// Start declaring a class
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
            default_constructor: Some(Arc::new(|state: &mut State| state.is::<T>())),
            _state: PhantomData,
        }
    }

    /// Declare the no-argument constructor body
    pub fn constructor<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.default_constructor = Some(Arc::new(move |state: &mut State| {
            match state.downcast_mut::<T>() {
                Some(state) => {
                    body(state);
                    true
                }
                None => false,
            }
        }));
        self
    }

    /// Declare that the class has no accessible no-argument constructor
    pub fn without_default_constructor(mut self) -> Self {
        self.default_constructor = None;
        self
    }

    /// Declare a field of type `V`
    pub fn field<V, F>(mut self, name: impl Into<String>, setter: F) -> Self
    where
        V: Boxable,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            value_type: V::value_type(),
            markers: Vec::new(),
            setter: typed_setter(setter),
        });
        self
    }

    /// Declare a property of type `V` with a setter
    pub fn property<V, F>(mut self, name: impl Into<String>, setter: F) -> Self
    where
        V: Boxable,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.properties.push(PropertyDescriptor {
            name: name.into(),
            value_type: V::value_type(),
            markers: Vec::new(),
            setter: Some(typed_setter(setter)),
        });
        self
    }

    /// Declare a property of type `V` without a setter
    pub fn readonly_property<V: Boxable>(mut self, name: impl Into<String>) -> Self {
        self.properties.push(PropertyDescriptor {
            name: name.into(),
            value_type: V::value_type(),
            markers: Vec::new(),
            setter: None,
        });
        self
    }

    /// Declare an overridable method
    pub fn virtual_method<A, R, F>(self, name: impl Into<String>, body: F) -> Self
    where
        A: Arguments + 'static,
        R: Boxable,
        F: Fn(Receiver<'_, T>, A) -> R + Send + Sync + 'static,
    {
        self.push_method(name.into(), true, body)
    }

    /// Declare a method that cannot be overridden
    pub fn method<A, R, F>(self, name: impl Into<String>, body: F) -> Self
    where
        A: Arguments + 'static,
        R: Boxable,
        F: Fn(Receiver<'_, T>, A) -> R + Send + Sync + 'static,
    {
        self.push_method(name.into(), false, body)
    }

    /// Attach a marker to the class itself
    pub fn annotate_class<M: Any + Send + Sync>(mut self, marker: M) -> Self {
        self.annotations.push(Annotation::Class(Marker::new(marker)));
        self
    }

    /// Attach a marker to a field, property or method
    pub fn annotate<M: Any + Send + Sync>(mut self, member: &str, marker: M) -> Self {
        self.annotations
            .push(Annotation::Member(member.to_string(), Marker::new(marker)));
        self
    }

    /// Tag a field or property as an injection target
    pub fn inject(self, member: &str) -> Self {
        self.annotate(member, Inject)
    }

    /// Attach a marker to a method parameter
    pub fn annotate_parameter<M: Any + Send + Sync>(
        mut self,
        method: &str,
        position: usize,
        marker: M,
    ) -> Self {
        self.annotations.push(Annotation::Parameter(
            method.to_string(),
            position,
            Marker::new(marker),
        ));
        self
    }

    /// Name a method parameter
    pub fn name_parameter(mut self, method: &str, position: usize, name: impl Into<String>) -> Self {
        self.annotations.push(Annotation::ParameterName(
            method.to_string(),
            position,
            name.into(),
        ));
        self
    }

    /// Validate member names, apply annotations and produce the descriptor
    pub fn build(self) -> Result<ClassDescriptor> {
        let ClassBuilder {
            name,
            mut fields,
            mut properties,
            mut methods,
            annotations,
            default_constructor,
            _state,
        } = self;

        let mut seen = HashSet::new();
        let member_names = fields
            .iter()
            .map(|f| f.name.as_str())
            .chain(properties.iter().map(|p| p.name.as_str()))
            .chain(methods.iter().map(|m| m.name.as_str()));
        for member in member_names {
            if !seen.insert(member) {
                return Err(Error::DuplicateMember {
                    class: name.clone(),
                    member: member.to_string(),
                });
            }
        }

        let unknown = |member: String| Error::UnknownMember {
            class: name.clone(),
            member,
        };

        let mut class_markers = Vec::new();
        for annotation in annotations {
            match annotation {
                Annotation::Class(marker) => class_markers.push(marker),
                Annotation::Member(member, marker) => {
                    if let Some(field) = fields.iter_mut().find(|f| f.name == member) {
                        field.markers.push(marker);
                    } else if let Some(property) = properties.iter_mut().find(|p| p.name == member)
                    {
                        property.markers.push(marker);
                    } else if let Some(method) = methods.iter_mut().find(|m| m.name == member) {
                        method.markers.push(marker);
                    } else {
                        return Err(unknown(member));
                    }
                }
                Annotation::Parameter(method, position, marker) => {
                    parameter_mut(&mut methods, &method, position)
                        .ok_or_else(|| unknown(format!("{method}#{position}")))?
                        .markers
                        .push(marker);
                }
                Annotation::ParameterName(method, position, parameter_name) => {
                    parameter_mut(&mut methods, &method, position)
                        .ok_or_else(|| unknown(format!("{method}#{position}")))?
                        .name = Some(parameter_name);
                }
            }
        }

        let methods = methods
            .into_iter()
            .map(|pending| {
                Arc::new(MethodDescriptor {
                    identity: MethodIdentity::new(&name, pending.name),
                    parameters: pending.parameters,
                    return_type: pending.return_type,
                    is_virtual: pending.is_virtual,
                    markers: pending.markers,
                    body: pending.body,
                })
            })
            .collect();

        Ok(ClassDescriptor {
            name,
            state_type: std::any::TypeId::of::<T>(),
            state_type_name: std::any::type_name::<T>(),
            markers: class_markers,
            fields,
            properties,
            methods,
            allocate: Arc::new(|| Box::new(T::default())),
            default_constructor,
        })
    }

    fn push_method<A, R, F>(mut self, name: String, is_virtual: bool, body: F) -> Self
    where
        A: Arguments + 'static,
        R: Boxable,
        F: Fn(Receiver<'_, T>, A) -> R + Send + Sync + 'static,
    {
        let parameters = A::parameter_types()
            .into_iter()
            .enumerate()
            .map(|(position, value_type)| ParameterDescriptor {
                position,
                name: None,
                value_type,
                markers: Vec::new(),
            })
            .collect::<Vec<_>>();
        let body = TypedBody::<T, A, R, F> {
            identity: MethodIdentity::new(&self.name, &name),
            arity: parameters.len(),
            body,
            _types: PhantomData,
        };
        self.methods.push(PendingMethod {
            name,
            parameters,
            return_type: R::value_type(),
            is_virtual,
            markers: Vec::new(),
            body: Arc::new(body),
        });
        self
    }
}

fn parameter_mut<'a>(
    methods: &'a mut [PendingMethod],
    method: &str,
    position: usize,
) -> Option<&'a mut ParameterDescriptor> {
    methods
        .iter_mut()
        .find(|m| m.name == method)
        .and_then(|m| m.parameters.get_mut(position))
}

fn typed_setter<T, V, F>(setter: F) -> Arc<SetterFn>
where
    T: Any + Send + Sync,
    V: Boxable,
    F: Fn(&mut T, V) + Send + Sync + 'static,
{
    Arc::new(
        move |state: &mut State, value: &Value| -> std::result::Result<(), AccessError> {
            let state = state.downcast_mut::<T>().ok_or(AccessError::Target)?;
            let value = V::from_value(value).ok_or(AccessError::Value)?;
            setter(state, value);
            Ok(())
        },
    )
}

/// Original method body over typed state and arguments
struct TypedBody<T, A, R, F> {
    identity: MethodIdentity,
    arity: usize,
    body: F,
    _types: PhantomData<fn(&T, A) -> R>,
}

impl<T, A, R, F> MethodBody for TypedBody<T, A, R, F>
where
    T: Any + Send + Sync,
    A: Arguments + 'static,
    R: Boxable,
    F: Fn(Receiver<'_, T>, A) -> R + Send + Sync,
{
    fn call(&self, target: &Instance, args: &[Value]) -> Result<Value> {
        let state = target
            .state::<T>()
            .ok_or_else(|| Error::TargetTypeMismatch {
                method: self.identity.to_string(),
                expected: std::any::type_name::<T>().to_string(),
                found: target.runtime_type().class().state_type_name().to_string(),
            })?;
        if args.len() != self.arity {
            return Err(Error::ArgumentCountMismatch {
                method: self.identity.to_string(),
                expected: self.arity,
                found: args.len(),
            });
        }
        let args = A::from_values(args).map_err(|position| Error::ArgumentTypeMismatch {
            method: self.identity.to_string(),
            position,
            expected: A::parameter_types()
                .get(position)
                .map(|t| t.name().to_string())
                .unwrap_or_default(),
            found: args
                .get(position)
                .map(|v| v.type_name().to_string())
                .unwrap_or_default(),
        })?;
        Ok((self.body)(Receiver::new(target, state), args).into_value())
    }
}
