//! Call Context
//!
//! The per-invocation record handed to an interceptor. Contexts are built
//! fresh for every call from the method's [`CallTemplate`] and borrowed by
//! the interceptor; nothing in them outlives the call.

use std::any::Any;
use std::sync::Arc;

use edi_domain::class::{MethodDescriptor, MethodIdentity};
use edi_domain::error::{Error, Result};
use edi_domain::object::Instance;
use edi_domain::value::{Boxable, Value};

use crate::invoker::Invoker;

/// Per-method part of every call context, bound once after synthesis
#[derive(Debug, Clone)]
pub struct CallTemplate {
    method: Arc<MethodDescriptor>,
}

impl CallTemplate {
    /// Template for calls to `method`
    pub fn new(method: Arc<MethodDescriptor>) -> Self {
        Self { method }
    }

    /// Fill in the live target, arguments and call-through
    pub fn instantiate<'a>(
        &'a self,
        target: &'a Instance,
        args: &'a [Value],
        call_through: &'a Invoker,
    ) -> CallContext<'a> {
        CallContext {
            target,
            args,
            call_through,
            method: &self.method,
        }
    }

    /// The intercepted method
    pub fn method(&self) -> &Arc<MethodDescriptor> {
        &self.method
    }
}

/// What an interceptor sees of an intercepted call
#[derive(Debug, Clone, Copy)]
pub struct CallContext<'a> {
    target: &'a Instance,
    args: &'a [Value],
    call_through: &'a Invoker,
    method: &'a Arc<MethodDescriptor>,
}

impl<'a> CallContext<'a> {
    /// The instance the call was made on
    pub fn target(&self) -> &'a Instance {
        self.target
    }

    /// The target's state, if it is a `T`
    pub fn target_state<T: Any>(&self) -> Option<&'a T> {
        self.target.state::<T>()
    }

    /// Positional arguments as supplied by the caller
    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    /// Argument at `position` converted to `T`
    pub fn arg<T: Boxable>(&self, position: usize) -> Result<T> {
        let value = self
            .args
            .get(position)
            .ok_or_else(|| Error::ArgumentCountMismatch {
                method: self.identity().to_string(),
                expected: position + 1,
                found: self.args.len(),
            })?;
        T::from_value(value).ok_or_else(|| Error::ArgumentTypeMismatch {
            method: self.identity().to_string(),
            position,
            expected: T::value_type().name().to_string(),
            found: value.type_name().to_string(),
        })
    }

    /// The intercepted method's declaration
    pub fn method(&self) -> &'a MethodDescriptor {
        self.method
    }

    /// The intercepted method's identity
    pub fn identity(&self) -> &'a MethodIdentity {
        self.method.identity()
    }

    /// Call-through to the original body
    pub fn call_through(&self) -> &'a Invoker {
        self.call_through
    }

    /// Run the original body with any target and arguments
    pub fn invoke(&self, target: &Instance, args: &[Value]) -> Result<Value> {
        self.call_through.invoke(target, args)
    }

    /// Run the original body with the intercepted target and arguments
    pub fn proceed(&self) -> Result<Value> {
        self.call_through.invoke(self.target, self.args)
    }
}
