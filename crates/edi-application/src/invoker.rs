//! Invoker Builder
//!
//! Turns a method descriptor into a call-through: a callable that runs the
//! method's original body on a target, whatever the target's dispatch table
//! says. Interceptors use it to reach the behaviour they replace.

use std::fmt;
use std::sync::Arc;

use edi_domain::class::MethodDescriptor;
use edi_domain::error::{Error, Result};
use edi_domain::object::Instance;
use edi_domain::value::Value;

/// Call-through to a method's original body
#[derive(Clone)]
pub struct Invoker {
    method: Arc<MethodDescriptor>,
}

impl Invoker {
    /// Build the call-through for `method`
    pub fn build(method: Arc<MethodDescriptor>) -> Self {
        Self { method }
    }

    /// The method this invoker calls
    pub fn method(&self) -> &Arc<MethodDescriptor> {
        &self.method
    }

    /// Run the original body on `target`
    ///
    /// Arguments are checked positionally against the declared parameter types
    /// before the body sees them; a mismatch fails this call only.
    pub fn invoke(&self, target: &Instance, args: &[Value]) -> Result<Value> {
        let identity = self.method.identity();
        let parameters = self.method.parameters();
        if args.len() != parameters.len() {
            return Err(Error::ArgumentCountMismatch {
                method: identity.to_string(),
                expected: parameters.len(),
                found: args.len(),
            });
        }
        if let Some((parameter, arg)) = parameters
            .iter()
            .zip(args)
            .find(|(parameter, arg)| !parameter.value_type().accepts(arg))
        {
            return Err(Error::ArgumentTypeMismatch {
                method: identity.to_string(),
                position: parameter.position(),
                expected: parameter.value_type().name().to_string(),
                found: arg.type_name().to_string(),
            });
        }
        self.method.body().call(target, args)
    }
}

impl fmt::Debug for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Invoker")
            .field(&self.method.identity().to_string())
            .finish()
    }
}
