//! Domain ports
//!
//! The seams between the metamodel and the engine. Original classes use the
//! implementations in this crate; synthesized subtypes plug in the engine's.

use std::sync::Arc;

use crate::error::Result;
use crate::object::{Instance, RuntimeType};
use crate::value::{Value, ValueType};

/// A method body: runs on a target with positional boxed arguments
pub trait MethodBody: Send + Sync {
    /// Execute the body
    fn call(&self, target: &Instance, args: &[Value]) -> Result<Value>;
}

/// One entry of a runtime type's dispatch table
pub trait MethodDispatch: Send + Sync {
    /// Handle a virtual call
    fn dispatch(&self, target: &Instance, args: &[Value]) -> Result<Value>;

    /// Whether this entry replaces the declaring class's body
    fn is_override(&self) -> bool {
        false
    }
}

/// Strategy a runtime type uses to create instances
pub trait InstanceConstructor: Send + Sync {
    /// Positional parameter types
    fn parameter_types(&self) -> Vec<ValueType>;

    /// Create an instance of `runtime_type`
    fn construct(&self, runtime_type: &Arc<RuntimeType>, args: Vec<Value>) -> Result<Instance>;
}
