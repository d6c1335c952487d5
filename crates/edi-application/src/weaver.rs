//! Interception Weaver
//!
//! Produces the override installed in a synthesized subtype's dispatch table
//! for each intercepted method. The override hands every call to the
//! interceptor registered for the method's marker and returns whatever the
//! interceptor returns, coerced to the declared return type.

use std::fmt;
use std::sync::{Arc, OnceLock};

use edi_domain::class::{MethodDescriptor, MethodIdentity};
use edi_domain::error::{Error, Result};
use edi_domain::marker::MarkerKind;
use edi_domain::object::Instance;
use edi_domain::ports::MethodDispatch;
use edi_domain::value::{Value, ValueType};
use tracing::debug;

use crate::binder::{DeferredBinder, bind_once};
use crate::interception::{CallTemplate, Interceptor, InterceptorRegistry};
use crate::invoker::Invoker;

/// Dispatch entry routing a method through its interceptor
pub struct WovenOverride {
    identity: MethodIdentity,
    marker: MarkerKind,
    return_type: ValueType,
    interceptor: OnceLock<Interceptor>,
    template: OnceLock<CallTemplate>,
    call_through: OnceLock<Invoker>,
}

impl WovenOverride {
    fn new(method: &MethodDescriptor, marker: MarkerKind) -> Self {
        Self {
            identity: method.identity().clone(),
            marker,
            return_type: method.return_type(),
            interceptor: OnceLock::new(),
            template: OnceLock::new(),
            call_through: OnceLock::new(),
        }
    }

    /// The intercepted method
    pub fn identity(&self) -> &MethodIdentity {
        &self.identity
    }

    /// Marker kind selecting the interceptor
    pub fn marker(&self) -> MarkerKind {
        self.marker
    }

    /// Whether every deferred slot has been filled
    pub fn is_bound(&self) -> bool {
        self.interceptor.get().is_some()
            && self.template.get().is_some()
            && self.call_through.get().is_some()
    }

    fn unbound(&self, slot: &str) -> Error {
        Error::internal(format!("{} called before its {slot} was bound", self.identity))
    }

    fn coerce(&self, result: Value) -> Result<Value> {
        if self.return_type.is_unit() {
            return Ok(Value::unit());
        }
        if self.return_type.accepts(&result) {
            Ok(result)
        } else {
            Err(Error::ReturnTypeMismatch {
                method: self.identity.to_string(),
                expected: self.return_type.name().to_string(),
                found: result.type_name().to_string(),
            })
        }
    }
}

impl MethodDispatch for WovenOverride {
    fn dispatch(&self, target: &Instance, args: &[Value]) -> Result<Value> {
        let template = self
            .template
            .get()
            .ok_or_else(|| self.unbound("call template"))?;
        let call_through = self
            .call_through
            .get()
            .ok_or_else(|| self.unbound("call-through"))?;
        let interceptor = self
            .interceptor
            .get()
            .ok_or_else(|| self.unbound("interceptor"))?;

        let context = template.instantiate(target, args, call_through);
        let result = interceptor(&context)?;
        self.coerce(result)
    }

    fn is_override(&self) -> bool {
        true
    }
}

impl fmt::Debug for WovenOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WovenOverride")
            .field("identity", &self.identity.to_string())
            .field("marker", &self.marker)
            .field("return_type", &self.return_type)
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Weaves interceptor overrides for marked methods
#[derive(Debug, Clone)]
pub struct InterceptionWeaver {
    registry: Arc<InterceptorRegistry>,
}

impl InterceptionWeaver {
    /// Create a weaver over a finished interceptor registry
    pub fn new(registry: Arc<InterceptorRegistry>) -> Self {
        Self { registry }
    }

    /// The interceptor registry
    pub fn registry(&self) -> &Arc<InterceptorRegistry> {
        &self.registry
    }

    /// Weave the override for `method`, if it carries a recognized marker
    ///
    /// The override's slots are filled by bindings queued on `binder`.
    ///
    /// # Errors
    ///
    /// - [`Error::NonVirtualInterceptionTarget`] when the method cannot be overridden
    /// - [`Error::MultipleInterceptionMarkers`] when it carries several recognized markers
    pub fn weave(
        &self,
        method: &Arc<MethodDescriptor>,
        binder: &mut DeferredBinder,
    ) -> Result<Option<Arc<WovenOverride>>> {
        let recognized = self.registry.recognized(method.markers());
        let Some(&marker) = recognized.first() else {
            return Ok(None);
        };
        if !method.is_virtual() {
            return Err(Error::NonVirtualInterceptionTarget {
                class: method.identity().class().to_string(),
                method: method.name().to_string(),
            });
        }
        if recognized.len() > 1 {
            return Err(Error::MultipleInterceptionMarkers {
                class: method.identity().class().to_string(),
                method: method.name().to_string(),
                markers: recognized.iter().map(ToString::to_string).collect(),
            });
        }

        let woven = Arc::new(WovenOverride::new(method, marker));
        debug!(method = %method.identity(), marker = %marker, "Weaving interceptor override");

        let label = method.identity().to_string();
        {
            let woven = Arc::clone(&woven);
            let registry = Arc::clone(&self.registry);
            let label = format!("{label} interceptor");
            binder.defer(label.clone(), move || {
                let interceptor = registry.lookup(marker).cloned().ok_or_else(|| {
                    Error::internal(format!("no interceptor registered for marker {marker}"))
                })?;
                bind_once(&woven.interceptor, interceptor, &label)
            });
        }
        {
            let woven = Arc::clone(&woven);
            let method = Arc::clone(method);
            let label = format!("{label} call template");
            binder.defer(label.clone(), move || {
                bind_once(&woven.template, CallTemplate::new(method), &label)
            });
        }
        {
            let woven = Arc::clone(&woven);
            let method = Arc::clone(method);
            let label = format!("{label} call-through");
            binder.defer(label.clone(), move || {
                bind_once(&woven.call_through, Invoker::build(method), &label)
            });
        }

        Ok(Some(woven))
    }
}
