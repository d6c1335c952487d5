//! Service provider
//!
//! Resolves registrations into boxed values. Singletons are cached in
//! per-registration slots; construction happens outside the slot lock, and
//! the first instance stored wins if two threads race on a first resolution.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use edi_domain::error::{Error, Result};
use edi_domain::object::{Instance, Object, RuntimeType};
use edi_domain::service::{Implementation, Lifetime, ServiceDescriptor, ServiceKind};
use edi_domain::value::{Boxable, Value};
use tracing::{debug, trace};

use crate::constants::RESOLUTION_PATH_SEPARATOR;

struct Registration {
    descriptor: ServiceDescriptor,
    singleton: Mutex<Option<Value>>,
}

impl Registration {
    fn slot(&self) -> Result<MutexGuard<'_, Option<Value>>> {
        self.singleton.lock().map_err(|_| {
            Error::infrastructure(format!(
                "singleton slot of {} is poisoned",
                self.descriptor.service()
            ))
        })
    }
}

/// Resolves services from a fixed set of registrations
pub struct ServiceProvider {
    registrations: HashMap<ServiceKind, Registration>,
}

impl ServiceProvider {
    /// Create a provider; for a repeated service kind the last registration wins
    pub fn new(descriptors: Vec<ServiceDescriptor>) -> Self {
        let mut registrations = HashMap::with_capacity(descriptors.len());
        for descriptor in descriptors {
            registrations.insert(
                descriptor.service(),
                Registration {
                    descriptor,
                    singleton: Mutex::new(None),
                },
            );
        }
        Self { registrations }
    }

    /// Whether `service` is registered
    pub fn contains(&self, service: ServiceKind) -> bool {
        self.registrations.contains_key(&service)
    }

    /// Registration resolved for `service`
    pub fn descriptor(&self, service: ServiceKind) -> Option<&ServiceDescriptor> {
        self.registrations.get(&service).map(|r| &r.descriptor)
    }

    /// Resolve `service`
    pub fn get(&self, service: ServiceKind) -> Result<Value> {
        self.resolve(service, &mut Vec::new())
    }

    /// Resolve `service` as an instance
    pub fn get_instance(&self, service: ServiceKind) -> Result<Arc<Instance>> {
        let value = self.get(service)?;
        value
            .downcast_arc::<Instance>()
            .ok_or_else(|| Error::TargetTypeMismatch {
                method: format!("resolve {service}"),
                expected: std::any::type_name::<Instance>().to_string(),
                found: value.type_name().to_string(),
            })
    }

    /// Resolve the service registered for class state `T`
    pub fn get_object<T: std::any::Any>(&self) -> Result<Object<T>> {
        let service = ServiceKind::of::<T>();
        let instance = self.get_instance(service)?;
        let found = instance.type_name().to_string();
        Object::new(instance).ok_or_else(|| Error::TargetTypeMismatch {
            method: format!("resolve {service}"),
            expected: std::any::type_name::<T>().to_string(),
            found,
        })
    }

    /// Resolve the service satisfying value type `V`
    pub fn get_value<V: Boxable>(&self) -> Result<V> {
        let value_type = V::value_type();
        let service = ServiceKind::for_value_type(value_type);
        let value = self.get(service)?;
        V::from_value(&value).ok_or_else(|| Error::TargetTypeMismatch {
            method: format!("resolve {service}"),
            expected: value_type.name().to_string(),
            found: value.type_name().to_string(),
        })
    }

    fn resolve(&self, service: ServiceKind, path: &mut Vec<ServiceKind>) -> Result<Value> {
        if path.contains(&service) {
            let cycle = path
                .iter()
                .chain(std::iter::once(&service))
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(RESOLUTION_PATH_SEPARATOR);
            return Err(Error::CircularDependency { path: cycle });
        }
        let registration = self
            .registrations
            .get(&service)
            .ok_or_else(|| Error::service_not_registered(service.name()))?;

        match (registration.descriptor.implementation(), registration.descriptor.lifetime()) {
            (Implementation::Instance(value), _) => Ok(value.clone()),
            (Implementation::Type(runtime_type), Lifetime::Transient) => {
                self.construct(service, runtime_type, path)
            }
            (Implementation::Type(runtime_type), Lifetime::Singleton) => {
                if let Some(value) = registration.slot()?.as_ref() {
                    return Ok(value.clone());
                }
                let value = self.construct(service, runtime_type, path)?;
                let mut slot = registration.slot()?;
                Ok(slot.get_or_insert(value).clone())
            }
        }
    }

    fn construct(
        &self,
        service: ServiceKind,
        runtime_type: &Arc<RuntimeType>,
        path: &mut Vec<ServiceKind>,
    ) -> Result<Value> {
        path.push(service);
        let args = runtime_type
            .constructor_parameters()
            .into_iter()
            .map(|parameter| {
                trace!(service = %service, parameter = parameter.name(), "Resolving dependency");
                self.resolve(ServiceKind::for_value_type(parameter), path)
            })
            .collect::<Result<Vec<_>>>();
        path.pop();

        let instance = runtime_type.construct(args?)?;
        debug!(service = %service, implementation = runtime_type.name(), "Constructed service");
        Ok(Value::from_arc(Arc::new(instance)))
    }
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut services: Vec<&str> = self.registrations.keys().map(ServiceKind::name).collect();
        services.sort_unstable();
        f.debug_struct("ServiceProvider")
            .field("services", &services)
            .finish()
    }
}
