//! Service collection

use std::sync::Arc;

use edi_domain::object::RuntimeType;
use edi_domain::service::{Lifetime, ServiceDescriptor, ServiceKind};
use edi_domain::value::Value;

use super::provider::ServiceProvider;

/// Ordered list of service registrations
#[derive(Debug, Clone, Default)]
pub struct ServiceCollection {
    descriptors: Vec<ServiceDescriptor>,
}

impl ServiceCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a registration
    pub fn add(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Register `implementation` as the single instance of `service`
    pub fn add_singleton(&mut self, service: ServiceKind, implementation: Arc<RuntimeType>) -> &mut Self {
        self.add(ServiceDescriptor::new(service, implementation, Lifetime::Singleton))
    }

    /// Register `implementation` as a fresh instance per resolution of `service`
    pub fn add_transient(&mut self, service: ServiceKind, implementation: Arc<RuntimeType>) -> &mut Self {
        self.add(ServiceDescriptor::new(service, implementation, Lifetime::Transient))
    }

    /// Register a pre-built value for `service`
    pub fn add_instance(&mut self, service: ServiceKind, value: Value) -> &mut Self {
        self.add(ServiceDescriptor::instance(service, value))
    }

    /// Registrations, in insertion order
    pub fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Replace every registration
    pub(crate) fn replace_all(&mut self, descriptors: Vec<ServiceDescriptor>) {
        self.descriptors = descriptors;
    }

    /// Build a provider over a snapshot of the registrations
    pub fn build_service_provider(&self) -> ServiceProvider {
        ServiceProvider::new(self.descriptors.clone())
    }
}
