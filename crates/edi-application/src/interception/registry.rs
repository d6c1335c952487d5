//! Interceptor Registry
//!
//! Maps marker kinds to interceptor functions. Built during configuration and
//! shared read-only (as `Arc<InterceptorRegistry>`) by every woven override.

use std::collections::HashMap;
use std::sync::Arc;

use edi_domain::error::Result;
use edi_domain::marker::{Marker, MarkerKind};
use edi_domain::value::Value;
use tracing::warn;

use super::context::CallContext;

/// An interceptor: receives the call context, returns the call's result
pub type Interceptor = Arc<dyn Fn(&CallContext<'_>) -> Result<Value> + Send + Sync>;

/// Marker kind to interceptor table
#[derive(Default, Clone)]
pub struct InterceptorRegistry {
    interceptors: HashMap<MarkerKind, Interceptor>,
    order: Vec<MarkerKind>,
}

impl InterceptorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `kind` with `interceptor`
    ///
    /// Re-registering a kind replaces its interceptor; the previous one is returned.
    pub fn register(&mut self, kind: MarkerKind, interceptor: Interceptor) -> Option<Interceptor> {
        let previous = self.interceptors.insert(kind, interceptor);
        if previous.is_some() {
            warn!(marker = %kind, "Interceptor for marker replaced");
        } else {
            self.order.push(kind);
        }
        previous
    }

    /// Interceptor registered for `kind`
    pub fn lookup(&self, kind: MarkerKind) -> Option<&Interceptor> {
        self.interceptors.get(&kind)
    }

    /// Whether `kind` is a recognized marker
    pub fn contains(&self, kind: MarkerKind) -> bool {
        self.interceptors.contains_key(&kind)
    }

    /// Number of recognized marker kinds
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Whether no interceptor is registered
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Recognized marker kinds, in first registration order
    pub fn kinds(&self) -> &[MarkerKind] {
        &self.order
    }

    /// Kind of every recognized marker among `markers`, in marker order
    ///
    /// A kind attached twice appears twice.
    pub fn recognized(&self, markers: &[Marker]) -> Vec<MarkerKind> {
        markers
            .iter()
            .map(Marker::kind)
            .filter(|kind| self.contains(*kind))
            .collect()
    }
}

impl std::fmt::Debug for InterceptorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorRegistry")
            .field("kinds", &self.order)
            .finish()
    }
}

/// Registry entry for compile-time interceptor registration
///
/// Interceptors contributed from other crates register themselves with this
/// entry using `#[linkme::distributed_slice(INTERCEPTORS)]`.
pub struct InterceptorEntry {
    /// Unique interceptor name (e.g., "audit", "retry")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Marker kind the interceptor handles
    pub marker: fn() -> MarkerKind,
    /// Factory function creating the interceptor
    pub factory: fn() -> Interceptor,
}

// Auto-collection via linkme distributed slices - interceptors submit entries at compile time
#[linkme::distributed_slice]
pub static INTERCEPTORS: [InterceptorEntry] = [..];

/// List all compile-time registered interceptors
///
/// Returns (name, description) tuples in link order.
pub fn list_registered_interceptors() -> Vec<(&'static str, &'static str)> {
    INTERCEPTORS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
