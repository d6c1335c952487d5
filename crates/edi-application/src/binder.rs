//! Deferred Binder
//!
//! Synthesized overrides reference things that may only be attached once
//! every subtype of the batch exists: the interceptor, the call template and
//! the call-through. Each is a write-once slot filled by a closure queued
//! here during synthesis and run, in queue order, before any synthesized
//! instance is constructed.

use std::fmt;
use std::sync::OnceLock;

use edi_domain::error::{Error, Result};
use tracing::debug;

type Binding = Box<dyn FnOnce() -> Result<()> + Send>;

/// Queue of post-synthesis bindings
#[derive(Default)]
pub struct DeferredBinder {
    bindings: Vec<(String, Binding)>,
}

impl DeferredBinder {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a binding
    pub fn defer<F>(&mut self, label: impl Into<String>, binding: F)
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.bindings.push((label.into(), Box::new(binding)));
    }

    /// Number of queued bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Labels of the queued bindings, in run order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(label, _)| label.as_str())
    }

    /// Run every binding in queue order, stopping at the first failure
    ///
    /// Consumes the queue, so a batch can only be bound once.
    pub fn run(self) -> Result<usize> {
        let count = self.bindings.len();
        for (label, binding) in self.bindings {
            debug!(binding = %label, "Running deferred binding");
            binding()?;
        }
        Ok(count)
    }
}

impl fmt::Debug for DeferredBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredBinder")
            .field("bindings", &self.labels().collect::<Vec<_>>())
            .finish()
    }
}

/// Fill a write-once slot
///
/// # Errors
///
/// Returns an internal error if the slot was already bound.
pub fn bind_once<T>(slot: &OnceLock<T>, value: T, label: &str) -> Result<()> {
    slot.set(value)
        .map_err(|_| Error::internal(format!("{label} is already bound")))
}
