//! Synthesis Pass
//!
//! Drives the engine over a batch of service registrations in two phases:
//!
//! ```text
//! EnhancerBuilder ──build──▶ SynthesisPass ──run──▶ PendingBatch ──bind──▶ EnhancedRegistrations
//!   interceptors               subtypes created      bindings queued        rewritten registrations
//! ```
//!
//! Rewritten registrations only become reachable once every deferred binding
//! has run, so no synthesized instance can be constructed half-bound.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use edi_domain::constants::DEFAULT_TYPE_NAME_PREFIX;
use edi_domain::error::Result;
use edi_domain::marker::MarkerKind;
use edi_domain::object::RuntimeType;
use edi_domain::service::ServiceDescriptor;
use edi_domain::value::Value;
use tracing::{debug, info, warn};

use crate::binder::DeferredBinder;
use crate::interception::{CallContext, INTERCEPTORS, InterceptorRegistry};
use crate::synthesizer::ClassSynthesizer;
use crate::weaver::InterceptionWeaver;

/// Options of a synthesis pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Prefix of synthesized subtype names
    pub type_name_prefix: String,
    /// Synthesize one subtype per class descriptor and share it between registrations
    pub reuse_subtypes: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            type_name_prefix: DEFAULT_TYPE_NAME_PREFIX.to_string(),
            reuse_subtypes: true,
        }
    }
}

/// Configuration handed to the registration-time hook
///
/// Interceptors added here are the only recognized markers of the pass.
#[derive(Debug, Default)]
pub struct EnhancerBuilder {
    registry: InterceptorRegistry,
    options: SynthesisOptions,
}

impl EnhancerBuilder {
    /// Create a builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with the given options
    pub fn with_options(options: SynthesisOptions) -> Self {
        Self {
            registry: InterceptorRegistry::new(),
            options,
        }
    }

    /// Intercept methods marked with `M`
    pub fn add_interceptor<M: Any>(
        &mut self,
        interceptor: impl Fn(&CallContext<'_>) -> Result<Value> + Send + Sync + 'static,
    ) -> &mut Self {
        self.add_interceptor_for(MarkerKind::of::<M>(), interceptor)
    }

    /// Intercept methods marked with `kind`
    pub fn add_interceptor_for(
        &mut self,
        kind: MarkerKind,
        interceptor: impl Fn(&CallContext<'_>) -> Result<Value> + Send + Sync + 'static,
    ) -> &mut Self {
        self.registry.register(kind, Arc::new(interceptor));
        self
    }

    /// Add every interceptor registered at compile time
    ///
    /// Explicit interceptors added afterwards replace these for the same marker.
    pub fn add_registered_interceptors(&mut self) -> &mut Self {
        for entry in INTERCEPTORS {
            let kind = (entry.marker)();
            debug!(interceptor = entry.name, marker = %kind, "Adding registered interceptor");
            self.registry.register(kind, (entry.factory)());
        }
        self
    }

    /// Set the subtype name prefix
    pub fn type_name_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.options.type_name_prefix = prefix.into();
        self
    }

    /// Choose whether registrations of the same class share one subtype
    pub fn reuse_subtypes(&mut self, reuse: bool) -> &mut Self {
        self.options.reuse_subtypes = reuse;
        self
    }

    /// Interceptors configured so far
    pub fn registry(&self) -> &InterceptorRegistry {
        &self.registry
    }

    /// Options configured so far
    pub fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    /// Freeze the configuration into a pass
    pub fn build(self) -> SynthesisPass {
        let weaver = InterceptionWeaver::new(Arc::new(self.registry));
        SynthesisPass {
            synthesizer: ClassSynthesizer::with_prefix(weaver, self.options.type_name_prefix),
            reuse_subtypes: self.options.reuse_subtypes,
        }
    }
}

/// Counters describing a finished pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SynthesisReport {
    /// Registrations examined
    pub registrations: usize,
    /// Registrations with an implementation type
    pub candidates: usize,
    /// Registrations skipped because they already point at a synthesized type
    pub skipped: usize,
    /// Distinct subtypes synthesized
    pub synthesized_types: usize,
    /// Registrations whose implementation was replaced
    pub rewritten: usize,
    /// Deferred bindings run
    pub bindings: usize,
}

/// A frozen interceptor configuration, ready to run over registrations
#[derive(Debug, Clone)]
pub struct SynthesisPass {
    synthesizer: ClassSynthesizer,
    reuse_subtypes: bool,
}

impl SynthesisPass {
    /// The class synthesizer
    pub fn synthesizer(&self) -> &ClassSynthesizer {
        &self.synthesizer
    }

    /// Synthesize subtypes for every candidate registration
    ///
    /// # Errors
    ///
    /// Any synthesis error aborts the whole batch; nothing is returned.
    pub fn run(&self, registrations: &[ServiceDescriptor]) -> Result<PendingBatch> {
        let mut binder = DeferredBinder::new();
        // Keyed by descriptor address; the registrations keep every descriptor alive for the pass
        let mut by_class: HashMap<usize, Option<Arc<RuntimeType>>> = HashMap::new();
        let mut synthesized: Vec<Arc<RuntimeType>> = Vec::new();
        let mut report = SynthesisReport {
            registrations: registrations.len(),
            ..SynthesisReport::default()
        };

        let mut rewritten = Vec::with_capacity(registrations.len());
        for registration in registrations {
            let Some(implementation) = registration.implementation_type() else {
                rewritten.push(registration.clone());
                continue;
            };
            report.candidates += 1;

            if implementation.is_synthesized() {
                warn!(
                    service = %registration.service(),
                    implementation = implementation.name(),
                    "Registration already points at a synthesized type, skipping"
                );
                report.skipped += 1;
                rewritten.push(registration.clone());
                continue;
            }

            let class_id = Arc::as_ptr(implementation.class()).addr();
            let cached = if self.reuse_subtypes {
                by_class.get(&class_id).cloned()
            } else {
                None
            };
            let subtype = match cached {
                Some(subtype) => subtype,
                None => {
                    let subtype = self.synthesizer.synthesize(implementation, &mut binder)?;
                    if let Some(subtype) = &subtype {
                        synthesized.push(Arc::clone(subtype));
                    }
                    by_class.insert(class_id, subtype.clone());
                    subtype
                }
            };

            match subtype {
                Some(subtype) => {
                    debug!(
                        service = %registration.service(),
                        subtype = subtype.name(),
                        "Replacing implementation"
                    );
                    report.rewritten += 1;
                    rewritten.push(registration.with_implementation_type(subtype));
                }
                None => rewritten.push(registration.clone()),
            }
        }
        report.synthesized_types = synthesized.len();

        Ok(PendingBatch {
            registrations: rewritten,
            synthesized,
            binder,
            report,
        })
    }

    /// Run the pass and bind it
    pub fn enhance(&self, registrations: &[ServiceDescriptor]) -> Result<EnhancedRegistrations> {
        self.run(registrations)?.bind()
    }
}

/// Phase one output: subtypes exist, their bindings have not run
#[derive(Debug)]
pub struct PendingBatch {
    registrations: Vec<ServiceDescriptor>,
    synthesized: Vec<Arc<RuntimeType>>,
    binder: DeferredBinder,
    report: SynthesisReport,
}

impl PendingBatch {
    /// Number of queued bindings
    pub fn pending_bindings(&self) -> usize {
        self.binder.len()
    }

    /// Names of the subtypes synthesized by the pass
    ///
    /// The subtypes themselves are only handed out once bound.
    pub fn synthesized_names(&self) -> Vec<&str> {
        self.synthesized.iter().map(|t| t.name()).collect()
    }

    /// Run every deferred binding and release the rewritten registrations
    pub fn bind(self) -> Result<EnhancedRegistrations> {
        let PendingBatch {
            registrations,
            synthesized,
            binder,
            mut report,
        } = self;
        report.bindings = binder.run()?;
        info!(
            registrations = report.registrations,
            synthesized_types = report.synthesized_types,
            rewritten = report.rewritten,
            bindings = report.bindings,
            "Synthesis pass complete"
        );
        Ok(EnhancedRegistrations {
            registrations,
            synthesized,
            report,
        })
    }
}

/// Phase two output: registrations rewritten to fully bound subtypes
#[derive(Debug, Clone)]
pub struct EnhancedRegistrations {
    registrations: Vec<ServiceDescriptor>,
    synthesized: Vec<Arc<RuntimeType>>,
    report: SynthesisReport,
}

impl EnhancedRegistrations {
    /// Registrations in original order, implementations replaced where synthesized
    pub fn registrations(&self) -> &[ServiceDescriptor] {
        &self.registrations
    }

    /// Take the registrations
    pub fn into_registrations(self) -> Vec<ServiceDescriptor> {
        self.registrations
    }

    /// Subtypes synthesized by the pass
    pub fn synthesized(&self) -> &[Arc<RuntimeType>] {
        &self.synthesized
    }

    /// Pass counters
    pub fn report(&self) -> SynthesisReport {
        self.report
    }
}
