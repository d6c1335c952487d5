//! Registration-time hook
//!
//! `add_enhanced_service_provider` runs the synthesis pass over a
//! [`ServiceCollection`] and rewrites its registrations to the synthesized
//! subtypes. The hook receives the [`EnhancerBuilder`] before synthesis so
//! interceptors can be added; recognized markers are exactly those added.
//!
//! ```ignore
//! let mut services = ServiceCollection::new();
//! services.add_singleton(ServiceKind::of::<Greeter>(), greeter_type);
//! services.add_enhanced_service_provider(|enhancer| {
//!     enhancer.add_interceptor::<Logged>(|call| call.proceed());
//! })?;
//! let provider = services.build_service_provider();
//! ```

use edi_application::enhance::{EnhancerBuilder, SynthesisOptions, SynthesisReport};
use edi_domain::error::Result;
use tracing::{info, info_span};

use crate::config::{AppConfig, loader::validate_app_config};
use crate::container::ServiceCollection;

/// Adds the synthesis pass to a service collection
pub trait ServiceCollectionExt {
    /// Synthesize subtypes with default options
    fn add_enhanced_service_provider<F>(&mut self, configure: F) -> Result<SynthesisReport>
    where
        F: FnOnce(&mut EnhancerBuilder);

    /// Synthesize subtypes with options taken from `config`
    fn add_enhanced_service_provider_with<F>(
        &mut self,
        config: &AppConfig,
        configure: F,
    ) -> Result<SynthesisReport>
    where
        F: FnOnce(&mut EnhancerBuilder);
}

impl ServiceCollectionExt for ServiceCollection {
    fn add_enhanced_service_provider<F>(&mut self, configure: F) -> Result<SynthesisReport>
    where
        F: FnOnce(&mut EnhancerBuilder),
    {
        self.add_enhanced_service_provider_with(&AppConfig::default(), configure)
    }

    fn add_enhanced_service_provider_with<F>(
        &mut self,
        config: &AppConfig,
        configure: F,
    ) -> Result<SynthesisReport>
    where
        F: FnOnce(&mut EnhancerBuilder),
    {
        validate_app_config(config)?;
        let span = info_span!(
            "synthesis_pass",
            prefix = %config.synthesis.type_name_prefix,
            reuse_subtypes = config.synthesis.reuse_subtypes,
        );
        let _entered = span.enter();

        let mut builder = EnhancerBuilder::with_options(SynthesisOptions::from(&config.synthesis));
        configure(&mut builder);
        info!(
            registrations = self.len(),
            interceptors = builder.registry().len(),
            "Running synthesis pass"
        );

        // The collection is only touched once the whole batch is bound
        let enhanced = builder.build().enhance(self.descriptors())?;
        let report = enhanced.report();
        self.replace_all(enhanced.into_registrations());
        Ok(report)
    }
}
