//! # Enhanced DI
//!
//! Augments a service container with constructor injection and method
//! interception. At registration time every class that declares injectable
//! members or intercepted virtual methods gets a synthesized subtype:
//!
//! - injectable fields and properties become positional constructor
//!   parameters, resolved by the container;
//! - virtual methods carrying a recognized marker are routed through the
//!   interceptor registered for that marker, which may call through to the
//!   original body.
//!
//! ## Example
//!
//! ```ignore
//! use edi::prelude::*;
//!
//! #[derive(Debug)]
//! struct Shout;
//!
//! #[derive(Default)]
//! struct Greeter {
//!     name: String,
//! }
//!
//! let greeter = ClassBuilder::<Greeter>::new("Greeter")
//!     .field("name", |g: &mut Greeter, v: String| g.name = v)
//!     .inject("name")
//!     .virtual_method("greet", |this, ()| format!("hello {}", this.name))
//!     .annotate("greet", Shout)
//!     .build()?;
//!
//! let mut services = ServiceCollection::new();
//! services
//!     .add_instance(ServiceKind::of::<String>(), Value::new("pete".to_string()))
//!     .add_singleton(ServiceKind::of::<Greeter>(), RuntimeType::original(greeter));
//! services.add_enhanced_service_provider(|enhancer| {
//!     enhancer.add_interceptor::<Shout>(|call| {
//!         let text = call.proceed()?.get::<String>().unwrap_or_default();
//!         Ok(Value::new(text.to_uppercase()))
//!     });
//! })?;
//!
//! let provider = services.build_service_provider();
//! let greeter = provider.get_object::<Greeter>()?;
//! assert_eq!(greeter.invoke::<_, String>("greet", ())?, "HELLO PETE");
//! ```
//!
//! ## Architecture
//!
//! - `domain` - values, markers, class metamodel, runtime types, registrations, errors
//! - `application` - the synthesis engine (weaver, constructor synthesizer, binder)
//! - `infrastructure` - container, configuration and logging

/// Domain layer - core types
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use edi_domain::*;
}

/// Application layer - the synthesis engine
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use edi_application::*;
}

/// Infrastructure layer - container, config, and logging
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use edi_infrastructure::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::*;

// Re-export the engine entry points
pub use application::{CallContext, EnhancerBuilder, SynthesisOptions, SynthesisReport};

// Re-export container types
pub use infrastructure::{AppConfig, ServiceCollection, ServiceCollectionExt, ServiceProvider};

/// Everything needed to declare classes, register services and add interceptors
pub mod prelude {
    pub use edi_application::{CallContext, EnhancerBuilder};
    pub use edi_domain::{
        ClassBuilder, Error, Lifetime, Marker, MarkerKind, MarkerSet, Object, Result,
        RuntimeType, ServiceKind, Value,
    };
    pub use edi_infrastructure::{ServiceCollection, ServiceCollectionExt, ServiceProvider};
}
