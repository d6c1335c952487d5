//! Interception
//!
//! Interceptors are keyed by marker kind. A woven override hands every call on
//! a marked method to the interceptor registered for the method's marker,
//! together with a [`CallContext`] describing the call.
//!
//! ## Registering an interceptor at compile time
//!
//! ```ignore
//! use edi_application::interception::{InterceptorEntry, INTERCEPTORS};
//!
//! #[linkme::distributed_slice(INTERCEPTORS)]
//! static AUDIT: InterceptorEntry = InterceptorEntry {
//!     name: "audit",
//!     description: "Logs every call before proceeding",
//!     marker: MarkerKind::of::<Audited>,
//!     factory: || Arc::new(|call| call.proceed()),
//! };
//! ```

pub mod context;
pub mod registry;

pub use context::{CallContext, CallTemplate};
pub use registry::{
    INTERCEPTORS, Interceptor, InterceptorEntry, InterceptorRegistry, list_registered_interceptors,
};
