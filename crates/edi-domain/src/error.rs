//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Enhanced DI
#[derive(Error, Debug)]
pub enum Error {
    /// An interception marker is attached to a method that cannot be overridden
    #[error("Interception target {class}::{method} is not virtual")]
    NonVirtualInterceptionTarget {
        /// Declaring class
        class: String,
        /// The non-virtual method
        method: String,
    },

    /// A method carries more than one recognized interception marker
    #[error("Method {class}::{method} is intercepted more than once ({})", .markers.join(", "))]
    MultipleInterceptionMarkers {
        /// Declaring class
        class: String,
        /// The over-marked method
        method: String,
        /// The recognized marker kinds found on the method
        markers: Vec<String>,
    },

    /// The class requires injection but has no accessible no-argument constructor
    #[error("Class {class} requires injection but has no accessible no-argument constructor")]
    MissingBaseConstructor {
        /// The class lacking a constructor
        class: String,
    },

    /// An injected property exposes no setter
    #[error("Injected property {class}::{property} has no setter")]
    MissingPropertySetter {
        /// Declaring class
        class: String,
        /// The read-only property
        property: String,
    },

    /// A supplied argument cannot convert to the declared parameter type
    #[error(
        "Argument type mismatch in {method} at position {position}: expected {expected}, found {found}"
    )]
    ArgumentTypeMismatch {
        /// Method (or constructor) identity
        method: String,
        /// Zero-based argument position
        position: usize,
        /// Declared parameter type
        expected: String,
        /// Runtime type of the supplied value
        found: String,
    },

    /// Wrong number of positional arguments
    #[error("Argument count mismatch in {method}: expected {expected}, found {found}")]
    ArgumentCountMismatch {
        /// Method (or constructor) identity
        method: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        found: usize,
    },

    /// A method body was invoked on an instance of an unrelated class
    #[error("Target type mismatch in {method}: expected an instance of {expected}, found {found}")]
    TargetTypeMismatch {
        /// Method identity
        method: String,
        /// Declaring class state type
        expected: String,
        /// Runtime state type of the target
        found: String,
    },

    /// An interceptor result cannot be coerced to the declared return type
    #[error("Return type mismatch in {method}: expected {expected}, found {found}")]
    ReturnTypeMismatch {
        /// Method identity
        method: String,
        /// Declared return type
        expected: String,
        /// Runtime type of the interceptor result
        found: String,
    },

    /// No method with the given name exists on the runtime type
    #[error("Unknown method {method} on {class}")]
    UnknownMethod {
        /// Runtime type name
        class: String,
        /// Requested method
        method: String,
    },

    /// An annotation names a member the class does not declare
    #[error("Unknown member {member} on {class}")]
    UnknownMember {
        /// Class name
        class: String,
        /// Requested member
        member: String,
    },

    /// Two members of a class share a name
    #[error("Duplicate member {member} on {class}")]
    DuplicateMember {
        /// Class name
        class: String,
        /// Repeated member name
        member: String,
    },

    /// No registration exists for a requested service kind
    #[error("Service not registered: {service}")]
    ServiceNotRegistered {
        /// Service kind name
        service: String,
    },

    /// Resolving a service re-entered a service already being resolved
    #[error("Circular dependency detected: {path}")]
    CircularDependency {
        /// Resolution path, outermost first
        path: String,
    },

    /// Error raised by interceptor code
    #[error("Interceptor error in {method}: {message}")]
    Interceptor {
        /// Intercepted method identity
        method: String,
        /// Description of the failure
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Infrastructure error (container, logging, I/O plumbing)
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal invariant violation
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the violated invariant
        message: String,
    },
}

// Basic error creation methods
impl Error {
    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an error reported by interceptor code
    pub fn interceptor<M: ToString, S: Into<String>>(method: M, message: S) -> Self {
        Self::Interceptor {
            method: method.to_string(),
            message: message.into(),
        }
    }

    /// Create a service-not-registered error
    pub fn service_not_registered<S: Into<String>>(service: S) -> Self {
        Self::ServiceNotRegistered {
            service: service.into(),
        }
    }
}

// Classification
impl Error {
    /// Whether the error reports a defect in how classes or interceptors were declared
    ///
    /// These are raised during the synthesis pass and are never transient.
    pub fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            Self::NonVirtualInterceptionTarget { .. }
                | Self::MultipleInterceptionMarkers { .. }
                | Self::MissingBaseConstructor { .. }
                | Self::MissingPropertySetter { .. }
                | Self::UnknownMember { .. }
                | Self::DuplicateMember { .. }
                | Self::Configuration { .. }
        )
    }

    /// Whether the error is a call-time conversion failure
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            Self::ArgumentTypeMismatch { .. }
                | Self::ArgumentCountMismatch { .. }
                | Self::TargetTypeMismatch { .. }
                | Self::ReturnTypeMismatch { .. }
        )
    }
}
