//! Constructor Synthesizer
//!
//! Builds the constructor of a synthesized subtype: one positional parameter
//! per injection target, fields first then properties. Construction stores
//! every argument into its member and only then runs the original class's
//! no-argument constructor.

use std::sync::Arc;

use edi_domain::class::{AccessError, ClassDescriptor, InjectionTarget, MemberKind, MethodIdentity};
use edi_domain::error::{Error, Result};
use edi_domain::object::{Instance, RuntimeType};
use edi_domain::ports::InstanceConstructor;
use edi_domain::value::{Value, ValueType};
use tracing::debug;

/// Constructor performing member injection
#[derive(Debug)]
pub struct InjectingConstructor {
    class: Arc<ClassDescriptor>,
    targets: Vec<InjectionTarget>,
}

impl InjectingConstructor {
    /// Synthesize the injecting constructor for `class`
    ///
    /// Returns `None` when there is nothing to inject, in which case the subtype
    /// keeps its base's constructor.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingBaseConstructor`] when the class has no no-argument constructor
    /// - [`Error::MissingPropertySetter`] when an injected property is read-only
    pub fn synthesize(
        class: &Arc<ClassDescriptor>,
        targets: Vec<InjectionTarget>,
    ) -> Result<Option<Self>> {
        if targets.is_empty() {
            return Ok(None);
        }
        if !class.has_default_constructor() {
            return Err(Error::MissingBaseConstructor {
                class: class.name().to_string(),
            });
        }
        for target in &targets {
            if let InjectionTarget::Property(property) = target
                && !property.has_setter()
            {
                return Err(Error::MissingPropertySetter {
                    class: class.name().to_string(),
                    property: property.name().to_string(),
                });
            }
            debug!(
                class = class.name(),
                member = target.name(),
                kind = %target.kind(),
                value_type = target.value_type().name(),
                "Injection target"
            );
        }
        Ok(Some(Self {
            class: Arc::clone(class),
            targets,
        }))
    }

    /// Injection targets, in parameter order
    pub fn targets(&self) -> &[InjectionTarget] {
        &self.targets
    }

    fn identity(&self, runtime_type: &RuntimeType) -> String {
        MethodIdentity::constructor(runtime_type.name()).to_string()
    }
}

impl InstanceConstructor for InjectingConstructor {
    fn parameter_types(&self) -> Vec<ValueType> {
        self.targets.iter().map(InjectionTarget::value_type).collect()
    }

    fn construct(&self, runtime_type: &Arc<RuntimeType>, args: Vec<Value>) -> Result<Instance> {
        if args.len() != self.targets.len() {
            return Err(Error::ArgumentCountMismatch {
                method: self.identity(runtime_type),
                expected: self.targets.len(),
                found: args.len(),
            });
        }

        let mut state = self.class.allocate();
        for (position, (target, arg)) in self.targets.iter().zip(&args).enumerate() {
            let mismatch = || Error::ArgumentTypeMismatch {
                method: self.identity(runtime_type),
                position,
                expected: target.value_type().name().to_string(),
                found: arg.type_name().to_string(),
            };
            if !target.value_type().accepts(arg) {
                return Err(mismatch());
            }
            match target.assign(&mut *state, arg) {
                Ok(()) => {}
                Err(AccessError::Value) => return Err(mismatch()),
                Err(AccessError::Target) => {
                    return Err(Error::TargetTypeMismatch {
                        method: self.identity(runtime_type),
                        expected: self.class.state_type_name().to_string(),
                        found: "foreign state".to_string(),
                    });
                }
                Err(AccessError::ReadOnly) => {
                    return Err(Error::MissingPropertySetter {
                        class: self.class.name().to_string(),
                        property: target.name().to_string(),
                    });
                }
            }
        }

        self.class.run_default_constructor(&mut *state)?;
        Instance::new(Arc::clone(runtime_type), state)
    }
}

/// Kind summary used in log lines
pub(crate) fn describe_targets(targets: &[InjectionTarget]) -> (usize, usize) {
    let fields = targets
        .iter()
        .filter(|t| t.kind() == MemberKind::Field)
        .count();
    (fields, targets.len() - fields)
}
