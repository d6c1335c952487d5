//! Class Synthesizer
//!
//! Decides per class whether a subtype is needed and builds it: the injecting
//! constructor when the class has injection targets, a woven override for
//! every method carrying a recognized interception marker.

use std::sync::Arc;

use edi_domain::constants::DEFAULT_TYPE_NAME_PREFIX;
use edi_domain::error::Result;
use edi_domain::object::RuntimeType;
use edi_domain::ports::{InstanceConstructor, MethodDispatch};
use tracing::info;

use crate::binder::DeferredBinder;
use crate::constructor::{InjectingConstructor, describe_targets};
use crate::weaver::InterceptionWeaver;

/// Builds synthesized subtypes
#[derive(Debug, Clone)]
pub struct ClassSynthesizer {
    weaver: InterceptionWeaver,
    type_name_prefix: String,
}

impl ClassSynthesizer {
    /// Create a synthesizer using the default subtype name prefix
    pub fn new(weaver: InterceptionWeaver) -> Self {
        Self::with_prefix(weaver, DEFAULT_TYPE_NAME_PREFIX)
    }

    /// Create a synthesizer naming subtypes `<prefix><ClassName>`
    pub fn with_prefix(weaver: InterceptionWeaver, type_name_prefix: impl Into<String>) -> Self {
        Self {
            weaver,
            type_name_prefix: type_name_prefix.into(),
        }
    }

    /// The interception weaver
    pub fn weaver(&self) -> &InterceptionWeaver {
        &self.weaver
    }

    /// Name given to the subtype of `class_name`
    pub fn subtype_name(&self, class_name: &str) -> String {
        format!("{}{class_name}", self.type_name_prefix)
    }

    /// Synthesize the subtype of `base`, or `None` if the class needs none
    ///
    /// Bindings for woven overrides are queued on `binder`; the returned
    /// subtype must not be instantiated before the binder has run.
    pub fn synthesize(
        &self,
        base: &Arc<RuntimeType>,
        binder: &mut DeferredBinder,
    ) -> Result<Option<Arc<RuntimeType>>> {
        let class = base.class();
        let targets = class.injection_targets();
        let (fields, properties) = describe_targets(&targets);
        let constructor = InjectingConstructor::synthesize(class, targets)?;

        let mut overrides: Vec<(String, Arc<dyn MethodDispatch>)> = Vec::new();
        for method in class.methods() {
            if let Some(woven) = self.weaver.weave(method, binder)? {
                let woven: Arc<dyn MethodDispatch> = woven;
                overrides.push((method.name().to_string(), woven));
            }
        }

        if constructor.is_none() && overrides.is_empty() {
            return Ok(None);
        }

        let name = self.subtype_name(class.name());
        info!(
            class = class.name(),
            subtype = %name,
            injected_fields = fields,
            injected_properties = properties,
            woven_methods = overrides.len(),
            "Synthesized subtype"
        );
        let constructor = constructor.map(|c| Arc::new(c) as Arc<dyn InstanceConstructor>);
        Ok(Some(RuntimeType::derive(base, name, constructor, overrides)))
    }
}
