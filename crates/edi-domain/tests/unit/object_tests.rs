//! Runtime type and instance tests

use std::sync::Arc;

use edi_domain::class::ClassBuilder;
use edi_domain::error::Error;
use edi_domain::object::{Instance, Object, RuntimeType};
use edi_domain::ports::MethodDispatch;
use edi_domain::value::Value;

#[derive(Default)]
struct Counter {
    start: i64,
}

fn counter_type() -> Arc<RuntimeType> {
    let class = ClassBuilder::<Counter>::new("Counter")
        .constructor(|c: &mut Counter| c.start = 10)
        .virtual_method("add", |this, (n,): (i64,)| this.start + n)
        .virtual_method("twice", |this, (n,): (i64,)| {
            this.invoke::<_, i64>("add", (n,)).unwrap_or_default() * 2
        })
        .build()
        .expect("build");
    RuntimeType::original(class)
}

struct Constant(i64);

impl MethodDispatch for Constant {
    fn dispatch(&self, _target: &Instance, _args: &[Value]) -> edi_domain::Result<Value> {
        Ok(Value::new(self.0))
    }

    fn is_override(&self) -> bool {
        true
    }
}

#[test]
fn test_original_type_constructs_with_default_constructor() {
    let counter = counter_type();
    assert!(!counter.is_synthesized());
    assert!(counter.constructor_parameters().is_empty());

    let instance = counter.construct(Vec::new()).expect("construct");
    assert_eq!(instance.state::<Counter>().map(|c| c.start), Some(10));
    assert_eq!(instance.invoke::<_, i64>("add", (5i64,)).expect("add"), 15);
}

#[test]
fn test_original_type_rejects_constructor_arguments() {
    let err = counter_type()
        .construct(vec![Value::new(1i64)])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ArgumentCountMismatch {
            expected: 0,
            found: 1,
            ..
        }
    ));
}

#[test]
fn test_unknown_method() {
    let instance = counter_type().construct(Vec::new()).expect("construct");
    let err = instance.call("missing", &[]).unwrap_err();
    assert!(matches!(err, Error::UnknownMethod { ref method, .. } if method == "missing"));
}

#[test]
fn test_body_argument_type_errors_surface_at_call_time() {
    let instance = counter_type().construct(Vec::new()).expect("construct");
    let err = instance
        .call("add", &[Value::new("five".to_string())])
        .unwrap_err();
    assert!(matches!(err, Error::ArgumentTypeMismatch { position: 0, .. }));
    assert!(err.is_type_error());
}

#[test]
fn test_typed_invoke_checks_return_type() {
    let instance = counter_type().construct(Vec::new()).expect("construct");
    let err = instance.invoke::<_, String>("add", (1i64,)).unwrap_err();
    assert!(matches!(err, Error::ReturnTypeMismatch { .. }));
}

#[test]
fn test_derived_type_overrides_dispatch_virtually() {
    let base = counter_type();
    let derived = RuntimeType::derive(
        &base,
        "DI_Counter",
        None,
        vec![("add".to_string(), Arc::new(Constant(100)) as Arc<dyn MethodDispatch>)],
    );
    assert!(derived.is_synthesized());
    assert!(derived.is_derived_from(&base));
    assert!(!base.is_derived_from(&derived));
    assert!(derived.is_overridden("add"));
    assert!(!derived.is_overridden("twice"));

    let instance = derived.construct(Vec::new()).expect("inherited constructor");
    assert_eq!(instance.type_name(), "DI_Counter");
    assert_eq!(instance.invoke::<_, i64>("add", (1i64,)).expect("add"), 100);
    // the original body of `twice` reaches the override through the receiver
    assert_eq!(instance.invoke::<_, i64>("twice", (1i64,)).expect("twice"), 200);
}

#[test]
fn test_object_reference_wraps_matching_state_only() {
    let instance = Arc::new(counter_type().construct(Vec::new()).expect("construct"));
    let object = Object::<Counter>::new(Arc::clone(&instance)).expect("counter");
    assert_eq!(object.start, 10);
    assert_eq!(object.invoke::<_, i64>("add", (1i64,)).expect("add"), 11);
    assert!(Object::<String>::new(instance).is_none());
}

#[test]
fn test_instance_rejects_foreign_state() {
    let err = Instance::new(counter_type(), Box::new(1u8)).unwrap_err();
    assert!(matches!(err, Error::Internal { .. }));
}
