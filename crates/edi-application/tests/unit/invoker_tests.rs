//! Call-through tests

use std::sync::Arc;

use edi_application::invoker::Invoker;
use edi_domain::class::ClassBuilder;
use edi_domain::error::Error;
use edi_domain::object::RuntimeType;
use edi_domain::ports::MethodDispatch;
use edi_domain::value::Value;

use crate::fixtures::{Greeter, greeter_type, message_args};

struct Replaced;

impl MethodDispatch for Replaced {
    fn dispatch(
        &self,
        _target: &edi_domain::object::Instance,
        _args: &[Value],
    ) -> edi_domain::Result<Value> {
        Ok(Value::new("replaced".to_string()))
    }

    fn is_override(&self) -> bool {
        true
    }
}

fn message_invoker() -> (Arc<RuntimeType>, Invoker) {
    let greeter = greeter_type();
    let method = Arc::clone(greeter.method("message").expect("message"));
    (greeter, Invoker::build(method))
}

#[test]
fn test_invoker_runs_original_body_despite_override() {
    let (greeter, invoker) = message_invoker();
    let derived = RuntimeType::derive(
        &greeter,
        "Derived",
        None,
        vec![("message".to_string(), Arc::new(Replaced) as Arc<dyn MethodDispatch>)],
    );
    let instance = derived.construct(Vec::new()).expect("construct");

    let virtual_result = instance.call("message", &message_args()).expect("virtual");
    assert_eq!(virtual_result.get::<String>().as_deref(), Some("replaced"));

    let original = invoker.invoke(&instance, &message_args()).expect("call-through");
    assert_eq!(original.get::<String>().as_deref(), Some(" there Pete 2!"));
}

#[test]
fn test_invoker_reports_argument_type_mismatch_position() {
    let (greeter, invoker) = message_invoker();
    let instance = greeter.construct(Vec::new()).expect("construct");

    let mut args = message_args();
    args[2] = Value::new("two".to_string());
    let err = invoker.invoke(&instance, &args).unwrap_err();
    assert!(matches!(
        err,
        Error::ArgumentTypeMismatch { ref method, position: 2, ref expected, .. }
            if method == "Greeter::message" && expected == "i32"
    ));
}

#[test]
fn test_invoker_reports_argument_count_mismatch() {
    let (greeter, invoker) = message_invoker();
    let instance = greeter.construct(Vec::new()).expect("construct");
    let err = invoker
        .invoke(&instance, &message_args()[..2])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ArgumentCountMismatch {
            expected: 3,
            found: 2,
            ..
        }
    ));
}

#[test]
fn test_invoker_rejects_unrelated_target() {
    #[derive(Default)]
    struct Other;

    let (_, invoker) = message_invoker();
    let other = RuntimeType::original(ClassBuilder::<Other>::new("Other").build().expect("other"));
    let instance = other.construct(Vec::new()).expect("construct");

    let err = invoker.invoke(&instance, &message_args()).unwrap_err();
    assert!(matches!(err, Error::TargetTypeMismatch { .. }));
}

#[test]
fn test_invoker_sees_target_state() {
    let (greeter, invoker) = message_invoker();
    let instance = greeter.construct(Vec::new()).expect("construct");
    assert!(instance.state::<Greeter>().is_some_and(|g| g.constructed));
    assert_eq!(invoker.method().name(), "message");
    let result = invoker.invoke(&instance, &message_args()).expect("invoke");
    assert_eq!(result.get::<String>().as_deref(), Some(" there Pete 2!"));
}
