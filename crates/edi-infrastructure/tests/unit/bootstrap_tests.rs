//! Registration hook tests

use std::sync::Arc;

use edi_domain::class::ClassBuilder;
use edi_domain::error::Error;
use edi_domain::object::RuntimeType;
use edi_domain::service::ServiceKind;
use edi_domain::value::Value;
use edi_infrastructure::bootstrap::ServiceCollectionExt;
use edi_infrastructure::config::loader::ConfigBuilder;
use edi_infrastructure::container::ServiceCollection;

#[derive(Debug)]
struct Doubled;

#[derive(Default)]
struct Calculator {
    offset: i64,
}

fn calculator_type(virtual_add: bool) -> Arc<RuntimeType> {
    let builder = ClassBuilder::<Calculator>::new("Calculator")
        .field("offset", |c: &mut Calculator, v: i64| c.offset = v)
        .inject("offset");
    let builder = if virtual_add {
        builder.virtual_method("add", |this, (n,): (i64,)| this.offset + n)
    } else {
        builder.method("add", |this, (n,): (i64,)| this.offset + n)
    };
    RuntimeType::original(builder.annotate("add", Doubled).build().expect("calculator"))
}

fn doubling(services: &mut ServiceCollection) -> edi_domain::Result<edi_application::SynthesisReport> {
    services.add_enhanced_service_provider(|enhancer| {
        enhancer.add_interceptor::<Doubled>(|call| {
            let original = call.proceed()?.get::<i64>().unwrap_or_default();
            Ok(Value::new(original * 2))
        });
    })
}

#[test]
fn test_hook_rewrites_registrations_and_provider_uses_them() {
    let mut services = ServiceCollection::new();
    services
        .add_instance(ServiceKind::of::<i64>(), Value::new(10i64))
        .add_singleton(ServiceKind::of::<Calculator>(), calculator_type(true));

    let report = doubling(&mut services).expect("synthesis");
    assert_eq!(report.rewritten, 1);
    assert_eq!(
        services.descriptors()[1]
            .implementation_type()
            .map(|t| t.name().to_string())
            .as_deref(),
        Some("DI_Calculator")
    );

    let provider = services.build_service_provider();
    let calculator = provider.get_object::<Calculator>().expect("calculator");
    assert_eq!(calculator.offset, 10);
    assert_eq!(calculator.invoke::<_, i64>("add", (1i64,)).expect("add"), 22);
}

#[test]
fn test_failed_synthesis_leaves_collection_untouched() {
    let original = calculator_type(false);
    let mut services = ServiceCollection::new();
    services.add_singleton(ServiceKind::of::<Calculator>(), Arc::clone(&original));

    let err = doubling(&mut services).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Interception target Calculator::add is not virtual"
    );
    let kept = services.descriptors()[0]
        .implementation_type()
        .expect("implementation");
    assert!(Arc::ptr_eq(kept, &original));
}

#[test]
fn test_configured_prefix() {
    let config = ConfigBuilder::new().with_type_name_prefix("Woven").build();
    let mut services = ServiceCollection::new();
    services.add_singleton(ServiceKind::of::<Calculator>(), calculator_type(true));

    services
        .add_enhanced_service_provider_with(&config, |_| {})
        .expect("synthesis");
    assert_eq!(
        services.descriptors()[0]
            .implementation_type()
            .map(|t| t.name().to_string())
            .as_deref(),
        Some("WovenCalculator")
    );
}

#[test]
fn test_invalid_configuration_is_rejected_before_synthesis() {
    let config = ConfigBuilder::new().with_type_name_prefix("").build();
    let mut services = ServiceCollection::new();
    services.add_singleton(ServiceKind::of::<Calculator>(), calculator_type(true));

    let err = services
        .add_enhanced_service_provider_with(&config, |_| {})
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}
