//! Class synthesizer tests

use std::sync::Arc;

use edi_application::binder::DeferredBinder;
use edi_application::synthesizer::ClassSynthesizer;
use edi_application::weaver::InterceptionWeaver;
use edi_domain::class::ClassBuilder;
use edi_domain::marker::{MarkerKind, MarkerSet};
use edi_domain::object::RuntimeType;
use edi_domain::value::{Value, ValueType};

use crate::fixtures::{Documented, Greeter, greeter_builder, greeter_type, message_args, registry};

#[derive(Debug)]
struct Route {
    template: &'static str,
    order: i32,
}

fn synthesizer() -> ClassSynthesizer {
    ClassSynthesizer::new(InterceptionWeaver::new(Arc::new(registry())))
}

#[test]
fn test_plain_class_needs_no_subtype() {
    let plain = RuntimeType::original(
        greeter_builder()
            .annotate("describe", Documented)
            .build()
            .expect("class"),
    );
    let mut binder = DeferredBinder::new();
    let subtype = synthesizer().synthesize(&plain, &mut binder).expect("synthesize");
    assert!(subtype.is_none());
    assert!(binder.is_empty());
}

#[test]
fn test_subtype_injects_and_intercepts() {
    let greeter = greeter_type();
    let mut binder = DeferredBinder::new();
    let subtype = synthesizer()
        .synthesize(&greeter, &mut binder)
        .expect("synthesize")
        .expect("subtype");
    binder.run().expect("bind");

    assert_eq!(subtype.name(), "DI_Greeter");
    assert!(subtype.is_synthesized());
    assert!(subtype.is_derived_from(&greeter));
    assert!(subtype.is_overridden("simple"));
    assert!(subtype.is_overridden("message"));
    assert!(!subtype.is_overridden("describe"));
    assert_eq!(
        subtype.constructor_parameters(),
        vec![ValueType::value::<String>(), ValueType::value::<String>()]
    );

    let instance = subtype
        .construct(vec![
            Value::new("Hello".to_string()),
            Value::new("World".to_string()),
        ])
        .expect("construct");
    assert_eq!(instance.invoke::<_, i32>("simple", ()).expect("simple"), 2);
    assert_eq!(
        instance
            .invoke::<_, String>(
                "message",
                ("there".to_string(), "Pete".to_string(), 2i32)
            )
            .expect("message"),
        "Hello there Pete 2!!"
    );
    assert_eq!(
        instance.invoke::<_, String>("describe", ()).expect("describe"),
        "Hello World"
    );

    // the original keeps its own behaviour
    let original = greeter.construct(Vec::new()).expect("construct");
    assert_eq!(original.invoke::<_, i32>("simple", ()).expect("simple"), 1);
    let result = original.call("message", &message_args()).expect("message");
    assert_eq!(result.get::<String>().as_deref(), Some(" there Pete 2!"));
}

#[test]
fn test_injection_only_subtype_keeps_original_dispatch() {
    let greeter = RuntimeType::original(greeter_builder().inject("name").build().expect("class"));
    let mut binder = DeferredBinder::new();
    let subtype = synthesizer()
        .synthesize(&greeter, &mut binder)
        .expect("synthesize")
        .expect("subtype");
    assert!(binder.is_empty());

    let instance = subtype
        .construct(vec![Value::new("World".to_string())])
        .expect("construct");
    assert_eq!(instance.invoke::<_, i32>("simple", ()).expect("simple"), 1);
    assert_eq!(instance.state::<Greeter>().map(|g| g.name.as_str()), Some("World"));
}

#[test]
fn test_interception_only_subtype_inherits_constructor() {
    let greeter = RuntimeType::original(
        greeter_builder()
            .annotate("simple", crate::fixtures::SimpleIntercept)
            .build()
            .expect("class"),
    );
    let mut binder = DeferredBinder::new();
    let subtype = synthesizer()
        .synthesize(&greeter, &mut binder)
        .expect("synthesize")
        .expect("subtype");
    binder.run().expect("bind");

    assert!(subtype.constructor_parameters().is_empty());
    let instance = subtype.construct(Vec::new()).expect("construct");
    assert!(instance.state::<Greeter>().is_some_and(|g| g.constructed));
    assert_eq!(instance.invoke::<_, i32>("simple", ()).expect("simple"), 2);
}

#[test]
fn test_subtype_exposes_original_markers() {
    #[derive(Default)]
    struct Controller;
    #[derive(Debug)]
    struct ApiController;

    let class = ClassBuilder::<Controller>::new("Controller")
        .virtual_method("get", |_this, (id,): (i64,)| id)
        .annotate_class(ApiController)
        .annotate_class(Route {
            template: "class-attr",
            order: 345,
        })
        .annotate("get", crate::fixtures::SimpleIntercept)
        .annotate("get", Route {
            template: "httpget",
            order: 0,
        })
        .annotate_parameter("get", 0, Documented)
        .build()
        .expect("class");
    let base = RuntimeType::original(class);
    let mut binder = DeferredBinder::new();
    let subtype = synthesizer()
        .synthesize(&base, &mut binder)
        .expect("synthesize")
        .expect("subtype");

    assert_eq!(subtype.markers().find_all::<ApiController>().len(), 1);
    let route = subtype.markers().find::<Route>().expect("class route");
    assert_eq!((route.template, route.order), ("class-attr", 345));

    let get = subtype.method("get").expect("get");
    assert_eq!(get.markers().find::<Route>().map(|r| r.template), Some("httpget"));
    assert!(get.parameters()[0].markers().has_kind(MarkerKind::of::<Documented>()));
}

#[test]
fn test_custom_prefix() {
    let synthesizer =
        ClassSynthesizer::with_prefix(InterceptionWeaver::new(Arc::new(registry())), "Enhanced");
    assert_eq!(synthesizer.subtype_name("Greeter"), "EnhancedGreeter");
}
