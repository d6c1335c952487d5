//! Class builder and descriptor tests

use edi_domain::class::{AccessError, ClassBuilder, InjectionTarget, MemberKind};
use edi_domain::error::Error;
use edi_domain::marker::{MarkerKind, MarkerSet};
use edi_domain::value::{Value, ValueType};

#[derive(Default)]
struct Greeter {
    prefix: String,
    suffix: String,
    name: String,
    calls: u32,
}

#[derive(Debug)]
struct Logged;

#[derive(Debug)]
struct FromHeader {
    name: Option<&'static str>,
}

fn greeter() -> ClassBuilder<Greeter> {
    ClassBuilder::<Greeter>::new("Greeter")
        .property("name", |g: &mut Greeter, v: String| g.name = v)
        .field("prefix", |g: &mut Greeter, v: String| g.prefix = v)
        .field("suffix", |g: &mut Greeter, v: String| g.suffix = v)
        .readonly_property::<u32>("calls")
        .virtual_method("greet", |this, (who,): (String,)| {
            format!("{} {who}{}", this.prefix, this.suffix)
        })
        .method("count", |this, ()| this.calls)
}

#[test]
fn test_injection_targets_fields_before_properties() {
    let class = greeter()
        .inject("name")
        .inject("suffix")
        .inject("prefix")
        .build()
        .expect("build");

    let targets = class.injection_targets();
    let names: Vec<&str> = targets.iter().map(InjectionTarget::name).collect();
    assert_eq!(names, vec!["prefix", "suffix", "name"]);
    assert_eq!(targets[0].kind(), MemberKind::Field);
    assert_eq!(targets[2].kind(), MemberKind::Property);
    assert_eq!(targets[2].value_type(), ValueType::value::<String>());
}

#[test]
fn test_no_markers_no_targets() {
    let class = greeter().build().expect("build");
    assert!(class.injection_targets().is_empty());
    assert!(class.has_default_constructor());
}

#[test]
fn test_method_descriptors() {
    let class = greeter()
        .annotate("greet", Logged)
        .annotate_parameter("greet", 0, FromHeader { name: Some("header") })
        .name_parameter("greet", 0, "who")
        .build()
        .expect("build");

    let greet = class.method("greet").expect("greet");
    assert!(greet.is_virtual());
    assert_eq!(greet.identity().to_string(), "Greeter::greet");
    assert_eq!(greet.parameter_types(), vec![ValueType::value::<String>()]);
    assert_eq!(greet.return_type(), ValueType::value::<String>());
    assert!(greet.has_marker(MarkerKind::of::<Logged>()));
    let parameter = &greet.parameters()[0];
    assert_eq!(parameter.name(), Some("who"));
    assert_eq!(
        parameter.markers().find::<FromHeader>().and_then(|m| m.name),
        Some("header")
    );

    let count = class.method("count").expect("count");
    assert!(!count.is_virtual());
    assert!(count.parameters().is_empty());
    assert_eq!(count.return_type(), ValueType::value::<u32>());
}

#[test]
fn test_unknown_member_annotation_is_rejected() {
    let err = greeter().inject("missing").build().unwrap_err();
    assert!(matches!(err, Error::UnknownMember { ref member, .. } if member == "missing"));

    let err = greeter()
        .annotate_parameter("greet", 3, Logged)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::UnknownMember { ref member, .. } if member == "greet#3"));
}

#[test]
fn test_duplicate_member_is_rejected() {
    let err = greeter()
        .field("name", |g: &mut Greeter, v: String| g.name = v)
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateMember { ref member, .. } if member == "name"));
    assert!(err.is_configuration_defect());
}

#[test]
fn test_member_setters() {
    let class = greeter().inject("prefix").inject("calls").build().expect("build");
    let mut state = class.allocate();

    let prefix = &class.fields()[0];
    assert_eq!(prefix.assign(&mut *state, &Value::new("Hi".to_string())), Ok(()));
    assert_eq!(
        prefix.assign(&mut *state, &Value::new(3i32)),
        Err(AccessError::Value)
    );

    let calls = class
        .properties()
        .iter()
        .find(|p| p.name() == "calls")
        .expect("calls");
    assert!(!calls.has_setter());
    assert_eq!(
        calls.set(&mut *state, &Value::new(1u32)),
        Err(AccessError::ReadOnly)
    );

    let mut foreign: Box<edi_domain::class::State> = Box::new(0u8);
    assert_eq!(
        prefix.assign(&mut *foreign, &Value::new("Hi".to_string())),
        Err(AccessError::Target)
    );
}

#[test]
fn test_default_constructor_runs_over_allocated_state() {
    let class = greeter()
        .constructor(|g: &mut Greeter| g.suffix = "!".to_string())
        .build()
        .expect("build");
    let mut state = class.allocate();
    class.run_default_constructor(&mut *state).expect("constructor");
    let greeter = state.downcast_ref::<Greeter>().expect("state");
    assert_eq!(greeter.suffix, "!");
}

#[test]
fn test_missing_default_constructor() {
    let class = greeter().without_default_constructor().build().expect("build");
    assert!(!class.has_default_constructor());
    let mut state = class.allocate();
    let err = class.run_default_constructor(&mut *state).unwrap_err();
    assert!(matches!(err, Error::MissingBaseConstructor { ref class } if class == "Greeter"));
}

#[test]
fn test_class_markers() {
    let class = greeter().annotate_class(Logged).build().expect("build");
    assert!(class.markers().has_kind(MarkerKind::of::<Logged>()));
    assert_eq!(class.name(), "Greeter");
    assert_eq!(class.state_type_id(), std::any::TypeId::of::<Greeter>());
}
