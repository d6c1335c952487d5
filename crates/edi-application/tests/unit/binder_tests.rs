//! Deferred binder tests

use std::sync::{Arc, Mutex, OnceLock};

use edi_application::binder::{DeferredBinder, bind_once};
use edi_domain::error::Error;

#[test]
fn test_bindings_run_in_queue_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut binder = DeferredBinder::new();
    for step in ["interceptor", "template", "call-through"] {
        let order = Arc::clone(&order);
        binder.defer(step, move || {
            order.lock().expect("order").push(step);
            Ok(())
        });
    }
    assert_eq!(
        binder.labels().collect::<Vec<_>>(),
        vec!["interceptor", "template", "call-through"]
    );
    assert!(order.lock().expect("order").is_empty());

    assert_eq!(binder.run().expect("run"), 3);
    assert_eq!(
        *order.lock().expect("order"),
        vec!["interceptor", "template", "call-through"]
    );
}

#[test]
fn test_run_stops_at_first_failure() {
    let reached = Arc::new(Mutex::new(false));
    let mut binder = DeferredBinder::new();
    binder.defer("fails", || Err(Error::internal("cannot bind")));
    {
        let reached = Arc::clone(&reached);
        binder.defer("after", move || {
            *reached.lock().expect("reached") = true;
            Ok(())
        });
    }

    let err = binder.run().unwrap_err();
    assert!(matches!(err, Error::Internal { ref message } if message == "cannot bind"));
    assert!(!*reached.lock().expect("reached"));
}

#[test]
fn test_slots_are_write_once() {
    let slot = OnceLock::new();
    bind_once(&slot, 1u8, "slot").expect("first write");
    let err = bind_once(&slot, 2u8, "slot").unwrap_err();
    assert!(matches!(err, Error::Internal { ref message } if message == "slot is already bound"));
    assert_eq!(slot.get(), Some(&1));
}
