use ember_heap::{FunctionKind, GeneratorState, JsValue, MockHeap};
use ember_runtime::RuntimeAgent;
use serde_json::json;

use super::{child_id, entry, expose, names, properties, value};

#[test]
fn regexp_lists_flags_then_source_before_own_properties() {
    let mut heap = MockHeap::new();
    let regexp = heap.alloc_regexp("a(b)c", "dgs");
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, regexp);

    let returns = properties(&mut agent, id, true);
    assert_eq!(
        names(&returns),
        [
            "global",
            "ignoreCase",
            "multiline",
            "dotAll",
            "hasIndices",
            "unicode",
            "sticky",
            "flags",
            "source",
            "lastIndex",
        ]
    );
    let flag = |name: &str| value(&returns, name).value.clone();
    assert_eq!(flag("global"), Some(json!(true)));
    assert_eq!(flag("ignoreCase"), Some(json!(false)));
    assert_eq!(flag("dotAll"), Some(json!(true)));
    assert_eq!(flag("hasIndices"), Some(json!(true)));
    assert_eq!(flag("sticky"), Some(json!(false)));
    assert_eq!(flag("flags"), Some(json!("dgs")));
    assert_eq!(flag("source"), Some(json!("a(b)c")));

    let global = entry(&returns, "global");
    assert!(!global.writable && !global.configurable && !global.enumerable && !global.is_own);
    assert!(entry(&returns, "lastIndex").is_own);
}

#[test]
fn has_indices_is_independent_of_dot_all() {
    let mut heap = MockHeap::new();
    let regexp = heap.alloc_regexp("x", "s");
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, regexp);

    let returns = properties(&mut agent, id, true);
    assert_eq!(value(&returns, "dotAll").value, Some(json!(true)));
    assert_eq!(value(&returns, "hasIndices").value, Some(json!(false)));
}

#[test]
fn primitive_wrappers_expose_their_value() {
    let mut heap = MockHeap::new();
    let number = heap.alloc_primitive_wrapper(JsValue::Number(1.5));
    let string = heap.alloc_primitive_wrapper(JsValue::from("s"));
    let boolean = heap.alloc_primitive_wrapper(JsValue::Boolean(false));
    let mut agent = RuntimeAgent::new(heap);

    for (object, expected) in [
        (number, json!(1.5)),
        (string, json!("s")),
        (boolean, json!(false)),
    ] {
        let id = expose(&mut agent, object);
        let returns = properties(&mut agent, id, true);
        assert_eq!(names(&returns), ["[[PrimitiveValue]]"]);
        assert_eq!(value(&returns, "[[PrimitiveValue]]").value, Some(expected));
    }
}

#[test]
fn generator_functions_are_flagged() {
    let mut heap = MockHeap::new();
    let function = heap.alloc_function("counter", FunctionKind::Generator);
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, function);

    let returns = properties(&mut agent, id, true);
    assert_eq!(returns.result[0].name, "[[IsGenerator]]");
    assert_eq!(value(&returns, "[[IsGenerator]]").value, Some(json!(true)));
    assert_eq!(names(&returns)[1..], ["prototype", "name"]);
}

#[test]
fn generator_objects_report_state_function_and_receiver() {
    let mut heap = MockHeap::new();
    let function = heap.alloc_function("counter", FunctionKind::Generator);
    let suspended = heap.alloc_generator(function, GeneratorState::SuspendedYield);
    let running = heap.alloc_generator(function, GeneratorState::Executing);
    let done = heap.alloc_generator(function, GeneratorState::Completed);
    let global = heap.global();
    let mut agent = RuntimeAgent::new(heap);

    let id = expose(&mut agent, suspended);
    let returns = properties(&mut agent, id, true);
    assert_eq!(
        names(&returns),
        [
            "[[GeneratorState]]",
            "[[GeneratorFunction]]",
            "[[GeneratorReceiver]]",
        ]
    );
    assert_eq!(
        value(&returns, "[[GeneratorState]]").value,
        Some(json!("suspended"))
    );
    let function_id = child_id(&returns, "[[GeneratorFunction]]");
    assert_eq!(
        agent.objects().resolve(function_id).unwrap(),
        &JsValue::Object(function)
    );
    let receiver_id = child_id(&returns, "[[GeneratorReceiver]]");
    assert_eq!(
        agent.objects().resolve(receiver_id).unwrap(),
        &JsValue::Object(global)
    );

    for (generator, state) in [(running, "running"), (done, "closed")] {
        let id = expose(&mut agent, generator);
        let returns = properties(&mut agent, id, true);
        assert_eq!(value(&returns, "[[GeneratorState]]").value, Some(json!(state)));
    }
}

#[test]
fn intl_objects_expose_their_bound_function() {
    let mut heap = MockHeap::new();
    let number_format = heap.alloc_number_format();
    let collator = heap.alloc_collator();
    let date_time_format = heap.alloc_date_time_format();
    let mut agent = RuntimeAgent::new(heap);

    for (object, name) in [
        (number_format, "format"),
        (collator, "compare"),
        (date_time_format, "format"),
    ] {
        let id = expose(&mut agent, object);
        let returns = properties(&mut agent, id, true);
        assert_eq!(names(&returns), [name]);
        let function = value(&returns, name);
        assert_eq!(function.type_, "function");
        assert!(function.object_id.is_some());
    }
}

#[test]
fn errors_are_described_with_their_message() {
    let mut heap = MockHeap::new();
    let error = ember_heap::Heap::new_error(&mut heap, ember_heap::ErrorKind::TypeError, "bad");
    let mut agent = RuntimeAgent::new(heap);
    let remote = agent.expose(JsValue::Object(error)).unwrap();
    assert_eq!(remote.subtype.as_deref(), Some("error"));
    assert_eq!(remote.class_name.as_deref(), Some("TypeError"));
    assert_eq!(remote.description.as_deref(), Some("TypeError: bad"));
}
