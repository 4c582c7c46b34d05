use ember_heap::{FunctionKind, GeneratorState, JsValue, MockHeap, TypedArrayKind};
use ember_runtime::RuntimeAgent;
use serde_json::json;

use super::{entry, expose, names, properties, value};

#[test]
fn undescribable_keys_are_skipped_and_siblings_survive() {
    let mut heap = MockHeap::new();
    let broken = heap.alloc_object();
    heap.break_object(broken);
    let object = heap.alloc_object();
    heap.set(object, "good", JsValue::Number(1.0)).unwrap();
    heap.set(object, "bad", JsValue::Object(broken)).unwrap();
    heap.set(object, "unreadable", JsValue::Null).unwrap();
    heap.set(object, "also", JsValue::Number(2.0)).unwrap();
    heap.break_property(object, "unreadable");
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, object);

    let returns = properties(&mut agent, id, true);
    assert_eq!(names(&returns), ["good", "also"]);
    assert_eq!(value(&returns, "also").value, Some(json!(2)));

    let returns = properties(&mut agent, id, false);
    assert_eq!(names(&returns), ["good", "also", "__proto__"]);
}

#[test]
fn failing_producer_keeps_own_properties_and_proto() {
    let mut heap = MockHeap::new();
    let function = heap.alloc_function("counter", FunctionKind::Generator);
    let generator = heap.alloc_generator(function, GeneratorState::SuspendedStart);
    heap.set(generator, "extra", JsValue::from("kept")).unwrap();
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, generator);
    agent.heap_mut().break_object(function);

    let returns = properties(&mut agent, id, false);
    assert_eq!(names(&returns), ["extra", "__proto__"]);
    assert_eq!(value(&returns, "extra").value, Some(json!("kept")));
}

#[test]
fn unreadable_map_slot_is_left_out_of_entries() {
    let mut heap = MockHeap::new();
    let map = heap.alloc_map(vec![
        (JsValue::Number(1.0), JsValue::from("a")),
        (JsValue::Number(2.0), JsValue::from("b")),
        (JsValue::Number(3.0), JsValue::from("c")),
    ]);
    heap.break_collection_slot(map, 1);
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, map);

    let returns = properties(&mut agent, id, true);
    assert_eq!(names(&returns), ["size", "[[Entries]]"]);
    assert_eq!(value(&returns, "size").value, Some(json!(3)));
    assert_eq!(
        value(&returns, "[[Entries]]").description.as_deref(),
        Some("Array(2)")
    );
    // The array plus the two pairs that made it in.
    assert_eq!(agent.internal_tags().len(), 3);
}

#[test]
fn unclassifiable_target_still_lists_own_properties() {
    let mut heap = MockHeap::new();
    let object = heap.alloc_object();
    heap.set(object, "a", JsValue::Boolean(true)).unwrap();
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, object);
    agent.heap_mut().break_object(object);

    let returns = properties(&mut agent, id, false);
    assert_eq!(names(&returns), ["a"]);
    assert!(entry(&returns, "a").is_own);
}

#[test]
fn oversized_typed_array_keeps_its_other_entries() {
    let mut heap = MockHeap::new();
    let array = heap.alloc_typed_array(TypedArrayKind::Uint8, 10_001);
    heap.set(array, "extra", JsValue::Null).unwrap();
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, array);

    let returns = properties(&mut agent, id, false);
    assert_eq!(names(&returns), ["extra", "__proto__"]);
    assert_eq!(value(&returns, "extra").subtype.as_deref(), Some("null"));
}
