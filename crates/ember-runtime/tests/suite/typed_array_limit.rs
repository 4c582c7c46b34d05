use ember_config::InspectorConfig;
use ember_heap::{MockHeap, TypedArrayKind};
use ember_runtime::RuntimeAgent;
use serde_json::json;

use super::{entry, expose, names, properties, value};

#[test]
fn elements_are_listed_up_to_the_default_limit() {
    let mut heap = MockHeap::new();
    let at_limit = heap.alloc_typed_array(TypedArrayKind::Uint8, 10_000);
    let over_limit = heap.alloc_typed_array(TypedArrayKind::Uint8, 10_001);
    let mut agent = RuntimeAgent::new(heap);

    let at_limit_id = expose(&mut agent, at_limit);
    let returns = properties(&mut agent, at_limit_id, true);
    assert_eq!(returns.result.len(), 10_000);
    assert_eq!(returns.result[0].name, "         0");
    assert_eq!(returns.result[9_999].name, "      9999");

    let over_limit_id = expose(&mut agent, over_limit);
    let returns = properties(&mut agent, over_limit_id, true);
    assert!(returns.result.is_empty(), "{:?}", names(&returns));
}

#[test]
fn element_entries_are_writable_own_properties() {
    let mut heap = MockHeap::new();
    let array = heap.alloc_typed_array(TypedArrayKind::Int32, 2);
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, array);

    let returns = properties(&mut agent, id, true);
    let first = entry(&returns, "         0");
    assert!(first.writable && first.configurable && first.is_own);
    assert!(!first.enumerable);
    assert_eq!(value(&returns, "         1").value, Some(json!(0)));
}

#[test]
fn elements_follow_proto_when_requested() {
    let mut heap = MockHeap::new();
    let array = heap.alloc_typed_array(TypedArrayKind::Int8, 1);
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, array);

    assert_eq!(
        names(&properties(&mut agent, id, false)),
        ["__proto__", "         0"]
    );
}

#[test]
fn limit_comes_from_config() {
    let mut heap = MockHeap::new();
    let small = heap.alloc_typed_array(TypedArrayKind::Int16, 4);
    let large = heap.alloc_typed_array(TypedArrayKind::Int16, 5);
    let config = InspectorConfig {
        typed_array_element_limit: 4,
    };
    let mut agent = RuntimeAgent::with_config(heap, &config);

    let small_id = expose(&mut agent, small);
    assert_eq!(properties(&mut agent, small_id, true).result.len(), 4);

    let large_id = expose(&mut agent, large);
    assert!(properties(&mut agent, large_id, true).result.is_empty());
}
