use ember_heap::{JsValue, MockHeap, TypedArrayKind};
use ember_runtime::RuntimeAgent;
use serde_json::json;

use super::{child_id, entry, expose, names, properties, value};

#[test]
fn array_buffer_of_twelve_bytes_gets_every_dividing_view() {
    let mut heap = MockHeap::new();
    let buffer = heap.alloc_array_buffer(vec![0; 12]);
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, buffer);

    let returns = properties(&mut agent, id, true);
    assert_eq!(
        names(&returns),
        [
            "[[Int8Array]]",
            "[[Uint8Array]]",
            "[[Uint8ClampedArray]]",
            "[[Int16Array]]",
            "[[Uint16Array]]",
            "[[Int32Array]]",
            "[[Uint32Array]]",
            "[[Float32Array]]",
        ]
    );
    for descriptor in &returns.result {
        assert!(descriptor.writable && descriptor.configurable && descriptor.is_own);
        assert!(!descriptor.enumerable);
        assert!(descriptor.value.as_ref().unwrap().object_id.is_some());
    }
    assert_eq!(
        value(&returns, "[[Int8Array]]").description.as_deref(),
        Some("Int8Array(12)")
    );
    assert_eq!(
        value(&returns, "[[Uint16Array]]").description.as_deref(),
        Some("Uint16Array(6)")
    );
    assert_eq!(
        value(&returns, "[[Float32Array]]").description.as_deref(),
        Some("Float32Array(3)")
    );
}

#[test]
fn view_set_follows_byte_length_divisibility() {
    let mut heap = MockHeap::new();
    let odd = heap.alloc_array_buffer(vec![0; 7]);
    let wide = heap.alloc_array_buffer(vec![0; 16]);
    let empty = heap.alloc_array_buffer(Vec::new());
    let mut agent = RuntimeAgent::new(heap);

    let odd_id = expose(&mut agent, odd);
    assert_eq!(
        names(&properties(&mut agent, odd_id, true)),
        ["[[Int8Array]]", "[[Uint8Array]]", "[[Uint8ClampedArray]]"]
    );

    let wide_id = expose(&mut agent, wide);
    let wide_props = properties(&mut agent, wide_id, true);
    assert_eq!(wide_props.result.len(), 11);
    assert_eq!(
        value(&wide_props, "[[BigUint64Array]]").description.as_deref(),
        Some("BigUint64Array(2)")
    );

    // Zero divides evenly by every element size.
    let empty_id = expose(&mut agent, empty);
    assert_eq!(properties(&mut agent, empty_id, true).result.len(), 11);
}

#[test]
fn views_read_the_underlying_bytes() {
    let mut heap = MockHeap::new();
    let buffer = heap.alloc_array_buffer(vec![0x01, 0x00, 0xfe, 0xff]);
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, buffer);

    let returns = properties(&mut agent, id, true);
    let view_id = child_id(&returns, "[[Int16Array]]");
    let elements = properties(&mut agent, view_id, true);
    assert_eq!(names(&elements), ["         0", "         1"]);
    assert_eq!(value(&elements, "         0").value, Some(json!(1)));
    assert_eq!(value(&elements, "         1").value, Some(json!(-2)));
}

#[test]
fn shared_array_buffer_lists_views_then_byte_length() {
    let mut heap = MockHeap::new();
    let buffer = heap.alloc_shared_array_buffer(vec![0; 6]);
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, buffer);

    let returns = properties(&mut agent, id, true);
    assert_eq!(
        names(&returns),
        [
            "[[Int8Array]]",
            "[[Uint8Array]]",
            "[[Int16Array]]",
            "[[ArrayBufferByteLength]]",
            "byteLength",
        ]
    );
    for name in ["[[ArrayBufferByteLength]]", "byteLength"] {
        let descriptor = entry(&returns, name);
        assert!(!descriptor.writable && !descriptor.configurable);
        assert!(!descriptor.enumerable && !descriptor.is_own);
        assert_eq!(value(&returns, name).value, Some(json!(6)));
    }
}

#[test]
fn typed_arrays_are_described_with_their_length() {
    let mut heap = MockHeap::new();
    let array = heap.alloc_typed_array(TypedArrayKind::Float64, 3);
    let mut agent = RuntimeAgent::new(heap);
    let remote = agent.expose(JsValue::Object(array)).unwrap();
    assert_eq!(remote.subtype.as_deref(), Some("typedarray"));
    assert_eq!(remote.description.as_deref(), Some("Float64Array(3)"));
}
