use ember_heap::{HeapRef, HeapResult, JsValue, TypedArrayKind};

use crate::context::InspectCx;
use crate::remote_object::PropertyDescriptor;

const ARRAY_BUFFER_VIEWS: [TypedArrayKind; 11] = [
    TypedArrayKind::Int8,
    TypedArrayKind::Uint8,
    TypedArrayKind::Uint8Clamped,
    TypedArrayKind::Int16,
    TypedArrayKind::Uint16,
    TypedArrayKind::Int32,
    TypedArrayKind::Uint32,
    TypedArrayKind::Float32,
    TypedArrayKind::Float64,
    TypedArrayKind::BigInt64,
    TypedArrayKind::BigUint64,
];

const SHARED_ARRAY_BUFFER_VIEWS: [TypedArrayKind; 4] = [
    TypedArrayKind::Int8,
    TypedArrayKind::Uint8,
    TypedArrayKind::Int16,
    TypedArrayKind::Int32,
];

pub(crate) fn array_buffer(
    cx: &mut InspectCx<'_>,
    buffer: HeapRef,
) -> HeapResult<Vec<PropertyDescriptor>> {
    views(cx, buffer, &ARRAY_BUFFER_VIEWS)
}

pub(crate) fn shared_array_buffer(
    cx: &mut InspectCx<'_>,
    buffer: HeapRef,
) -> HeapResult<Vec<PropertyDescriptor>> {
    let mut out = views(cx, buffer, &SHARED_ARRAY_BUFFER_VIEWS)?;
    let byte_length = JsValue::Number(cx.heap.array_buffer_byte_length(buffer)? as f64);
    let remote = cx.describe(&byte_length)?;
    out.push(PropertyDescriptor::internal(
        "[[ArrayBufferByteLength]]",
        remote.clone(),
    ));
    out.push(PropertyDescriptor::internal("byteLength", remote));
    Ok(out)
}

/// One whole-buffer view per kind whose element size divides the byte length.
fn views(
    cx: &mut InspectCx<'_>,
    buffer: HeapRef,
    kinds: &[TypedArrayKind],
) -> HeapResult<Vec<PropertyDescriptor>> {
    let byte_length = cx.heap.array_buffer_byte_length(buffer)?;
    let mut out = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        let size = kind.element_size();
        if byte_length % size != 0 {
            continue;
        }
        let view = cx.heap.new_typed_array(kind, buffer, 0, byte_length / size)?;
        let remote = cx.describe_minted(JsValue::Object(view))?;
        out.push(PropertyDescriptor::own_writable(
            format!("[[{}]]", kind.name()),
            remote,
        ));
    }
    Ok(out)
}

/// Index entries for every element of a typed array, unless the array is
/// longer than the configured limit.
pub(crate) fn typed_array_elements(
    cx: &mut InspectCx<'_>,
    array: HeapRef,
) -> HeapResult<Vec<PropertyDescriptor>> {
    let length = cx.heap.typed_array_length(array)?;
    let limit = cx.typed_array_element_limit;
    if length > limit {
        tracing::warn!(
            target: "ember.runtime",
            object = %array,
            length,
            limit,
            "typed array too large to expand; element entries omitted"
        );
        return Ok(Vec::new());
    }

    let mut out = Vec::with_capacity(length as usize);
    for index in 0..length {
        let element = cx.heap.typed_array_get(array, index)?;
        let remote = cx.describe(&element)?;
        out.push(PropertyDescriptor::own_writable(
            format!("{index:>10}"),
            remote,
        ));
    }
    Ok(out)
}
