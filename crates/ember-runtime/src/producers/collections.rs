use ember_heap::{HeapRef, HeapResult, JsValue, PropertyKey};

use crate::context::InspectCx;
use crate::remote_object::PropertyDescriptor;

pub(crate) fn iterator(
    cx: &mut InspectCx<'_>,
    iterator: HeapRef,
) -> HeapResult<Vec<PropertyDescriptor>> {
    let index = JsValue::Number(f64::from(cx.heap.iterator_index(iterator)?));
    let kind = JsValue::from(cx.heap.iterator_kind(iterator)?.as_str());
    Ok(vec![
        PropertyDescriptor::internal("[[IteratorIndex]]", cx.describe(&index)?),
        PropertyDescriptor::internal("[[IteratorKind]]", cx.describe(&kind)?),
    ])
}

/// `size` and an `[[Entries]]` array of fresh `{key, value}` pairs.
///
/// Slots the engine cannot read are left out of `[[Entries]]`.
pub(crate) fn map(cx: &mut InspectCx<'_>, map: HeapRef) -> HeapResult<Vec<PropertyDescriptor>> {
    let size = cx.heap.collection_size(map)?;
    let total = cx.heap.collection_total_slots(map)?;

    let entries = cx.heap.new_array(0);
    let mut next = 0u32;
    for slot in 0..total {
        match map_entry(cx, map, slot) {
            Ok(Some(pair)) => {
                if push_entry(cx, map, entries, next, pair) {
                    next += 1;
                }
            }
            Ok(None) => {}
            Err(err) => {
                tracing::debug!(target: "ember.runtime", %map, slot, error = %err, "failed to read map slot");
            }
        }
    }

    collection_slots(cx, size, JsValue::Object(entries))
}

/// `size` and an `[[Entries]]` array. Object elements are wrapped in a
/// `{value}` pair; primitives are stored as is.
pub(crate) fn set(cx: &mut InspectCx<'_>, set: HeapRef) -> HeapResult<Vec<PropertyDescriptor>> {
    let size = cx.heap.collection_size(set)?;
    let total = cx.heap.collection_total_slots(set)?;

    let entries = cx.heap.new_array(0);
    let mut next = 0u32;
    for slot in 0..total {
        match set_entry(cx, set, slot) {
            Ok(Some(element)) => {
                if push_entry(cx, set, entries, next, element) {
                    next += 1;
                }
            }
            Ok(None) => {}
            Err(err) => {
                tracing::debug!(target: "ember.runtime", %set, slot, error = %err, "failed to read set slot");
            }
        }
    }

    collection_slots(cx, size, JsValue::Object(entries))
}

fn map_entry(cx: &mut InspectCx<'_>, map: HeapRef, slot: u32) -> HeapResult<Option<JsValue>> {
    let key = cx.heap.map_key_at(map, slot)?;
    if key.is_hole() {
        return Ok(None);
    }
    let value = cx.heap.map_value_at(map, slot)?;

    let pair = cx.heap.new_object();
    cx.heap
        .create_data_property(pair, PropertyKey::from("key"), key)?;
    cx.heap
        .create_data_property(pair, PropertyKey::from("value"), value)?;
    Ok(Some(JsValue::Object(pair)))
}

fn set_entry(cx: &mut InspectCx<'_>, set: HeapRef, slot: u32) -> HeapResult<Option<JsValue>> {
    let value = cx.heap.set_value_at(set, slot)?;
    if value.is_hole() {
        return Ok(None);
    }
    if !value.is_object() {
        return Ok(Some(value));
    }
    let wrapper = cx.heap.new_object();
    cx.heap
        .create_data_property(wrapper, PropertyKey::from("value"), value)?;
    Ok(Some(JsValue::Object(wrapper)))
}

/// Appends `element` at `index` and tags it once it is actually listed.
/// Primitive set elements carry no tag.
fn push_entry(
    cx: &mut InspectCx<'_>,
    collection: HeapRef,
    entries: HeapRef,
    index: u32,
    element: JsValue,
) -> bool {
    match cx
        .heap
        .create_data_property(entries, PropertyKey::from(index), element.clone())
    {
        Ok(()) => {
            cx.tag_entry(&element);
            true
        }
        Err(err) => {
            tracing::debug!(target: "ember.runtime", %collection, index, error = %err, "failed to store entry");
            false
        }
    }
}

fn collection_slots(
    cx: &mut InspectCx<'_>,
    size: u32,
    entries: JsValue,
) -> HeapResult<Vec<PropertyDescriptor>> {
    cx.tag_entry(&entries);
    let size = cx.describe(&JsValue::Number(f64::from(size)))?;
    let entries = cx.describe_cached(entries)?;
    Ok(vec![
        PropertyDescriptor::internal("size", size),
        PropertyDescriptor::internal("[[Entries]]", entries),
    ])
}
