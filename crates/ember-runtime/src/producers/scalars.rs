use ember_heap::{HeapRef, HeapResult, JsValue, ObjectClass};

use crate::context::InspectCx;
use crate::remote_object::PropertyDescriptor;

pub(crate) fn primitive_value(
    cx: &mut InspectCx<'_>,
    wrapper: HeapRef,
) -> HeapResult<Vec<PropertyDescriptor>> {
    let value = cx.heap.primitive_value(wrapper)?;
    Ok(vec![PropertyDescriptor::internal(
        "[[PrimitiveValue]]",
        cx.describe(&value)?,
    )])
}

pub(crate) fn generator_function(
    cx: &mut InspectCx<'_>,
    _function: HeapRef,
) -> HeapResult<Vec<PropertyDescriptor>> {
    Ok(vec![PropertyDescriptor::internal(
        "[[IsGenerator]]",
        cx.describe(&JsValue::Boolean(true))?,
    )])
}

pub(crate) fn generator_object(
    cx: &mut InspectCx<'_>,
    generator: HeapRef,
) -> HeapResult<Vec<PropertyDescriptor>> {
    let state = JsValue::from(cx.heap.generator_state(generator)?.as_str());
    let function = cx.heap.generator_function(generator)?;
    // The engine does not record the receiver; report the global object.
    let receiver = cx.heap.global_object();

    Ok(vec![
        PropertyDescriptor::internal("[[GeneratorState]]", cx.describe(&state)?),
        PropertyDescriptor::internal("[[GeneratorFunction]]", cx.describe_cached(function)?),
        PropertyDescriptor::internal("[[GeneratorReceiver]]", cx.describe_cached(receiver)?),
    ])
}

/// `format` for NumberFormat and DateTimeFormat, `compare` for Collator.
pub(crate) fn intl_bound_function(
    cx: &mut InspectCx<'_>,
    object: HeapRef,
) -> HeapResult<Vec<PropertyDescriptor>> {
    let name = match cx.heap.object_class(object)? {
        ObjectClass::Collator => "compare",
        _ => "format",
    };
    let function = cx.heap.intl_bound_function(object)?;
    Ok(vec![PropertyDescriptor::internal(
        name,
        cx.describe_cached(function)?,
    )])
}

pub(crate) fn regexp(
    cx: &mut InspectCx<'_>,
    regexp: HeapRef,
) -> HeapResult<Vec<PropertyDescriptor>> {
    let flags = cx.heap.regexp_flags(regexp)?;
    let original_flags = cx.heap.regexp_original_flags(regexp)?;
    let source = cx.heap.regexp_source(regexp)?;

    let slots = [
        ("global", JsValue::Boolean(flags.global)),
        ("ignoreCase", JsValue::Boolean(flags.ignore_case)),
        ("multiline", JsValue::Boolean(flags.multiline)),
        ("dotAll", JsValue::Boolean(flags.dot_all)),
        ("hasIndices", JsValue::Boolean(flags.has_indices)),
        ("unicode", JsValue::Boolean(flags.unicode)),
        ("sticky", JsValue::Boolean(flags.sticky)),
        ("flags", JsValue::String(original_flags)),
        ("source", JsValue::String(source)),
    ];
    let mut out = Vec::with_capacity(slots.len());
    for (name, value) in slots {
        out.push(PropertyDescriptor::internal(name, cx.describe(&value)?));
    }
    Ok(out)
}
