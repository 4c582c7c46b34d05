use ember_heap::{HeapRef, HeapResult};

use crate::context::InspectCx;
use crate::remote_object::PropertyDescriptor;

/// `prototype` (constructors only) and `__proto__` entries.
///
/// Nothing is emitted for a plain own-properties request on a non-Proxy.
pub(crate) fn prototype_entries(
    cx: &mut InspectCx<'_>,
    object: HeapRef,
    own_only: bool,
    accessor_only: bool,
) -> HeapResult<Vec<PropertyDescriptor>> {
    let class = cx.heap.object_class(object)?;
    if !accessor_only && own_only && !class.is_proxy() {
        return Ok(Vec::new());
    }

    let mut out = Vec::with_capacity(2);
    if class.is_constructor() {
        let prototype = cx.heap.function_prototype(object)?;
        out.push(PropertyDescriptor {
            is_own: true,
            ..PropertyDescriptor::internal("prototype", cx.describe_cached(prototype)?)
        });
    }

    let proto = cx.heap.prototype_of(object)?;
    out.push(PropertyDescriptor {
        writable: true,
        configurable: true,
        is_own: true,
        ..PropertyDescriptor::internal("__proto__", cx.describe_cached(proto)?)
    });
    Ok(out)
}
