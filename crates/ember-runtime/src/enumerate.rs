use ember_heap::{HeapRef, HeapResult, JsValue, PropertyKey};

use crate::context::InspectCx;
use crate::remote_object::{self, PropertyDescriptor};

/// Real own properties of `object`, in engine key order.
///
/// Keys the engine cannot describe are skipped and the rest are still listed.
/// With `accessor_only`, plain data properties are dropped.
pub(crate) fn own_properties(
    cx: &mut InspectCx<'_>,
    object: HeapRef,
    accessor_only: bool,
) -> HeapResult<Vec<PropertyDescriptor>> {
    let keys = cx.heap.own_property_keys(object)?;
    let mut out = Vec::with_capacity(keys.len());

    for key in keys {
        match own_property(cx, object, key.clone(), accessor_only) {
            Ok(Some(descriptor)) => out.push(descriptor),
            Ok(None) => {}
            Err(err) => {
                tracing::debug!(target: "ember.runtime", %object, ?key, error = %err, "failed to describe own property");
            }
        }
    }

    Ok(out)
}

/// `None` when the key vanished or is filtered out by `accessor_only`.
fn own_property(
    cx: &mut InspectCx<'_>,
    object: HeapRef,
    key: PropertyKey,
    accessor_only: bool,
) -> HeapResult<Option<PropertyDescriptor>> {
    let Some(attributes) = cx.heap.get_own_property(object, &key)? else {
        tracing::debug!(target: "ember.runtime", %object, ?key, "own key vanished");
        return Ok(None);
    };

    // An accessor half set to `undefined` counts as absent.
    let getter = attributes.getter.filter(|getter| !getter.is_undefined());
    let setter = attributes.setter.filter(|setter| !setter.is_undefined());
    if accessor_only && getter.is_none() && setter.is_none() {
        return Ok(None);
    }

    let mut descriptor = PropertyDescriptor {
        name: remote_object::key_name(&*cx.heap, &key)?,
        value: None,
        writable: attributes.writable,
        get: None,
        set: None,
        configurable: attributes.configurable,
        enumerable: attributes.enumerable,
        is_own: true,
        symbol: None,
    };
    if let Some(getter) = getter {
        descriptor.get = Some(cx.describe_minted(getter)?);
    }
    if let Some(setter) = setter {
        descriptor.set = Some(cx.describe_minted(setter)?);
    }
    if let Some(value) = attributes.value {
        descriptor.value = Some(cx.describe_cached(value)?);
    }
    if let PropertyKey::Symbol(symbol) = key {
        descriptor.symbol = Some(cx.describe_minted(JsValue::Symbol(symbol))?);
    }
    Ok(Some(descriptor))
}
