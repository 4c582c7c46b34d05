use ember_heap::{FunctionKind, JsValue, MockHeap, PropertyAttributes};
use ember_runtime::{GetPropertiesParams, RuntimeAgent};

use super::{entry, expose, names, properties, value};

#[test]
fn accessor_only_keeps_getters_and_setters() {
    let mut heap = MockHeap::new();
    let getter = heap.alloc_function("get size", FunctionKind::Arrow);
    let setter = heap.alloc_function("set label", FunctionKind::Arrow);
    let object = heap.alloc_object();
    heap.set(object, "plain", JsValue::Number(1.0)).unwrap();
    heap.define_property(
        object,
        "size",
        PropertyAttributes::accessor(Some(JsValue::Object(getter)), None, false, true),
    )
    .unwrap();
    heap.define_property(
        object,
        "label",
        PropertyAttributes::accessor(
            Some(JsValue::Undefined),
            Some(JsValue::Object(setter)),
            true,
            true,
        ),
    )
    .unwrap();
    heap.define_property(
        object,
        "hollow",
        PropertyAttributes::accessor(Some(JsValue::Undefined), Some(JsValue::Undefined), true, true),
    )
    .unwrap();
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, object);

    let returns = agent
        .get_properties(
            &GetPropertiesParams::new(id)
                .own_properties(true)
                .accessor_properties_only(true),
        )
        .unwrap();
    // The prototype is still listed: the accessor-only flag overrides own-only.
    assert_eq!(names(&returns), ["size", "label", "__proto__"]);

    let size = entry(&returns, "size");
    assert!(size.get.as_ref().unwrap().object_id.is_some());
    assert!(size.set.is_none());
    assert!(size.value.is_none());
    assert!(size.is_own && size.configurable && !size.enumerable);

    let label = entry(&returns, "label");
    assert!(label.get.is_none(), "undefined getter must be treated as absent");
    assert_eq!(label.set.as_ref().unwrap().type_, "function");
}

#[test]
fn without_accessor_filter_everything_is_listed() {
    let mut heap = MockHeap::new();
    let getter = heap.alloc_function("get x", FunctionKind::Arrow);
    let object = heap.alloc_object();
    heap.set(object, "plain", JsValue::Number(1.0)).unwrap();
    heap.define_property(
        object,
        "x",
        PropertyAttributes::accessor(Some(JsValue::Object(getter)), None, true, true),
    )
    .unwrap();
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, object);

    let returns = properties(&mut agent, id, true);
    assert_eq!(names(&returns), ["plain", "x"]);
    let json = serde_json::to_value(entry(&returns, "x")).unwrap();
    assert!(json.get("value").is_none());
    assert!(json.get("set").is_none());
    assert_eq!(json["get"]["type"], "function");
}

#[test]
fn proxy_values_are_not_minted() {
    let mut heap = MockHeap::new();
    let proxy = heap.alloc_proxy();
    let object = heap.alloc_object();
    heap.set(object, "wrapped", JsValue::Object(proxy)).unwrap();
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, object);
    let minted_before = agent.objects().len();

    let returns = properties(&mut agent, id, true);
    let wrapped = value(&returns, "wrapped");
    assert_eq!(wrapped.subtype.as_deref(), Some("proxy"));
    assert_eq!(wrapped.object_id, None);
    assert_eq!(agent.objects().len(), minted_before);

    let exposed = agent.expose(JsValue::Object(proxy)).unwrap();
    assert_eq!(exposed.object_id, None);
}

#[test]
fn proxies_reached_through_accessors_always_show_proto() {
    let mut heap = MockHeap::new();
    let proxy = heap.alloc_proxy();
    let object = heap.alloc_object();
    heap.define_property(
        object,
        "trap",
        PropertyAttributes::accessor(Some(JsValue::Object(proxy)), None, false, true),
    )
    .unwrap();
    let mut agent = RuntimeAgent::new(heap);
    let id = expose(&mut agent, object);

    let returns = properties(&mut agent, id, true);
    let proxy_id = entry(&returns, "trap")
        .get
        .as_ref()
        .and_then(|getter| getter.object_id)
        .expect("accessor functions are always minted");

    let proxy_props = properties(&mut agent, proxy_id, true);
    assert_eq!(names(&proxy_props), ["__proto__"]);
    assert_eq!(
        value(&proxy_props, "__proto__").subtype.as_deref(),
        Some("null")
    );
}
