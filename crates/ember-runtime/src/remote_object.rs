//! Wire shapes for values and properties handed to the debugger client.

use ember_heap::{Heap, HeapRef, HeapResult, JsValue, ObjectClass, PropertyKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::object_table::ObjectId;

/// Mirror of a JS value as seen by the client. Objects additionally carry an
/// `objectId` once the agent has minted one for them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unserializable_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
}

impl RemoteObject {
    fn new(type_: &str) -> Self {
        Self {
            type_: type_.to_owned(),
            subtype: None,
            class_name: None,
            value: None,
            unserializable_value: None,
            description: None,
            object_id: None,
        }
    }

    fn object(class_name: String, subtype: Option<&str>, description: String) -> Self {
        Self {
            subtype: subtype.map(str::to_owned),
            class_name: Some(class_name),
            description: Some(description),
            ..Self::new("object")
        }
    }

    pub fn with_object_id(mut self, id: ObjectId) -> Self {
        self.object_id = Some(id);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<RemoteObject>,
    pub writable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<RemoteObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<RemoteObject>,
    pub configurable: bool,
    pub enumerable: bool,
    pub is_own: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<RemoteObject>,
}

impl PropertyDescriptor {
    /// Synthetic internal slot: every attribute false.
    pub fn internal(name: impl Into<String>, value: RemoteObject) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            writable: false,
            get: None,
            set: None,
            configurable: false,
            enumerable: false,
            is_own: false,
            symbol: None,
        }
    }

    /// Writable, configurable own entry (buffer views and typed-array elements).
    pub fn own_writable(name: impl Into<String>, value: RemoteObject) -> Self {
        Self {
            writable: true,
            configurable: true,
            is_own: true,
            ..Self::internal(name, value)
        }
    }
}

/// Describes `value` without minting an id for it.
pub fn describe(heap: &dyn Heap, value: &JsValue) -> HeapResult<RemoteObject> {
    let remote = match value {
        JsValue::Undefined | JsValue::Hole => RemoteObject::new("undefined"),
        JsValue::Null => RemoteObject {
            subtype: Some("null".to_owned()),
            value: Some(Value::Null),
            ..RemoteObject::new("object")
        },
        JsValue::Boolean(b) => RemoteObject {
            value: Some(Value::Bool(*b)),
            ..RemoteObject::new("boolean")
        },
        JsValue::Number(n) => describe_number(*n),
        JsValue::String(s) => RemoteObject {
            value: Some(Value::String(s.clone())),
            ..RemoteObject::new("string")
        },
        JsValue::BigInt(n) => RemoteObject {
            unserializable_value: Some(format!("{n}n")),
            description: Some(format!("{n}n")),
            ..RemoteObject::new("bigint")
        },
        JsValue::Symbol(symbol) => RemoteObject {
            description: Some(symbol_name(heap, *symbol)?),
            ..RemoteObject::new("symbol")
        },
        JsValue::Object(object) => describe_object(heap, *object)?,
    };
    Ok(remote)
}

/// `Symbol(description)`, as shown for symbol-keyed properties.
pub fn symbol_name(heap: &dyn Heap, symbol: HeapRef) -> HeapResult<String> {
    let description = heap.symbol_description(symbol)?.unwrap_or_default();
    Ok(format!("Symbol({description})"))
}

/// Display name of a property key.
pub fn key_name(heap: &dyn Heap, key: &PropertyKey) -> HeapResult<String> {
    match key {
        PropertyKey::String(name) => Ok(name.clone()),
        PropertyKey::Symbol(symbol) => symbol_name(heap, *symbol),
    }
}

fn describe_number(n: f64) -> RemoteObject {
    let unserializable = if n.is_nan() {
        Some("NaN")
    } else if n == f64::INFINITY {
        Some("Infinity")
    } else if n == f64::NEG_INFINITY {
        Some("-Infinity")
    } else if n == 0.0 && n.is_sign_negative() {
        Some("-0")
    } else {
        None
    };

    if let Some(text) = unserializable {
        return RemoteObject {
            unserializable_value: Some(text.to_owned()),
            description: Some(text.to_owned()),
            ..RemoteObject::new("number")
        };
    }

    let mut buffer = ryu_js::Buffer::new();
    let description = buffer.format_finite(n).to_owned();
    // Integral values go out as JSON integers so clients see `1`, not `1.0`.
    let value = if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    };
    RemoteObject {
        value: Some(value),
        description: Some(description),
        ..RemoteObject::new("number")
    }
}

fn describe_object(heap: &dyn Heap, object: HeapRef) -> HeapResult<RemoteObject> {
    let class = heap.object_class(object)?;
    let class_name = heap.class_name(object)?;

    let remote = match class {
        ObjectClass::Function { generator, .. } => {
            let name = heap.function_name(object)?;
            let keyword = if generator { "function*" } else { "function" };
            RemoteObject {
                class_name: Some(class_name),
                description: Some(format!("{keyword} {name}() {{ [native code] }}")),
                ..RemoteObject::new("function")
            }
        }
        ObjectClass::Array => {
            let length = heap.array_length(object)?;
            RemoteObject::object(class_name, Some("array"), format!("Array({length})"))
        }
        ObjectClass::TypedArray(kind) => {
            let length = heap.typed_array_length(object)?;
            RemoteObject::object(
                class_name,
                Some("typedarray"),
                format!("{}({length})", kind.name()),
            )
        }
        ObjectClass::ArrayBuffer | ObjectClass::SharedArrayBuffer => {
            let length = heap.array_buffer_byte_length(object)?;
            let description = format!("{class_name}({length})");
            RemoteObject::object(class_name, Some("arraybuffer"), description)
        }
        ObjectClass::Map | ObjectClass::Set => {
            let size = heap.collection_size(object)?;
            let subtype = if class == ObjectClass::Map { "map" } else { "set" };
            let description = format!("{class_name}({size})");
            RemoteObject::object(class_name, Some(subtype), description)
        }
        ObjectClass::MapIterator | ObjectClass::SetIterator => {
            let description = class_name.clone();
            RemoteObject::object(class_name, Some("iterator"), description)
        }
        ObjectClass::RegExp => {
            let description = format!(
                "/{}/{}",
                heap.regexp_source(object)?,
                heap.regexp_original_flags(object)?
            );
            RemoteObject::object(class_name, Some("regexp"), description)
        }
        ObjectClass::Error => {
            let message = heap
                .get_own_property(object, &PropertyKey::from("message"))?
                .and_then(|attributes| attributes.value)
                .and_then(|value| match value {
                    JsValue::String(message) if !message.is_empty() => Some(message),
                    _ => None,
                });
            let description = match message {
                Some(message) => format!("{class_name}: {message}"),
                None => class_name.clone(),
            };
            RemoteObject::object(class_name, Some("error"), description)
        }
        ObjectClass::GeneratorObject => {
            let description = class_name.clone();
            RemoteObject::object(class_name, Some("generator"), description)
        }
        ObjectClass::Proxy => RemoteObject::object(class_name, Some("proxy"), "Proxy".to_owned()),
        ObjectClass::Ordinary
        | ObjectClass::PrimitiveWrapper(_)
        | ObjectClass::NumberFormat
        | ObjectClass::Collator
        | ObjectClass::DateTimeFormat => {
            let description = class_name.clone();
            RemoteObject::object(class_name, None, description)
        }
    };
    Ok(remote)
}
