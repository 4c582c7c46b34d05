use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::{
    ErrorKind, GeneratorState, Heap, HeapError, HeapRef, HeapResult, HeapUsage, IterationKind,
    JsValue, ObjectClass, PrimitiveKind, PropertyAttributes, PropertyKey, RegExpFlags,
    TypedArrayKind,
};

/// Bytes accounted per cell when reporting heap usage.
const CELL_SIZE: f64 = 64.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionKind {
    /// `function f() {}`: callable and constructible, owns a `.prototype`.
    Normal,
    /// Arrow functions and bound builtins: not constructible.
    Arrow,
    /// `function* g() {}`.
    Generator,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum IntlKind {
    NumberFormat,
    Collator,
    DateTimeFormat,
}

#[derive(Clone, Debug)]
enum CellKind {
    Ordinary,
    Array,
    Function { name: String, kind: FunctionKind },
    Error,
    ArrayBuffer { bytes: Vec<u8>, shared: bool },
    TypedArray {
        kind: TypedArrayKind,
        buffer: HeapRef,
        byte_offset: usize,
        length: usize,
    },
    Map { slots: Vec<Option<(JsValue, JsValue)>> },
    Set { slots: Vec<Option<JsValue>> },
    MapIterator { index: u32, kind: IterationKind },
    SetIterator { index: u32, kind: IterationKind },
    PrimitiveWrapper(JsValue),
    Generator { state: GeneratorState, function: JsValue },
    RegExp { source: String, flags: String },
    Proxy,
    Intl { kind: IntlKind, bound: Option<HeapRef> },
    Symbol { description: Option<String> },
}

#[derive(Clone, Debug)]
struct Cell {
    kind: CellKind,
    class_name: String,
    prototype: JsValue,
    properties: IndexMap<PropertyKey, PropertyAttributes>,
}

/// Deterministic, in-memory heap test double.
///
/// Cells are never collected; `add_root` only records which values the agent
/// asked to keep alive so tests can assert on it.
pub struct MockHeap {
    cells: Vec<Cell>,
    roots: BTreeSet<HeapRef>,
    broken_objects: BTreeSet<HeapRef>,
    broken_properties: Vec<(HeapRef, PropertyKey)>,
    broken_slots: BTreeSet<(HeapRef, u32)>,
    global: HeapRef,
    object_prototype: HeapRef,
    function_prototype: HeapRef,
    array_prototype: HeapRef,
}

impl Default for MockHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHeap {
    pub fn new() -> Self {
        let mut heap = Self {
            cells: Vec::new(),
            roots: BTreeSet::new(),
            broken_objects: BTreeSet::new(),
            broken_properties: Vec::new(),
            broken_slots: BTreeSet::new(),
            global: HeapRef(0),
            object_prototype: HeapRef(0),
            function_prototype: HeapRef(0),
            array_prototype: HeapRef(0),
        };
        heap.object_prototype = heap.alloc(CellKind::Ordinary, "Object", JsValue::Null);
        let object_prototype = JsValue::Object(heap.object_prototype);
        heap.function_prototype = heap.alloc(
            CellKind::Function {
                name: String::new(),
                kind: FunctionKind::Arrow,
            },
            "Function",
            object_prototype.clone(),
        );
        heap.array_prototype = heap.alloc(CellKind::Array, "Array", object_prototype.clone());
        heap.global = heap.alloc(CellKind::Ordinary, "global", object_prototype);
        heap
    }

    pub fn global(&self) -> HeapRef {
        self.global
    }

    pub fn object_prototype(&self) -> HeapRef {
        self.object_prototype
    }

    pub fn array_prototype(&self) -> HeapRef {
        self.array_prototype
    }

    pub fn is_rooted(&self, value: &JsValue) -> bool {
        value
            .heap_ref()
            .is_some_and(|r| self.roots.contains(&r))
    }

    pub fn alloc_object(&mut self) -> HeapRef {
        let proto = JsValue::Object(self.object_prototype);
        self.alloc(CellKind::Ordinary, "Object", proto)
    }

    /// Ordinary object whose display class and prototype are chosen by the caller,
    /// e.g. an instance of a user-defined class.
    pub fn alloc_instance(&mut self, class_name: &str, prototype: JsValue) -> HeapRef {
        self.alloc(CellKind::Ordinary, class_name, prototype)
    }

    pub fn alloc_function(&mut self, name: &str, kind: FunctionKind) -> HeapRef {
        let class_name = match kind {
            FunctionKind::Generator => "GeneratorFunction",
            FunctionKind::Normal | FunctionKind::Arrow => "Function",
        };
        let proto = JsValue::Object(self.function_prototype);
        let function = self.alloc(
            CellKind::Function {
                name: name.to_string(),
                kind,
            },
            class_name,
            proto,
        );
        if kind != FunctionKind::Arrow {
            let prototype = self.alloc_object();
            self.define_raw(
                function,
                PropertyKey::from("prototype"),
                PropertyAttributes::data(JsValue::Object(prototype), true, false, false),
            );
            if kind == FunctionKind::Normal {
                self.define_raw(
                    prototype,
                    PropertyKey::from("constructor"),
                    PropertyAttributes::data(JsValue::Object(function), true, false, true),
                );
            }
        }
        self.define_raw(
            function,
            PropertyKey::from("name"),
            PropertyAttributes::data(JsValue::from(name), false, false, true),
        );
        function
    }

    pub fn alloc_array(&mut self, elements: Vec<JsValue>) -> HeapRef {
        let array = self.new_array(0);
        for (index, element) in (0u32..).zip(elements) {
            self.define_raw(
                array,
                PropertyKey::from(index),
                PropertyAttributes::default_data(element),
            );
        }
        self.sync_array_length(array);
        array
    }

    pub fn alloc_array_buffer(&mut self, bytes: Vec<u8>) -> HeapRef {
        let proto = JsValue::Object(self.object_prototype);
        self.alloc(
            CellKind::ArrayBuffer {
                bytes,
                shared: false,
            },
            "ArrayBuffer",
            proto,
        )
    }

    pub fn alloc_shared_array_buffer(&mut self, bytes: Vec<u8>) -> HeapRef {
        let proto = JsValue::Object(self.object_prototype);
        self.alloc(
            CellKind::ArrayBuffer {
                bytes,
                shared: true,
            },
            "SharedArrayBuffer",
            proto,
        )
    }

    /// Zero-filled typed array of `length` elements over a fresh buffer.
    pub fn alloc_typed_array(&mut self, kind: TypedArrayKind, length: usize) -> HeapRef {
        let buffer = self.alloc_array_buffer(vec![0; length * kind.element_size()]);
        let proto = JsValue::Object(self.object_prototype);
        self.alloc(
            CellKind::TypedArray {
                kind,
                buffer,
                byte_offset: 0,
                length,
            },
            kind.name(),
            proto,
        )
    }

    pub fn alloc_map(&mut self, entries: Vec<(JsValue, JsValue)>) -> HeapRef {
        let proto = JsValue::Object(self.object_prototype);
        let slots = entries.into_iter().map(Some).collect();
        self.alloc(CellKind::Map { slots }, "Map", proto)
    }

    /// Deletes `key`, leaving a hole in the backing store like a real ordered
    /// hash table does until it is rehashed.
    pub fn delete_map_key(&mut self, map: HeapRef, key: &JsValue) -> HeapResult<bool> {
        let CellKind::Map { slots } = &mut self.cell_mut(map)?.kind else {
            return Err(unexpected(map, "a Map"));
        };
        for slot in slots.iter_mut() {
            if slot.as_ref().is_some_and(|(k, _)| k == key) {
                *slot = None;
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn alloc_set(&mut self, values: Vec<JsValue>) -> HeapRef {
        let proto = JsValue::Object(self.object_prototype);
        let slots = values.into_iter().map(Some).collect();
        self.alloc(CellKind::Set { slots }, "Set", proto)
    }

    pub fn delete_set_value(&mut self, set: HeapRef, value: &JsValue) -> HeapResult<bool> {
        let CellKind::Set { slots } = &mut self.cell_mut(set)?.kind else {
            return Err(unexpected(set, "a Set"));
        };
        for slot in slots.iter_mut() {
            if slot.as_ref() == Some(value) {
                *slot = None;
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn alloc_map_iterator(&mut self, kind: IterationKind, index: u32) -> HeapRef {
        let proto = JsValue::Object(self.object_prototype);
        self.alloc(CellKind::MapIterator { index, kind }, "Map Iterator", proto)
    }

    pub fn alloc_set_iterator(&mut self, kind: IterationKind, index: u32) -> HeapRef {
        let proto = JsValue::Object(self.object_prototype);
        self.alloc(CellKind::SetIterator { index, kind }, "Set Iterator", proto)
    }

    /// `new Number(1)`, `new String("s")`, `new Boolean(true)`, ...
    pub fn alloc_primitive_wrapper(&mut self, value: JsValue) -> HeapRef {
        let class_name = match &value {
            JsValue::Number(_) => "Number",
            JsValue::String(_) => "String",
            JsValue::Boolean(_) => "Boolean",
            JsValue::BigInt(_) => "BigInt",
            JsValue::Symbol(_) => "Symbol",
            _ => "Object",
        };
        let proto = JsValue::Object(self.object_prototype);
        self.alloc(CellKind::PrimitiveWrapper(value), class_name, proto)
    }

    pub fn alloc_generator(&mut self, function: HeapRef, state: GeneratorState) -> HeapRef {
        let proto = self
            .function_prototype(function)
            .unwrap_or(JsValue::Object(self.object_prototype));
        self.alloc(
            CellKind::Generator {
                state,
                function: JsValue::Object(function),
            },
            "Generator",
            proto,
        )
    }

    pub fn alloc_regexp(&mut self, source: &str, flags: &str) -> HeapRef {
        let proto = JsValue::Object(self.object_prototype);
        let regexp = self.alloc(
            CellKind::RegExp {
                source: source.to_string(),
                flags: flags.to_string(),
            },
            "RegExp",
            proto,
        );
        self.define_raw(
            regexp,
            PropertyKey::from("lastIndex"),
            PropertyAttributes::data(JsValue::Number(0.0), true, false, false),
        );
        regexp
    }

    /// Proxies expose no own properties and a `null` prototype through
    /// reflection so that inspecting them never reaches a trap.
    pub fn alloc_proxy(&mut self) -> HeapRef {
        self.alloc(CellKind::Proxy, "Object", JsValue::Null)
    }

    pub fn alloc_number_format(&mut self) -> HeapRef {
        self.alloc_intl(IntlKind::NumberFormat, "NumberFormat")
    }

    pub fn alloc_collator(&mut self) -> HeapRef {
        self.alloc_intl(IntlKind::Collator, "Collator")
    }

    pub fn alloc_date_time_format(&mut self) -> HeapRef {
        self.alloc_intl(IntlKind::DateTimeFormat, "DateTimeFormat")
    }

    pub fn alloc_symbol(&mut self, description: Option<&str>) -> HeapRef {
        self.alloc(
            CellKind::Symbol {
                description: description.map(str::to_string),
            },
            "Symbol",
            JsValue::Null,
        )
    }

    pub fn define_property(
        &mut self,
        object: HeapRef,
        key: impl Into<PropertyKey>,
        attributes: PropertyAttributes,
    ) -> HeapResult<()> {
        self.object_cell(object)?;
        self.define_raw(object, key.into(), attributes);
        if self.cells[object.index()].kind_is_array() {
            self.sync_array_length(object);
        }
        Ok(())
    }

    /// Plain assignment: `object[key] = value`.
    pub fn set(
        &mut self,
        object: HeapRef,
        key: impl Into<PropertyKey>,
        value: JsValue,
    ) -> HeapResult<()> {
        self.define_property(object, key, PropertyAttributes::default_data(value))
    }

    pub fn set_prototype(&mut self, object: HeapRef, prototype: JsValue) -> HeapResult<()> {
        self.object_cell(object)?;
        self.cells[object.index()].prototype = prototype;
        Ok(())
    }

    /// Makes `object_class` fail for `object` from now on. Anything that has to
    /// describe the object fails with it.
    pub fn break_object(&mut self, object: HeapRef) {
        self.broken_objects.insert(object);
    }

    /// Makes `get_own_property(object, key)` fail from now on.
    pub fn break_property(&mut self, object: HeapRef, key: impl Into<PropertyKey>) {
        self.broken_properties.push((object, key.into()));
    }

    /// Makes reads of one backing-store slot of a Map or Set fail.
    pub fn break_collection_slot(&mut self, collection: HeapRef, slot: u32) {
        self.broken_slots.insert((collection, slot));
    }

    fn alloc_intl(&mut self, kind: IntlKind, class_name: &str) -> HeapRef {
        let proto = JsValue::Object(self.object_prototype);
        self.alloc(CellKind::Intl { kind, bound: None }, class_name, proto)
    }

    fn alloc(&mut self, kind: CellKind, class_name: &str, prototype: JsValue) -> HeapRef {
        let raw = u32::try_from(self.cells.len()).unwrap_or(u32::MAX);
        assert!(raw != u32::MAX, "mock heap exhausted");
        self.cells.push(Cell {
            kind,
            class_name: class_name.to_string(),
            prototype,
            properties: IndexMap::new(),
        });
        HeapRef(raw)
    }

    fn define_raw(&mut self, object: HeapRef, key: PropertyKey, attributes: PropertyAttributes) {
        if let Some(cell) = self.cells.get_mut(object.index()) {
            cell.properties.insert(key, attributes);
        }
    }

    fn sync_array_length(&mut self, array: HeapRef) {
        let Some(cell) = self.cells.get_mut(array.index()) else {
            return;
        };
        let current = match cell.properties.get(&PropertyKey::from("length")) {
            Some(PropertyAttributes {
                value: Some(JsValue::Number(n)),
                ..
            }) => *n as u32,
            _ => 0,
        };
        let required = cell
            .properties
            .keys()
            .filter_map(PropertyKey::as_array_index)
            .map(|index| index + 1)
            .max()
            .unwrap_or(0);
        let length = current.max(required);
        let key = PropertyKey::from("length");
        match cell.properties.get_mut(&key) {
            Some(attributes) => attributes.value = Some(JsValue::Number(f64::from(length))),
            None => {
                cell.properties.insert(
                    key,
                    PropertyAttributes::data(JsValue::Number(f64::from(length)), true, false, false),
                );
            }
        }
    }

    fn cell(&self, r: HeapRef) -> HeapResult<&Cell> {
        self.cells
            .get(r.index())
            .ok_or(HeapError::InvalidReference(r))
    }

    fn cell_mut(&mut self, r: HeapRef) -> HeapResult<&mut Cell> {
        self.cells
            .get_mut(r.index())
            .ok_or(HeapError::InvalidReference(r))
    }

    fn object_cell(&self, r: HeapRef) -> HeapResult<&Cell> {
        let cell = self.cell(r)?;
        if matches!(cell.kind, CellKind::Symbol { .. }) {
            return Err(unexpected(r, "an object"));
        }
        Ok(cell)
    }

    fn check_slot(&self, collection: HeapRef, slot: u32) -> HeapResult<()> {
        if self.broken_slots.contains(&(collection, slot)) {
            return Err(HeapError::Other(format!(
                "slot {slot} of {collection} is unreadable"
            )));
        }
        Ok(())
    }

    fn buffer_bytes(&self, buffer: HeapRef) -> HeapResult<&[u8]> {
        match &self.cell(buffer)?.kind {
            CellKind::ArrayBuffer { bytes, .. } => Ok(bytes),
            _ => Err(unexpected(buffer, "an ArrayBuffer")),
        }
    }
}

impl Cell {
    fn kind_is_array(&self) -> bool {
        matches!(self.kind, CellKind::Array)
    }
}

fn unexpected(object: HeapRef, expected: &'static str) -> HeapError {
    HeapError::UnexpectedKind { object, expected }
}

fn decode_element(kind: TypedArrayKind, bytes: &[u8]) -> JsValue {
    let mut raw = [0u8; 8];
    raw[..bytes.len()].copy_from_slice(bytes);
    match kind {
        TypedArrayKind::Int8 => JsValue::Number(f64::from(raw[0] as i8)),
        TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => JsValue::Number(f64::from(raw[0])),
        TypedArrayKind::Int16 => JsValue::Number(f64::from(i16::from_le_bytes([raw[0], raw[1]]))),
        TypedArrayKind::Uint16 => JsValue::Number(f64::from(u16::from_le_bytes([raw[0], raw[1]]))),
        TypedArrayKind::Int32 => JsValue::Number(f64::from(i32::from_le_bytes([
            raw[0], raw[1], raw[2], raw[3],
        ]))),
        TypedArrayKind::Uint32 => JsValue::Number(f64::from(u32::from_le_bytes([
            raw[0], raw[1], raw[2], raw[3],
        ]))),
        TypedArrayKind::Float32 => JsValue::Number(f64::from(f32::from_le_bytes([
            raw[0], raw[1], raw[2], raw[3],
        ]))),
        TypedArrayKind::Float64 => JsValue::Number(f64::from_le_bytes(raw)),
        TypedArrayKind::BigInt64 => JsValue::BigInt(i128::from(i64::from_le_bytes(raw))),
        TypedArrayKind::BigUint64 => JsValue::BigInt(i128::from(u64::from_le_bytes(raw))),
    }
}

/// Integer indices ascending, then string keys, then symbols, each group in
/// insertion order.
fn ordered_keys(properties: &IndexMap<PropertyKey, PropertyAttributes>) -> Vec<PropertyKey> {
    let mut indices: Vec<(u32, &PropertyKey)> = properties
        .keys()
        .filter_map(|key| key.as_array_index().map(|index| (index, key)))
        .collect();
    indices.sort_by_key(|(index, _)| *index);

    let strings = properties
        .keys()
        .filter(|key| matches!(key, PropertyKey::String(_)) && key.as_array_index().is_none());
    let symbols = properties
        .keys()
        .filter(|key| matches!(key, PropertyKey::Symbol(_)));

    indices
        .into_iter()
        .map(|(_, key)| key)
        .chain(strings)
        .chain(symbols)
        .cloned()
        .collect()
}

impl Heap for MockHeap {
    fn object_class(&self, object: HeapRef) -> HeapResult<ObjectClass> {
        if self.broken_objects.contains(&object) {
            return Err(HeapError::Other(format!("cannot reflect on {object}")));
        }
        let class = match &self.object_cell(object)?.kind {
            CellKind::Ordinary => ObjectClass::Ordinary,
            CellKind::Array => ObjectClass::Array,
            CellKind::Function { kind, .. } => ObjectClass::Function {
                constructor: *kind == FunctionKind::Normal,
                generator: *kind == FunctionKind::Generator,
            },
            CellKind::Error => ObjectClass::Error,
            CellKind::ArrayBuffer { shared: false, .. } => ObjectClass::ArrayBuffer,
            CellKind::ArrayBuffer { shared: true, .. } => ObjectClass::SharedArrayBuffer,
            CellKind::TypedArray { kind, .. } => ObjectClass::TypedArray(*kind),
            CellKind::Map { .. } => ObjectClass::Map,
            CellKind::Set { .. } => ObjectClass::Set,
            CellKind::MapIterator { .. } => ObjectClass::MapIterator,
            CellKind::SetIterator { .. } => ObjectClass::SetIterator,
            CellKind::PrimitiveWrapper(value) => ObjectClass::PrimitiveWrapper(match value {
                JsValue::Number(_) => PrimitiveKind::Number,
                JsValue::String(_) => PrimitiveKind::String,
                JsValue::Boolean(_) => PrimitiveKind::Boolean,
                JsValue::BigInt(_) => PrimitiveKind::BigInt,
                _ => PrimitiveKind::Symbol,
            }),
            CellKind::Generator { .. } => ObjectClass::GeneratorObject,
            CellKind::RegExp { .. } => ObjectClass::RegExp,
            CellKind::Proxy => ObjectClass::Proxy,
            CellKind::Intl { kind, .. } => match kind {
                IntlKind::NumberFormat => ObjectClass::NumberFormat,
                IntlKind::Collator => ObjectClass::Collator,
                IntlKind::DateTimeFormat => ObjectClass::DateTimeFormat,
            },
            CellKind::Symbol { .. } => return Err(unexpected(object, "an object")),
        };
        Ok(class)
    }

    fn class_name(&self, object: HeapRef) -> HeapResult<String> {
        Ok(self.object_cell(object)?.class_name.clone())
    }

    fn function_name(&self, function: HeapRef) -> HeapResult<String> {
        match &self.cell(function)?.kind {
            CellKind::Function { name, .. } => Ok(name.clone()),
            _ => Err(unexpected(function, "a function")),
        }
    }

    fn symbol_description(&self, symbol: HeapRef) -> HeapResult<Option<String>> {
        match &self.cell(symbol)?.kind {
            CellKind::Symbol { description } => Ok(description.clone()),
            _ => Err(unexpected(symbol, "a symbol")),
        }
    }

    fn own_property_keys(&self, object: HeapRef) -> HeapResult<Vec<PropertyKey>> {
        Ok(ordered_keys(&self.object_cell(object)?.properties))
    }

    fn get_own_property(
        &self,
        object: HeapRef,
        key: &PropertyKey,
    ) -> HeapResult<Option<PropertyAttributes>> {
        let cell = self.object_cell(object)?;
        if self
            .broken_properties
            .iter()
            .any(|(broken, broken_key)| *broken == object && broken_key == key)
        {
            return Err(HeapError::Other(format!("cannot read {key:?} of {object}")));
        }
        Ok(cell.properties.get(key).cloned())
    }

    fn prototype_of(&self, object: HeapRef) -> HeapResult<JsValue> {
        Ok(self.object_cell(object)?.prototype.clone())
    }

    fn function_prototype(&self, function: HeapRef) -> HeapResult<JsValue> {
        let cell = self.cell(function)?;
        if !matches!(cell.kind, CellKind::Function { .. }) {
            return Err(unexpected(function, "a function"));
        }
        Ok(cell
            .properties
            .get(&PropertyKey::from("prototype"))
            .and_then(|attributes| attributes.value.clone())
            .unwrap_or(JsValue::Undefined))
    }

    fn array_length(&self, array: HeapRef) -> HeapResult<u32> {
        let cell = self.cell(array)?;
        if !cell.kind_is_array() {
            return Err(unexpected(array, "an Array"));
        }
        match cell.properties.get(&PropertyKey::from("length")) {
            Some(PropertyAttributes {
                value: Some(JsValue::Number(n)),
                ..
            }) => Ok(*n as u32),
            _ => Ok(0),
        }
    }

    fn array_buffer_byte_length(&self, buffer: HeapRef) -> HeapResult<usize> {
        Ok(self.buffer_bytes(buffer)?.len())
    }

    fn new_typed_array(
        &mut self,
        kind: TypedArrayKind,
        buffer: HeapRef,
        byte_offset: usize,
        length: usize,
    ) -> HeapResult<HeapRef> {
        let byte_length = self.buffer_bytes(buffer)?.len();
        let end = length
            .checked_mul(kind.element_size())
            .and_then(|bytes| bytes.checked_add(byte_offset));
        if end.is_none_or(|end| end > byte_length) {
            return Err(HeapError::Range(format!(
                "{} of length {length} at offset {byte_offset} exceeds buffer of {byte_length} bytes",
                kind.name()
            )));
        }
        let proto = JsValue::Object(self.object_prototype);
        Ok(self.alloc(
            CellKind::TypedArray {
                kind,
                buffer,
                byte_offset,
                length,
            },
            kind.name(),
            proto,
        ))
    }

    fn typed_array_length(&self, array: HeapRef) -> HeapResult<u32> {
        match &self.cell(array)?.kind {
            CellKind::TypedArray { length, .. } => u32::try_from(*length)
                .map_err(|_| HeapError::Range(format!("typed array length {length}"))),
            _ => Err(unexpected(array, "a TypedArray")),
        }
    }

    fn typed_array_get(&self, array: HeapRef, index: u32) -> HeapResult<JsValue> {
        let CellKind::TypedArray {
            kind,
            buffer,
            byte_offset,
            length,
        } = &self.cell(array)?.kind
        else {
            return Err(unexpected(array, "a TypedArray"));
        };
        let index = index as usize;
        if index >= *length {
            return Ok(JsValue::Undefined);
        }
        let size = kind.element_size();
        let start = byte_offset + index * size;
        let bytes = self.buffer_bytes(*buffer)?;
        let element = bytes
            .get(start..start + size)
            .ok_or_else(|| HeapError::Range(format!("element {index} is out of bounds")))?;
        Ok(decode_element(*kind, element))
    }

    fn collection_size(&self, collection: HeapRef) -> HeapResult<u32> {
        let live = match &self.cell(collection)?.kind {
            CellKind::Map { slots } => slots.iter().filter(|s| s.is_some()).count(),
            CellKind::Set { slots } => slots.iter().filter(|s| s.is_some()).count(),
            _ => return Err(unexpected(collection, "a Map or Set")),
        };
        Ok(live as u32)
    }

    fn collection_total_slots(&self, collection: HeapRef) -> HeapResult<u32> {
        let total = match &self.cell(collection)?.kind {
            CellKind::Map { slots } => slots.len(),
            CellKind::Set { slots } => slots.len(),
            _ => return Err(unexpected(collection, "a Map or Set")),
        };
        Ok(total as u32)
    }

    fn map_key_at(&self, map: HeapRef, slot: u32) -> HeapResult<JsValue> {
        self.check_slot(map, slot)?;
        let CellKind::Map { slots } = &self.cell(map)?.kind else {
            return Err(unexpected(map, "a Map"));
        };
        Ok(match slots.get(slot as usize) {
            Some(Some((key, _))) => key.clone(),
            _ => JsValue::Hole,
        })
    }

    fn map_value_at(&self, map: HeapRef, slot: u32) -> HeapResult<JsValue> {
        self.check_slot(map, slot)?;
        let CellKind::Map { slots } = &self.cell(map)?.kind else {
            return Err(unexpected(map, "a Map"));
        };
        Ok(match slots.get(slot as usize) {
            Some(Some((_, value))) => value.clone(),
            _ => JsValue::Hole,
        })
    }

    fn set_value_at(&self, set: HeapRef, slot: u32) -> HeapResult<JsValue> {
        self.check_slot(set, slot)?;
        let CellKind::Set { slots } = &self.cell(set)?.kind else {
            return Err(unexpected(set, "a Set"));
        };
        Ok(match slots.get(slot as usize) {
            Some(Some(value)) => value.clone(),
            _ => JsValue::Hole,
        })
    }

    fn iterator_index(&self, iterator: HeapRef) -> HeapResult<u32> {
        match &self.cell(iterator)?.kind {
            CellKind::MapIterator { index, .. } | CellKind::SetIterator { index, .. } => Ok(*index),
            _ => Err(unexpected(iterator, "a Map or Set iterator")),
        }
    }

    fn iterator_kind(&self, iterator: HeapRef) -> HeapResult<IterationKind> {
        match &self.cell(iterator)?.kind {
            CellKind::MapIterator { kind, .. } | CellKind::SetIterator { kind, .. } => Ok(*kind),
            _ => Err(unexpected(iterator, "a Map or Set iterator")),
        }
    }

    fn primitive_value(&self, wrapper: HeapRef) -> HeapResult<JsValue> {
        match &self.cell(wrapper)?.kind {
            CellKind::PrimitiveWrapper(value) => Ok(value.clone()),
            _ => Err(unexpected(wrapper, "a primitive wrapper")),
        }
    }

    fn generator_state(&self, generator: HeapRef) -> HeapResult<GeneratorState> {
        match &self.cell(generator)?.kind {
            CellKind::Generator { state, .. } => Ok(*state),
            _ => Err(unexpected(generator, "a generator object")),
        }
    }

    fn generator_function(&self, generator: HeapRef) -> HeapResult<JsValue> {
        match &self.cell(generator)?.kind {
            CellKind::Generator { function, .. } => Ok(function.clone()),
            _ => Err(unexpected(generator, "a generator object")),
        }
    }

    fn global_object(&self) -> JsValue {
        JsValue::Object(self.global)
    }

    fn intl_bound_function(&mut self, object: HeapRef) -> HeapResult<JsValue> {
        let (kind, bound) = match &self.cell(object)?.kind {
            CellKind::Intl { kind, bound } => (*kind, *bound),
            _ => return Err(unexpected(object, "an Intl object")),
        };
        if let Some(bound) = bound {
            return Ok(JsValue::Object(bound));
        }
        let name = match kind {
            IntlKind::Collator => "compare",
            IntlKind::NumberFormat | IntlKind::DateTimeFormat => "format",
        };
        let function = self.alloc_function(name, FunctionKind::Arrow);
        if let CellKind::Intl { bound, .. } = &mut self.cell_mut(object)?.kind {
            *bound = Some(function);
        }
        Ok(JsValue::Object(function))
    }

    fn regexp_flags(&self, regexp: HeapRef) -> HeapResult<RegExpFlags> {
        Ok(RegExpFlags::parse(&self.regexp_original_flags(regexp)?))
    }

    fn regexp_original_flags(&self, regexp: HeapRef) -> HeapResult<String> {
        match &self.cell(regexp)?.kind {
            CellKind::RegExp { flags, .. } => Ok(flags.clone()),
            _ => Err(unexpected(regexp, "a RegExp")),
        }
    }

    fn regexp_source(&self, regexp: HeapRef) -> HeapResult<String> {
        match &self.cell(regexp)?.kind {
            CellKind::RegExp { source, .. } => Ok(source.clone()),
            _ => Err(unexpected(regexp, "a RegExp")),
        }
    }

    fn new_object(&mut self) -> HeapRef {
        self.alloc_object()
    }

    fn new_array(&mut self, length: u32) -> HeapRef {
        let proto = JsValue::Object(self.array_prototype);
        let array = self.alloc(CellKind::Array, "Array", proto);
        self.define_raw(
            array,
            PropertyKey::from("length"),
            PropertyAttributes::data(JsValue::Number(f64::from(length)), true, false, false),
        );
        array
    }

    fn new_error(&mut self, kind: ErrorKind, message: &str) -> HeapRef {
        let proto = JsValue::Object(self.object_prototype);
        let error = self.alloc(CellKind::Error, kind.name(), proto);
        self.define_raw(
            error,
            PropertyKey::from("message"),
            PropertyAttributes::data(JsValue::from(message), true, false, true),
        );
        error
    }

    fn create_data_property(
        &mut self,
        object: HeapRef,
        key: PropertyKey,
        value: JsValue,
    ) -> HeapResult<()> {
        self.set(object, key, value)
    }

    fn add_root(&mut self, value: &JsValue) {
        if let Some(r) = value.heap_ref() {
            self.roots.insert(r);
        }
    }

    fn heap_usage(&self) -> HeapUsage {
        HeapUsage {
            used_size: self.cells.len() as f64 * CELL_SIZE,
            total_size: self.cells.capacity() as f64 * CELL_SIZE,
        }
    }
}
