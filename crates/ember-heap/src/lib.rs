//! Engine reflection façade for Ember.
//!
//! `ember-runtime` consumes this crate to inspect a live JavaScript heap on
//! behalf of a remote debugger client. The [`Heap`] trait is the full
//! capability set the agent needs: classifying objects, walking own
//! properties, reading exotic internal state (typed arrays, Map/Set slots,
//! generators, ...) and allocating the handful of helper objects the agent
//! synthesizes for the client.
//!
//! Implementations must never run user script while answering these queries:
//! describing a property never invokes its getter, and Proxy traps never fire.

mod mock;

use thiserror::Error;

pub use mock::{FunctionKind, MockHeap};

pub type HeapResult<T> = Result<T, HeapError>;

/// Engine-side handle to a heap cell (object or symbol).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeapRef(u32);

impl HeapRef {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for HeapRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum JsValue {
    Undefined,
    Null,
    /// Empty slot marker used by the engine's Map/Set backing stores.
    Hole,
    Boolean(bool),
    Number(f64),
    String(String),
    BigInt(i128),
    Symbol(HeapRef),
    Object(HeapRef),
}

impl JsValue {
    pub fn as_object(&self) -> Option<HeapRef> {
        match self {
            Self::Object(object) => Some(*object),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    pub fn is_hole(&self) -> bool {
        matches!(self, Self::Hole)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Heap cell backing this value, if any (objects and symbols).
    pub fn heap_ref(&self) -> Option<HeapRef> {
        match self {
            Self::Object(r) | Self::Symbol(r) => Some(*r),
            _ => None,
        }
    }
}

impl From<bool> for JsValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for JsValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for JsValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<HeapRef> for JsValue {
    fn from(value: HeapRef) -> Self {
        Self::Object(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    String(String),
    Symbol(HeapRef),
}

impl PropertyKey {
    /// Returns the key as an array index when it is a canonical numeric string
    /// below `2^32 - 1`.
    pub fn as_array_index(&self) -> Option<u32> {
        let Self::String(s) = self else {
            return None;
        };
        if s.is_empty() || (s.len() > 1 && s.starts_with('0')) {
            return None;
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match s.parse::<u32>() {
            Ok(index) if index != u32::MAX => Some(index),
            _ => None,
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<u32> for PropertyKey {
    fn from(index: u32) -> Self {
        Self::String(index.to_string())
    }
}

/// Result of describing a single own property.
///
/// Data properties carry `value`/`writable`; accessor properties carry
/// `getter` and/or `setter`. The engine reports the accessor functions
/// themselves and never calls them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyAttributes {
    pub value: Option<JsValue>,
    pub getter: Option<JsValue>,
    pub setter: Option<JsValue>,
    pub writable: bool,
    pub enumerable: bool,
    pub configurable: bool,
}

impl PropertyAttributes {
    pub fn data(value: JsValue, writable: bool, enumerable: bool, configurable: bool) -> Self {
        Self {
            value: Some(value),
            writable,
            enumerable,
            configurable,
            ..Self::default()
        }
    }

    /// Writable, enumerable, configurable data property (`obj.x = v`).
    pub fn default_data(value: JsValue) -> Self {
        Self::data(value, true, true, true)
    }

    pub fn accessor(
        getter: Option<JsValue>,
        setter: Option<JsValue>,
        enumerable: bool,
        configurable: bool,
    ) -> Self {
        Self {
            getter,
            setter,
            enumerable,
            configurable,
            ..Self::default()
        }
    }

    pub fn has_getter(&self) -> bool {
        self.getter.is_some()
    }

    pub fn has_setter(&self) -> bool {
        self.setter.is_some()
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypedArrayKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
    BigInt64,
    BigUint64,
}

impl TypedArrayKind {
    pub const fn element_size(self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 | Self::Uint8Clamped => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
            Self::Float64 | Self::BigInt64 | Self::BigUint64 => 8,
        }
    }

    /// Constructor name, e.g. `Uint8ClampedArray`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "Int8Array",
            Self::Uint8 => "Uint8Array",
            Self::Uint8Clamped => "Uint8ClampedArray",
            Self::Int16 => "Int16Array",
            Self::Uint16 => "Uint16Array",
            Self::Int32 => "Int32Array",
            Self::Uint32 => "Uint32Array",
            Self::Float32 => "Float32Array",
            Self::Float64 => "Float64Array",
            Self::BigInt64 => "BigInt64Array",
            Self::BigUint64 => "BigUint64Array",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveKind {
    Number,
    String,
    Boolean,
    BigInt,
    Symbol,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IterationKind {
    Keys,
    Values,
    Entries,
}

impl IterationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keys => "keys",
            Self::Values => "values",
            Self::Entries => "entries",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratorState {
    SuspendedStart,
    SuspendedYield,
    Executing,
    Completed,
}

impl GeneratorState {
    /// Name shown to debugger clients.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuspendedStart | Self::SuspendedYield => "suspended",
            Self::Executing => "running",
            Self::Completed => "closed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    EvalError,
    RangeError,
    ReferenceError,
    SyntaxError,
    TypeError,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::EvalError => "EvalError",
            Self::RangeError => "RangeError",
            Self::ReferenceError => "ReferenceError",
            Self::SyntaxError => "SyntaxError",
            Self::TypeError => "TypeError",
        }
    }
}

/// Engine-level object layout classes.
///
/// This is what the engine knows about an object's internal representation;
/// mapping it to debugger-visible internal slots is the agent's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectClass {
    Ordinary,
    Array,
    Function { constructor: bool, generator: bool },
    Error,
    ArrayBuffer,
    SharedArrayBuffer,
    TypedArray(TypedArrayKind),
    Map,
    Set,
    MapIterator,
    SetIterator,
    PrimitiveWrapper(PrimitiveKind),
    GeneratorObject,
    RegExp,
    Proxy,
    NumberFormat,
    Collator,
    DateTimeFormat,
}

impl ObjectClass {
    pub fn is_proxy(self) -> bool {
        matches!(self, Self::Proxy)
    }

    pub fn is_constructor(self) -> bool {
        matches!(self, Self::Function { constructor: true, .. })
    }

    pub fn is_typed_array(self) -> bool {
        matches!(self, Self::TypedArray(_))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegExpFlags {
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
    pub has_indices: bool,
    pub unicode: bool,
    pub sticky: bool,
}

impl RegExpFlags {
    /// Parses a flags string such as `"gimsuyd"`; unknown flags are ignored.
    pub fn parse(flags: &str) -> Self {
        let mut out = Self::default();
        for flag in flags.chars() {
            match flag {
                'g' => out.global = true,
                'i' => out.ignore_case = true,
                'm' => out.multiline = true,
                's' => out.dot_all = true,
                'd' => out.has_indices = true,
                'u' => out.unicode = true,
                'y' => out.sticky = true,
                _ => {}
            }
        }
        out
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeapUsage {
    pub used_size: f64,
    pub total_size: f64,
}

#[derive(Debug, Error)]
pub enum HeapError {
    #[error("invalid heap reference {0}")]
    InvalidReference(HeapRef),
    #[error("heap cell {object} is not {expected}")]
    UnexpectedKind {
        object: HeapRef,
        expected: &'static str,
    },
    #[error("range error: {0}")]
    Range(String),
    #[error("{0}")]
    Other(String),
}

/// Reflection interface over a live JavaScript heap.
///
/// All methods run on the thread that owns the VM. Read-only queries take
/// `&self`; the few operations that allocate helper objects take `&mut self`.
pub trait Heap {
    fn object_class(&self, object: HeapRef) -> HeapResult<ObjectClass>;

    /// Constructor name used for display (`Object`, `Map`, `Foo`, ...).
    fn class_name(&self, object: HeapRef) -> HeapResult<String>;

    fn function_name(&self, function: HeapRef) -> HeapResult<String>;

    fn symbol_description(&self, symbol: HeapRef) -> HeapResult<Option<String>>;

    /// Own property keys in engine order (integer indices ascending, then
    /// strings and symbols in insertion order).
    fn own_property_keys(&self, object: HeapRef) -> HeapResult<Vec<PropertyKey>>;

    /// Describes one own property. `Ok(None)` means the key is not (or no
    /// longer) an own property.
    fn get_own_property(
        &self,
        object: HeapRef,
        key: &PropertyKey,
    ) -> HeapResult<Option<PropertyAttributes>>;

    fn prototype_of(&self, object: HeapRef) -> HeapResult<JsValue>;

    /// Value of a function's `.prototype` slot.
    fn function_prototype(&self, function: HeapRef) -> HeapResult<JsValue>;

    fn array_length(&self, array: HeapRef) -> HeapResult<u32>;

    fn array_buffer_byte_length(&self, buffer: HeapRef) -> HeapResult<usize>;

    fn new_typed_array(
        &mut self,
        kind: TypedArrayKind,
        buffer: HeapRef,
        byte_offset: usize,
        length: usize,
    ) -> HeapResult<HeapRef>;

    fn typed_array_length(&self, array: HeapRef) -> HeapResult<u32>;

    fn typed_array_get(&self, array: HeapRef, index: u32) -> HeapResult<JsValue>;

    /// Number of live entries in a Map or Set.
    fn collection_size(&self, collection: HeapRef) -> HeapResult<u32>;

    /// Number of backing slots in a Map or Set, including deleted ones.
    fn collection_total_slots(&self, collection: HeapRef) -> HeapResult<u32>;

    /// Key stored at `slot`; [`JsValue::Hole`] for deleted slots.
    fn map_key_at(&self, map: HeapRef, slot: u32) -> HeapResult<JsValue>;

    fn map_value_at(&self, map: HeapRef, slot: u32) -> HeapResult<JsValue>;

    /// Element stored at `slot`; [`JsValue::Hole`] for deleted slots.
    fn set_value_at(&self, set: HeapRef, slot: u32) -> HeapResult<JsValue>;

    fn iterator_index(&self, iterator: HeapRef) -> HeapResult<u32>;

    fn iterator_kind(&self, iterator: HeapRef) -> HeapResult<IterationKind>;

    fn primitive_value(&self, wrapper: HeapRef) -> HeapResult<JsValue>;

    fn generator_state(&self, generator: HeapRef) -> HeapResult<GeneratorState>;

    fn generator_function(&self, generator: HeapRef) -> HeapResult<JsValue>;

    fn global_object(&self) -> JsValue;

    /// Bound `format` (NumberFormat, DateTimeFormat) or `compare` (Collator)
    /// function of an Intl object. Engines may create it lazily.
    fn intl_bound_function(&mut self, object: HeapRef) -> HeapResult<JsValue>;

    fn regexp_flags(&self, regexp: HeapRef) -> HeapResult<RegExpFlags>;

    /// Flags string exactly as written in the source.
    fn regexp_original_flags(&self, regexp: HeapRef) -> HeapResult<String>;

    fn regexp_source(&self, regexp: HeapRef) -> HeapResult<String>;

    fn new_object(&mut self) -> HeapRef;

    fn new_array(&mut self, length: u32) -> HeapRef;

    fn new_error(&mut self, kind: ErrorKind, message: &str) -> HeapRef;

    fn create_data_property(
        &mut self,
        object: HeapRef,
        key: PropertyKey,
        value: JsValue,
    ) -> HeapResult<()>;

    /// Keep `value` alive for as long as the debugger session holds it.
    fn add_root(&mut self, _value: &JsValue) {}

    fn heap_usage(&self) -> HeapUsage {
        HeapUsage::default()
    }
}
