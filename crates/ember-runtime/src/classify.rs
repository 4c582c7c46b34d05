use ember_heap::{ObjectClass, PrimitiveKind};

/// Which internal-slot producer applies to an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExoticKind {
    ArrayBuffer,
    SharedArrayBuffer,
    MapIterator,
    SetIterator,
    PrimitiveNumber,
    PrimitiveString,
    PrimitiveBoolean,
    GeneratorFunction,
    GeneratorObject,
    IntlNumberFormat,
    IntlCollator,
    IntlDateTimeFormat,
    Map,
    RegExp,
    Set,
    Plain,
}

type Predicate = fn(ObjectClass) -> bool;

/// Checked in order; the first match wins.
const CLASSIFIERS: &[(ExoticKind, Predicate)] = &[
    (ExoticKind::ArrayBuffer, |c| matches!(c, ObjectClass::ArrayBuffer)),
    (ExoticKind::SharedArrayBuffer, |c| {
        matches!(c, ObjectClass::SharedArrayBuffer)
    }),
    (ExoticKind::MapIterator, |c| matches!(c, ObjectClass::MapIterator)),
    (ExoticKind::SetIterator, |c| matches!(c, ObjectClass::SetIterator)),
    (ExoticKind::PrimitiveNumber, |c| {
        matches!(c, ObjectClass::PrimitiveWrapper(PrimitiveKind::Number))
    }),
    (ExoticKind::PrimitiveString, |c| {
        matches!(c, ObjectClass::PrimitiveWrapper(PrimitiveKind::String))
    }),
    (ExoticKind::PrimitiveBoolean, |c| {
        matches!(c, ObjectClass::PrimitiveWrapper(PrimitiveKind::Boolean))
    }),
    (ExoticKind::GeneratorFunction, |c| {
        matches!(c, ObjectClass::Function { generator: true, .. })
    }),
    (ExoticKind::GeneratorObject, |c| {
        matches!(c, ObjectClass::GeneratorObject)
    }),
    (ExoticKind::IntlNumberFormat, |c| {
        matches!(c, ObjectClass::NumberFormat)
    }),
    (ExoticKind::IntlCollator, |c| matches!(c, ObjectClass::Collator)),
    (ExoticKind::IntlDateTimeFormat, |c| {
        matches!(c, ObjectClass::DateTimeFormat)
    }),
    (ExoticKind::Map, |c| matches!(c, ObjectClass::Map)),
    (ExoticKind::RegExp, |c| matches!(c, ObjectClass::RegExp)),
    (ExoticKind::Set, |c| matches!(c, ObjectClass::Set)),
];

pub fn classify(class: ObjectClass) -> ExoticKind {
    CLASSIFIERS
        .iter()
        .find(|(_, predicate)| predicate(class))
        .map(|(kind, _)| *kind)
        .unwrap_or(ExoticKind::Plain)
}

/// Independent of [`classify`]: a typed array gets the element pass on top of
/// whatever its primary producer emitted.
pub fn is_typed_array(class: ObjectClass) -> bool {
    class.is_typed_array()
}
