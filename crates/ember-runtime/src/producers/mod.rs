//! Internal-slot producers, one per exotic object kind.
//!
//! Each producer builds a fresh list of synthetic descriptors for a single
//! object; the agent concatenates them with the real own properties.

mod buffers;
mod collections;
mod scalars;

use ember_heap::{HeapRef, HeapResult};

use crate::classify::ExoticKind;
use crate::context::InspectCx;
use crate::remote_object::PropertyDescriptor;

pub(crate) use buffers::typed_array_elements;

pub(crate) type Producer =
    fn(&mut InspectCx<'_>, HeapRef) -> HeapResult<Vec<PropertyDescriptor>>;

pub(crate) fn producer_for(kind: ExoticKind) -> Option<Producer> {
    let producer: Producer = match kind {
        ExoticKind::ArrayBuffer => buffers::array_buffer,
        ExoticKind::SharedArrayBuffer => buffers::shared_array_buffer,
        ExoticKind::MapIterator | ExoticKind::SetIterator => collections::iterator,
        ExoticKind::PrimitiveNumber
        | ExoticKind::PrimitiveString
        | ExoticKind::PrimitiveBoolean => scalars::primitive_value,
        ExoticKind::GeneratorFunction => scalars::generator_function,
        ExoticKind::GeneratorObject => scalars::generator_object,
        ExoticKind::IntlNumberFormat
        | ExoticKind::IntlCollator
        | ExoticKind::IntlDateTimeFormat => scalars::intl_bound_function,
        ExoticKind::Map => collections::map,
        ExoticKind::RegExp => scalars::regexp,
        ExoticKind::Set => collections::set,
        ExoticKind::Plain => return None,
    };
    Some(producer)
}
