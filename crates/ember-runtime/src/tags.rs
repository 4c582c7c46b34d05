use std::collections::HashMap;

use ember_heap::HeapRef;

/// Marks objects the agent synthesized itself, so later requests can treat
/// them differently from user objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InternalValueType {
    /// `[[Entries]]` arrays and the `{key, value}` / `{value}` pairs inside them.
    Entry,
}

/// Identity-keyed tag set. Only grows for the lifetime of the agent.
#[derive(Debug, Default)]
pub struct InternalValueTagSet {
    tags: HashMap<HeapRef, InternalValueType>,
}

impl InternalValueTagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(&mut self, object: HeapRef, kind: InternalValueType) {
        self.tags.insert(object, kind);
    }

    pub fn get(&self, object: HeapRef) -> Option<InternalValueType> {
        self.tags.get(&object).copied()
    }

    pub fn is_entry(&self, object: HeapRef) -> bool {
        self.get(object) == Some(InternalValueType::Entry)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
