use ember_heap::{Heap, HeapResult, JsValue};

use crate::object_table::{ObjectId, ObjectReferenceTable};
use crate::remote_object::{self, RemoteObject};
use crate::tags::{InternalValueTagSet, InternalValueType};

/// Mutable state one `getProperties` request works against.
pub(crate) struct InspectCx<'a> {
    pub heap: &'a mut dyn Heap,
    pub objects: &'a mut ObjectReferenceTable,
    pub internal: &'a mut InternalValueTagSet,
    pub typed_array_element_limit: u32,
}

impl InspectCx<'_> {
    pub fn describe(&self, value: &JsValue) -> HeapResult<RemoteObject> {
        remote_object::describe(&*self.heap, value)
    }

    /// Roots `value` in the engine and hands out a fresh id for it.
    pub fn mint(&mut self, value: JsValue) -> ObjectId {
        self.heap.add_root(&value);
        self.objects.mint(value)
    }

    pub fn describe_minted(&mut self, value: JsValue) -> HeapResult<RemoteObject> {
        let remote = self.describe(&value)?;
        let id = self.mint(value);
        Ok(remote.with_object_id(id))
    }

    /// Mints an id only for non-Proxy objects. Proxies are described without
    /// one so the client cannot drill into them and reach a trap.
    pub fn describe_cached(&mut self, value: JsValue) -> HeapResult<RemoteObject> {
        let Some(object) = value.as_object() else {
            return self.describe(&value);
        };
        if self.heap.object_class(object)?.is_proxy() {
            return self.describe(&value);
        }
        self.describe_minted(value)
    }

    pub fn tag_entry(&mut self, value: &JsValue) {
        if let Some(object) = value.as_object() {
            self.internal.tag(object, InternalValueType::Entry);
        }
    }
}
