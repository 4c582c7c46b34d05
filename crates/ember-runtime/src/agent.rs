use ember_config::InspectorConfig;
use ember_heap::{ErrorKind, Heap, HeapRef, HeapResult, JsValue};

use crate::classify::{classify, is_typed_array};
use crate::context::InspectCx;
use crate::enumerate::own_properties;
use crate::object_table::ObjectReferenceTable;
use crate::producers::{producer_for, typed_array_elements};
use crate::proto::prototype_entries;
use crate::protocol::{
    CallFunctionOnParams, CallFunctionOnReturns, GetHeapUsageReturns, GetPropertiesParams,
    GetPropertiesReturns,
};
use crate::remote_object::{PropertyDescriptor, RemoteObject};
use crate::tags::InternalValueTagSet;
use crate::{RuntimeError, RuntimeResult};

/// Outbound notifications to the connected debugger client.
pub trait Frontend {
    /// The client finished its initial handshake; a VM paused at startup may
    /// continue.
    fn run_if_waiting_for_debugger(&mut self);
}

/// Runtime domain agent for one debugger session.
///
/// Owns the session's object id table and tag set; both live exactly as long
/// as the agent. Not thread-safe: drive it from the thread that owns the VM.
pub struct RuntimeAgent<H: Heap> {
    heap: H,
    objects: ObjectReferenceTable,
    internal: InternalValueTagSet,
    frontend: Option<Box<dyn Frontend>>,
    enabled: bool,
    typed_array_element_limit: u32,
}

impl<H: Heap> RuntimeAgent<H> {
    /// Agent over `heap` with the default inspector settings.
    pub fn new(heap: H) -> Self {
        Self::with_config(heap, &InspectorConfig::default())
    }

    /// Reads only the inspector section; logging is set up separately with
    /// `ember_config::init_tracing`.
    pub fn with_config(heap: H, config: &InspectorConfig) -> Self {
        Self {
            heap,
            objects: ObjectReferenceTable::new(),
            internal: InternalValueTagSet::new(),
            frontend: None,
            enabled: false,
            typed_array_element_limit: config.typed_array_element_limit,
        }
    }

    /// Replaces any previously attached frontend.
    pub fn set_frontend(&mut self, frontend: Box<dyn Frontend>) {
        self.frontend = Some(frontend);
    }

    pub fn heap(&self) -> &H {
        &self.heap
    }

    /// Direct engine access, e.g. for allocating values to expose. Ids already
    /// handed out keep pointing at whatever their values are mutated into.
    pub fn heap_mut(&mut self) -> &mut H {
        &mut self.heap
    }

    pub fn objects(&self) -> &ObjectReferenceTable {
        &self.objects
    }

    pub fn internal_tags(&self) -> &InternalValueTagSet {
        &self.internal
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Records that the client enabled the domain. Requests are served either
    /// way; `getProperties` does not check this flag.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Clears the enabled flag. Ids and tags stay valid.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Forwards to the frontend, or does nothing when none is attached.
    pub fn run_if_waiting_for_debugger(&mut self) {
        match self.frontend.as_mut() {
            Some(frontend) => frontend.run_if_waiting_for_debugger(),
            None => tracing::debug!(target: "ember.runtime", "no frontend attached"),
        }
    }

    /// Describes `value` for the client, minting an id when it is a non-Proxy
    /// object. This is how scope objects, `this` and other roots get their ids.
    pub fn expose(&mut self, value: JsValue) -> RuntimeResult<RemoteObject> {
        Ok(self.cx().describe_cached(value)?)
    }

    /// Evaluation is not supported; the result is always an `EvalError`.
    pub fn call_function_on(
        &mut self,
        params: &CallFunctionOnParams,
    ) -> RuntimeResult<CallFunctionOnReturns> {
        tracing::debug!(
            target: "ember.runtime",
            object_id = ?params.object_id,
            "callFunctionOn is not supported; returning EvalError"
        );
        let error = self.heap.new_error(ErrorKind::EvalError, "Unsupport eval now");
        let result = self.cx().describe(&JsValue::Object(error))?;
        Ok(CallFunctionOnReturns {
            result,
            exception_details: None,
        })
    }

    pub fn get_heap_usage(&self) -> GetHeapUsageReturns {
        let usage = self.heap.heap_usage();
        GetHeapUsageReturns {
            used_size: usage.used_size,
            total_size: usage.total_size,
        }
    }

    /// Lists everything the client can see on the object behind
    /// `params.object_id`: internal slots, own properties, prototype links and
    /// typed-array elements, in that order.
    ///
    /// Only an unknown id or a non-object target fails the request. Any other
    /// engine failure drops the affected group of entries and is logged.
    pub fn get_properties(
        &mut self,
        params: &GetPropertiesParams,
    ) -> RuntimeResult<GetPropertiesReturns> {
        let id = params.object_id;
        let value = match self.objects.resolve(id) {
            Ok(value) => value.clone(),
            Err(err) => {
                tracing::error!(target: "ember.runtime", object_id = %id, "unknown object id");
                return Err(err);
            }
        };
        let Some(object) = value.as_object() else {
            tracing::error!(target: "ember.runtime", object_id = %id, "object id does not refer to an object");
            return Err(RuntimeError::NotAnObject(id));
        };

        let skip_proto = self.internal.is_entry(object);
        let class = match self.heap.object_class(object) {
            Ok(class) => Some(class),
            Err(err) => {
                tracing::warn!(target: "ember.runtime", %object, error = %err, "failed to classify object");
                None
            }
        };

        let own_only = params.own_properties;
        let accessor_only = params.accessor_properties_only;
        let mut result = Vec::new();
        let mut cx = self.cx();

        if let Some(producer) = class.map(classify).and_then(producer_for) {
            extend_phase(&mut result, "internal slots", object, producer(&mut cx, object));
        }
        extend_phase(
            &mut result,
            "own properties",
            object,
            own_properties(&mut cx, object, accessor_only),
        );
        if !skip_proto {
            extend_phase(
                &mut result,
                "prototype",
                object,
                prototype_entries(&mut cx, object, own_only, accessor_only),
            );
        }
        if class.is_some_and(is_typed_array) {
            extend_phase(
                &mut result,
                "typed array elements",
                object,
                typed_array_elements(&mut cx, object),
            );
        }

        Ok(GetPropertiesReturns {
            result,
            ..GetPropertiesReturns::default()
        })
    }

    fn cx(&mut self) -> InspectCx<'_> {
        InspectCx {
            heap: &mut self.heap,
            objects: &mut self.objects,
            internal: &mut self.internal,
            typed_array_element_limit: self.typed_array_element_limit,
        }
    }
}

fn extend_phase(
    out: &mut Vec<PropertyDescriptor>,
    phase: &'static str,
    object: HeapRef,
    entries: HeapResult<Vec<PropertyDescriptor>>,
) {
    match entries {
        Ok(entries) => out.extend(entries),
        Err(err) => {
            tracing::warn!(target: "ember.runtime", %object, phase, error = %err, "property phase failed; entries omitted");
        }
    }
}
