//! Runtime domain agent for Ember.
//!
//! Given an object id previously handed to a debugger client, the agent
//! lists everything the client can see on that object: engine-internal slots
//! of built-in exotic objects, real own properties, prototype links and
//! typed-array elements. Every object reachable from the response gets its
//! own id, so the client can keep drilling down.

mod agent;
mod classify;
mod context;
mod dispatch;
mod enumerate;
mod error;
mod object_table;
mod producers;
mod proto;
mod protocol;
mod remote_object;
mod tags;

pub use agent::{Frontend, RuntimeAgent};
pub use classify::{classify, is_typed_array, ExoticKind};
pub use dispatch::{
    DispatchRequest, DispatchResponse, ResponseError, RuntimeDispatcher, SERVER_ERROR_CODE,
};
pub use error::{RuntimeError, RuntimeResult};
pub use object_table::{ObjectId, ObjectReferenceTable};
pub use protocol::{
    CallFunctionOnParams, CallFunctionOnReturns, ExceptionDetails, GetHeapUsageReturns,
    GetPropertiesParams, GetPropertiesReturns, InternalPropertyDescriptor,
    PrivatePropertyDescriptor,
};
pub use remote_object::{describe, PropertyDescriptor, RemoteObject};
pub use tags::{InternalValueTagSet, InternalValueType};
