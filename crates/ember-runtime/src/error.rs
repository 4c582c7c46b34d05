use thiserror::Error;

use crate::object_table::ObjectId;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("unknown object id {0}")]
    UnknownObjectId(ObjectId),
    #[error("object id {0} does not refer to an object")]
    NotAnObject(ObjectId),
    #[error("heap: {0}")]
    Heap(#[from] ember_heap::HeapError),
    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("wrong params: {0}")]
    InvalidParams(String),
    #[error("unknown method: {0}")]
    UnknownMethod(String),
}
