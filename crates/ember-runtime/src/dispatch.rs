//! Method routing for the Runtime domain.

use ember_heap::Heap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agent::RuntimeAgent;
use crate::protocol::{CallFunctionOnParams, GetPropertiesParams};
use crate::{RuntimeError, RuntimeResult};

/// Generic server error code used for every failed Runtime request.
pub const SERVER_ERROR_CODE: i32 = -32000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub id: u64,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl DispatchRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResponse {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

impl DispatchResponse {
    pub fn success(request: &DispatchRequest, result: Value) -> Self {
        Self {
            id: request.id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(request: &DispatchRequest, message: impl Into<String>) -> Self {
        Self {
            id: request.id,
            result: None,
            error: Some(ResponseError {
                code: SERVER_ERROR_CODE,
                message: message.into(),
            }),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

type Handler<H> = fn(&mut RuntimeAgent<H>, &Value) -> RuntimeResult<Value>;

/// Routes Runtime domain requests by method name to a [`RuntimeAgent`].
pub struct RuntimeDispatcher<H: Heap> {
    agent: RuntimeAgent<H>,
}

impl<H: Heap> RuntimeDispatcher<H> {
    pub fn new(agent: RuntimeAgent<H>) -> Self {
        Self { agent }
    }

    pub fn agent(&self) -> &RuntimeAgent<H> {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut RuntimeAgent<H> {
        &mut self.agent
    }

    pub fn into_agent(self) -> RuntimeAgent<H> {
        self.agent
    }

    pub fn dispatch(&mut self, request: &DispatchRequest) -> DispatchResponse {
        tracing::debug!(target: "ember.runtime", method = %request.method, id = request.id, "dispatch");

        let Some(handler) = Self::handler(&request.method) else {
            tracing::error!(target: "ember.runtime", method = %request.method, "unknown method");
            return DispatchResponse::error(
                request,
                RuntimeError::UnknownMethod(request.method.clone()).to_string(),
            );
        };

        match handler(&mut self.agent, &request.params) {
            Ok(result) => DispatchResponse::success(request, result),
            Err(RuntimeError::InvalidParams(reason)) => {
                tracing::debug!(target: "ember.runtime", method = %request.method, %reason, "rejected params");
                DispatchResponse::error(request, "wrong params")
            }
            Err(err) => DispatchResponse::error(request, err.to_string()),
        }
    }

    fn handler(method: &str) -> Option<Handler<H>> {
        let handler: Handler<H> = match method {
            "enable" => enable,
            "disable" => disable,
            "getProperties" => get_properties,
            "runIfWaitingForDebugger" => run_if_waiting_for_debugger,
            "callFunctionOn" => call_function_on,
            "getHeapUsage" => get_heap_usage,
            _ => return None,
        };
        Some(handler)
    }
}

fn enable<H: Heap>(agent: &mut RuntimeAgent<H>, _params: &Value) -> RuntimeResult<Value> {
    agent.enable();
    Ok(empty())
}

fn disable<H: Heap>(agent: &mut RuntimeAgent<H>, _params: &Value) -> RuntimeResult<Value> {
    agent.disable();
    Ok(empty())
}

fn get_properties<H: Heap>(agent: &mut RuntimeAgent<H>, params: &Value) -> RuntimeResult<Value> {
    let params: GetPropertiesParams = parse_params(params)?;
    to_value(agent.get_properties(&params)?)
}

fn run_if_waiting_for_debugger<H: Heap>(
    agent: &mut RuntimeAgent<H>,
    _params: &Value,
) -> RuntimeResult<Value> {
    agent.run_if_waiting_for_debugger();
    Ok(empty())
}

fn call_function_on<H: Heap>(agent: &mut RuntimeAgent<H>, params: &Value) -> RuntimeResult<Value> {
    let params: CallFunctionOnParams = parse_params(params)?;
    to_value(agent.call_function_on(&params)?)
}

fn get_heap_usage<H: Heap>(agent: &mut RuntimeAgent<H>, _params: &Value) -> RuntimeResult<Value> {
    to_value(agent.get_heap_usage())
}

fn empty() -> Value {
    Value::Object(serde_json::Map::new())
}

fn parse_params<T: DeserializeOwned>(params: &Value) -> RuntimeResult<T> {
    T::deserialize(params).map_err(|err| RuntimeError::InvalidParams(err.to_string()))
}

fn to_value(value: impl Serialize) -> RuntimeResult<Value> {
    Ok(serde_json::to_value(value)?)
}
