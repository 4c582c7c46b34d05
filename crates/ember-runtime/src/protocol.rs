//! Runtime domain parameter and return types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::object_table::ObjectId;
use crate::remote_object::{PropertyDescriptor, RemoteObject};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPropertiesParams {
    pub object_id: ObjectId,
    #[serde(default)]
    pub own_properties: bool,
    #[serde(default)]
    pub accessor_properties_only: bool,
    /// Accepted for compatibility; previews are never generated.
    #[serde(default)]
    pub generate_preview: bool,
}

impl GetPropertiesParams {
    pub fn new(object_id: ObjectId) -> Self {
        Self {
            object_id,
            own_properties: false,
            accessor_properties_only: false,
            generate_preview: false,
        }
    }

    pub fn own_properties(mut self, own_properties: bool) -> Self {
        self.own_properties = own_properties;
        self
    }

    pub fn accessor_properties_only(mut self, accessor_properties_only: bool) -> Self {
        self.accessor_properties_only = accessor_properties_only;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalPropertyDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<RemoteObject>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivatePropertyDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<RemoteObject>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    pub exception_id: u32,
    pub text: String,
    pub line_number: u32,
    pub column_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<RemoteObject>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPropertiesReturns {
    pub result: Vec<PropertyDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_properties: Option<Vec<InternalPropertyDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_properties: Option<Vec<PrivatePropertyDescriptor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_details: Option<ExceptionDetails>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFunctionOnParams {
    pub function_declaration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<Value>>,
    #[serde(default)]
    pub silent: bool,
    #[serde(default)]
    pub return_by_value: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFunctionOnReturns {
    pub result: RemoteObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_details: Option<ExceptionDetails>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetHeapUsageReturns {
    pub used_size: f64,
    pub total_size: f64,
}
