use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const LAMBDA_ARN_PROPERTY: &str = "LambdaArn";
pub const BUCKET_PROPERTY: &str = "Bucket";
pub const PREFIX_PROPERTY: &str = "Prefix";

/// Stack operation carried by a custom-resource request.
///
/// Values CloudFormation may add later are kept as [`RequestType::Other`] so
/// the handler can still answer the callback instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestType {
    Create,
    Update,
    Delete,
    Other(String),
}

impl RequestType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for RequestType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Create" => Self::Create,
            "Update" => Self::Update,
            "Delete" => Self::Delete,
            _ => Self::Other(value),
        }
    }
}

impl From<RequestType> for String {
    fn from(value: RequestType) -> Self {
        match value {
            RequestType::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("ResourceProperties is missing or not a mapping")]
    NotAMapping,
    #[error("resource property '{0}' is missing")]
    Missing(&'static str),
    #[error("resource property '{0}' must be a string")]
    NotAString(&'static str),
}

/// Properties block of the request. `None` when the block is absent or is
/// not a JSON object; lookups then fail instead of the whole event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct ResourceProperties(Option<BTreeMap<String, Value>>);

impl ResourceProperties {
    pub fn require(&self, key: &'static str) -> Result<&str, PropertyError> {
        let values = self.0.as_ref().ok_or(PropertyError::NotAMapping)?;
        match values.get(key) {
            None | Some(Value::Null) => Err(PropertyError::Missing(key)),
            Some(Value::String(value)) => Ok(value),
            Some(_) => Err(PropertyError::NotAString(key)),
        }
    }
}

impl From<Value> for ResourceProperties {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(values) => Self(Some(values.into_iter().collect())),
            _ => Self(None),
        }
    }
}

impl From<ResourceProperties> for Value {
    fn from(properties: ResourceProperties) -> Self {
        match properties.0 {
            Some(values) => Value::Object(values.into_iter().collect()),
            None => Value::Null,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ResourceProperties {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(Some(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        ))
    }
}

/// CloudFormation custom-resource request as delivered to the function.
///
/// Only `ResponseURL` is required: every other malformed field still has to
/// produce a FAILED callback, so it is parsed leniently and checked by the
/// handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    #[serde(
        default,
        deserialize_with = "lenient_request_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_type: Option<RequestType>,
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub stack_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub request_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub logical_resource_id: String,
    #[serde(
        default,
        deserialize_with = "lenient_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: ResourceProperties,
}

impl LifecycleEvent {
    /// Request type for log records; `-` when absent or not a string.
    pub fn request_type_label(&self) -> &str {
        self.request_type
            .as_ref()
            .map(RequestType::as_str)
            .unwrap_or("-")
    }
}

fn lenient_request_type<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<RequestType>, D::Error> {
    Ok(lenient_optional_string(deserializer)?.map(RequestType::from))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_optional_string(deserializer)?.unwrap_or_default())
}

fn lenient_optional_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(Some(value)),
        _ => Ok(None),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub request_id: String,
    pub log_stream_name: String,
}
