use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::contract::{InvocationContext, LifecycleEvent, BUCKET_PROPERTY};

pub const FAILURE_DATA_KEY: &str = "Failure";
pub const FAILURE_MESSAGE: &str = "Something bad happened.";

pub type ResponseData = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

/// Outcome reported to CloudFormation for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: ResponseStatus,
    pub data: ResponseData,
}

impl ResponseEnvelope {
    pub fn success(data: ResponseData) -> Self {
        Self {
            status: ResponseStatus::Success,
            data,
        }
    }

    pub fn bucket_configured(bucket: &str) -> Self {
        Self::success(ResponseData::from([(
            BUCKET_PROPERTY.to_string(),
            bucket.to_string(),
        )]))
    }

    /// Generic failure; the cause stays in the function logs.
    pub fn failure() -> Self {
        Self {
            status: ResponseStatus::Failed,
            data: ResponseData::from([(
                FAILURE_DATA_KEY.to_string(),
                FAILURE_MESSAGE.to_string(),
            )]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallbackBody {
    pub status: ResponseStatus,
    pub reason: String,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub no_echo: bool,
    pub data: ResponseData,
}

pub fn build_callback_body(
    event: &LifecycleEvent,
    context: &InvocationContext,
    envelope: &ResponseEnvelope,
) -> CallbackBody {
    CallbackBody {
        status: envelope.status,
        reason: format!(
            "See the details in CloudWatch Log Stream: {}",
            context.log_stream_name
        ),
        physical_resource_id: physical_resource_id(event, context),
        stack_id: event.stack_id.clone(),
        request_id: event.request_id.clone(),
        logical_resource_id: event.logical_resource_id.clone(),
        no_echo: false,
        data: envelope.data.clone(),
    }
}

/// An id CloudFormation already knows is echoed back; a changed id on Update
/// would make it delete the "old" resource and clear the notifications.
fn physical_resource_id(event: &LifecycleEvent, context: &InvocationContext) -> String {
    event
        .physical_resource_id
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(context.log_stream_name.as_str())
        .to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn event(physical_resource_id: Option<&str>) -> LifecycleEvent {
        let mut value = json!({
            "RequestType": "Update",
            "ResponseURL": "https://example.invalid/callback",
            "StackId": "stack-1",
            "RequestId": "req-1",
            "LogicalResourceId": "UploadsNotification",
            "ResourceProperties": {"Bucket": "my-bucket"}
        });
        if let Some(id) = physical_resource_id {
            value["PhysicalResourceId"] = json!(id);
        }
        serde_json::from_value(value).expect("event should parse")
    }

    fn context() -> InvocationContext {
        InvocationContext {
            request_id: "lambda-req".to_string(),
            log_stream_name: "2026/10/18/[$LATEST]abc".to_string(),
        }
    }

    #[test]
    fn failure_status_serializes_as_failed() {
        let envelope = ResponseEnvelope::failure();
        let value = serde_json::to_value(&envelope).expect("serializes");

        assert_eq!(
            value,
            json!({"status": "FAILED", "data": {"Failure": "Something bad happened."}})
        );
    }

    #[test]
    fn callback_body_uses_cloudformation_field_names() {
        let body = build_callback_body(
            &event(None),
            &context(),
            &ResponseEnvelope::bucket_configured("my-bucket"),
        );
        let value = serde_json::to_value(&body).expect("serializes");

        assert_eq!(
            value,
            json!({
                "Status": "SUCCESS",
                "Reason": "See the details in CloudWatch Log Stream: 2026/10/18/[$LATEST]abc",
                "PhysicalResourceId": "2026/10/18/[$LATEST]abc",
                "StackId": "stack-1",
                "RequestId": "req-1",
                "LogicalResourceId": "UploadsNotification",
                "NoEcho": false,
                "Data": {"Bucket": "my-bucket"}
            })
        );
    }

    #[test]
    fn callback_body_reuses_existing_physical_resource_id() {
        let body = build_callback_body(
            &event(Some("existing-id")),
            &context(),
            &ResponseEnvelope::success(ResponseData::new()),
        );

        assert_eq!(body.physical_resource_id, "existing-id");
    }

    #[test]
    fn blank_physical_resource_id_falls_back_to_log_stream() {
        let body = build_callback_body(
            &event(Some("  ")),
            &context(),
            &ResponseEnvelope::failure(),
        );

        assert_eq!(body.physical_resource_id, "2026/10/18/[$LATEST]abc");
        assert_eq!(body.status, ResponseStatus::Failed);
    }
}
