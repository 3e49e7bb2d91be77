use serde::{Deserialize, Serialize};

pub const OBJECT_CREATED_EVENT: &str = "s3:ObjectCreated:*";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LambdaNotificationRule {
    pub lambda_arn: String,
    pub events: Vec<String>,
    pub key_prefix: String,
}

/// Complete notification state for a bucket.
///
/// Applying a configuration replaces whatever the bucket had before; rules
/// installed by other tools are not preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfiguration {
    pub lambda_rules: Vec<LambdaNotificationRule>,
}

impl NotificationConfiguration {
    pub fn empty() -> Self {
        Self::default()
    }

    /// One rule invoking `lambda_arn` for every object-created event whose
    /// key starts with `key_prefix`.
    pub fn invoke_on_create(
        lambda_arn: impl Into<String>,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            lambda_rules: vec![LambdaNotificationRule {
                lambda_arn: lambda_arn.into(),
                events: vec![OBJECT_CREATED_EVENT.to_string()],
                key_prefix: key_prefix.into(),
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lambda_rules.is_empty()
    }
}
