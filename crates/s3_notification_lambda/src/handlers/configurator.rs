use thiserror::Error;
use tracing::{error, info, warn};

use crate::adapters::notification_store::NotificationStore;
use crate::adapters::response_signal::{ResponseSignal, SignalError};
use crate::runtime::contract::{
    InvocationContext, LifecycleEvent, PropertyError, RequestType, BUCKET_PROPERTY,
    LAMBDA_ARN_PROPERTY, PREFIX_PROPERTY,
};
use crate::runtime::notification::NotificationConfiguration;
use crate::runtime::response::{ResponseData, ResponseEnvelope};

const COMPONENT: &str = "notification_configurator";

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("RequestType is missing or not a string")]
    MissingRequestType,
    #[error(transparent)]
    Property(#[from] PropertyError),
    #[error("storage provider call failed: {0}")]
    Provider(String),
}

/// Applies the lifecycle event to the bucket and reports the outcome.
///
/// The signal is sent exactly once on every path. Property and provider
/// errors become a generic failure response; only a failure to deliver the
/// signal itself is returned as an error.
pub fn handle_lifecycle_event(
    event: &LifecycleEvent,
    context: &InvocationContext,
    store: &impl NotificationStore,
    signal: &impl ResponseSignal,
) -> Result<ResponseEnvelope, SignalError> {
    info!(
        component = COMPONENT,
        event = "request_received",
        request_type = event.request_type_label(),
        logical_resource_id = %event.logical_resource_id,
        request_id = %context.request_id,
    );

    let envelope = match apply_lifecycle_event(event, store) {
        Ok(envelope) => envelope,
        Err(handler_error) => {
            error!(
                component = COMPONENT,
                event = "request_failed",
                request_type = event.request_type_label(),
                error = %handler_error,
            );
            ResponseEnvelope::failure()
        }
    };

    signal.send(event, context, &envelope)?;
    info!(
        component = COMPONENT,
        event = "response_sent",
        status = ?envelope.status,
    );
    Ok(envelope)
}

fn apply_lifecycle_event(
    event: &LifecycleEvent,
    store: &impl NotificationStore,
) -> Result<ResponseEnvelope, HandlerError> {
    let properties = &event.resource_properties;
    let Some(request_type) = &event.request_type else {
        return Err(HandlerError::MissingRequestType);
    };
    match request_type {
        RequestType::Delete => {
            let bucket = properties.require(BUCKET_PROPERTY)?;
            properties.require(PREFIX_PROPERTY)?;
            put_configuration(store, bucket, &NotificationConfiguration::empty())?;
            info!(component = COMPONENT, event = "delete_completed", bucket);
            Ok(ResponseEnvelope::success(ResponseData::new()))
        }
        RequestType::Create | RequestType::Update => {
            let lambda_arn = properties.require(LAMBDA_ARN_PROPERTY)?;
            let bucket = properties.require(BUCKET_PROPERTY)?;
            let prefix = properties.require(PREFIX_PROPERTY)?;
            let configuration = NotificationConfiguration::invoke_on_create(lambda_arn, prefix);
            put_configuration(store, bucket, &configuration)?;
            info!(
                component = COMPONENT,
                event = "put_completed",
                bucket,
                prefix,
                lambda_arn,
            );
            Ok(ResponseEnvelope::bucket_configured(bucket))
        }
        RequestType::Other(value) => {
            warn!(
                component = COMPONENT,
                event = "request_type_ignored",
                request_type = %value,
            );
            Ok(ResponseEnvelope::success(ResponseData::new()))
        }
    }
}

fn put_configuration(
    store: &impl NotificationStore,
    bucket: &str,
    configuration: &NotificationConfiguration,
) -> Result<(), HandlerError> {
    store
        .put_notification_configuration(bucket, configuration)
        .map_err(HandlerError::Provider)
}
