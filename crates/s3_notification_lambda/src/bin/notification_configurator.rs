use std::time::Duration;

use aws_sdk_s3::types::{
    Event, FilterRule, FilterRuleName, LambdaFunctionConfiguration,
    NotificationConfiguration as S3NotificationConfiguration, NotificationConfigurationFilter,
    S3KeyFilter,
};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use reqwest::header::CONTENT_TYPE;
use s3_notification_lambda::adapters::notification_store::NotificationStore;
use s3_notification_lambda::adapters::response_signal::{ResponseSignal, SignalError};
use s3_notification_lambda::config::RuntimeConfig;
use s3_notification_lambda::handlers::configurator::handle_lifecycle_event;
use s3_notification_lambda::logging::init_logging;
use s3_notification_lambda::runtime::contract::{InvocationContext, LifecycleEvent};
use s3_notification_lambda::runtime::notification::NotificationConfiguration;
use s3_notification_lambda::runtime::response::{build_callback_body, ResponseEnvelope};
use serde_json::Value;
use tracing::{error, info};

struct S3NotificationStore {
    s3_client: aws_sdk_s3::Client,
}

impl NotificationStore for S3NotificationStore {
    fn put_notification_configuration(
        &self,
        bucket: &str,
        configuration: &NotificationConfiguration,
    ) -> Result<(), String> {
        let bucket = bucket.to_string();
        let request_configuration = to_s3_configuration(configuration)?;
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_bucket_notification_configuration()
                    .bucket(bucket)
                    .notification_configuration(request_configuration)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| {
                        format!("failed to put bucket notification configuration: {error}")
                    })
            })
        })
    }
}

fn to_s3_configuration(
    configuration: &NotificationConfiguration,
) -> Result<S3NotificationConfiguration, String> {
    let mut lambda_configurations = Vec::with_capacity(configuration.lambda_rules.len());
    for rule in &configuration.lambda_rules {
        let filter = NotificationConfigurationFilter::builder()
            .key(
                S3KeyFilter::builder()
                    .filter_rules(
                        FilterRule::builder()
                            .name(FilterRuleName::Prefix)
                            .value(rule.key_prefix.clone())
                            .build(),
                    )
                    .build(),
            )
            .build();
        let lambda_configuration = LambdaFunctionConfiguration::builder()
            .lambda_function_arn(rule.lambda_arn.clone())
            .set_events(Some(
                rule.events
                    .iter()
                    .map(|event| Event::from(event.as_str()))
                    .collect(),
            ))
            .filter(filter)
            .build()
            .map_err(|error| format!("invalid lambda notification rule: {error}"))?;
        lambda_configurations.push(lambda_configuration);
    }

    Ok(S3NotificationConfiguration::builder()
        .set_lambda_function_configurations(
            (!lambda_configurations.is_empty()).then_some(lambda_configurations),
        )
        .build())
}

struct HttpResponseSignal {
    http_client: reqwest::Client,
}

impl ResponseSignal for HttpResponseSignal {
    fn send(
        &self,
        event: &LifecycleEvent,
        context: &InvocationContext,
        envelope: &ResponseEnvelope,
    ) -> Result<(), SignalError> {
        let body = serde_json::to_string(&build_callback_body(event, context, envelope))?;
        let response_url = event.response_url.clone();
        let client = self.http_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                // The pre-signed callback URL is signed without a content type.
                let response = client
                    .put(response_url)
                    .header(CONTENT_TYPE, "")
                    .body(body)
                    .send()
                    .await
                    .map_err(|error| SignalError::Transport(error.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(SignalError::Rejected {
                        status: status.as_u16(),
                    });
                }
                info!(
                    component = "response_signal",
                    event = "callback_delivered",
                    status = status.as_u16(),
                );
                Ok(())
            })
        })
    }
}

struct RuntimeDependencies {
    store: S3NotificationStore,
    signal: HttpResponseSignal,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<ResponseEnvelope, Error> {
    info!(
        component = "lambda",
        event = "event_received",
        payload = %event.payload,
    );

    let lifecycle_event: LifecycleEvent = serde_json::from_value(event.payload)
        .map_err(|error| Error::from(format!("invalid custom resource event: {error}")))?;
    let context = InvocationContext {
        request_id: event.context.request_id.clone(),
        log_stream_name: event.context.env_config.log_stream.clone(),
    };

    handle_lifecycle_event(&lifecycle_event, &context, &deps.store, &deps.signal).map_err(
        |signal_error| {
            error!(
                component = "lambda",
                event = "response_not_delivered",
                error = %signal_error,
            );
            Error::from(signal_error)
        },
    )
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client, Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|error| Error::from(format!("failed to build callback http client: {error}")))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = RuntimeConfig::from_env()?;
    init_logging(config.log_format);
    info!(component = "lambda", event = "function_loaded");

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        store: S3NotificationStore {
            s3_client: aws_sdk_s3::Client::new(&aws_config),
        },
        signal: HttpResponseSignal {
            http_client: build_http_client(config.response_timeout)?,
        },
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &deps))).await
}
