//! Upstream Application Signals collaborator
//!
//! `ApplicationSignalsApi` is the request/response contract the tools depend on.
//! Responses are returned in the upstream wire format (PascalCase JSON); the
//! domain models own the translation into typed records.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_applicationsignals::{
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::{get_service::GetServiceOutput, list_services::ListServicesOutput},
    primitives::DateTime as AwsDateTime,
    types::MetricReference,
    Client,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::{
    domain::{models::GetServiceRequest, params::ListServicesParams},
    errors::ToolError,
};

#[async_trait]
pub trait ApplicationSignalsApi: Send + Sync {
    async fn list_services(&self, params: &ListServicesParams) -> Result<Value, ToolError>;

    async fn get_service(&self, request: &GetServiceRequest) -> Result<Value, ToolError>;
}

/// Application Signals backed by the AWS SDK. Region and credentials come
/// from the ambient AWS configuration chain.
#[derive(Debug, Clone)]
pub struct AwsApplicationSignalsClient {
    client: Client,
}

impl AwsApplicationSignalsClient {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    pub async fn from_env() -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(&config)
    }
}

#[async_trait]
impl ApplicationSignalsApi for AwsApplicationSignalsClient {
    async fn list_services(&self, params: &ListServicesParams) -> Result<Value, ToolError> {
        let max_results = i32::try_from(params.max_results).map_err(|_| {
            ToolError::unclassified(format!("max_results {} out of range", params.max_results))
        })?;

        debug!(
            start_time = %params.start_time,
            end_time = %params.end_time,
            max_results,
            "calling ListServices"
        );

        let output = self
            .client
            .list_services()
            .start_time(to_aws_time(params.start_time))
            .end_time(to_aws_time(params.end_time))
            .max_results(max_results)
            .set_next_token(params.next_token.clone())
            .include_linked_accounts(params.include_linked_accounts)
            .set_aws_account_id(params.aws_account_id.clone())
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(list_services_to_wire(&output))
    }

    async fn get_service(&self, request: &GetServiceRequest) -> Result<Value, ToolError> {
        debug!(
            start_time = %request.start_time,
            end_time = %request.end_time,
            key_attributes = ?request.key_attributes,
            "calling GetService"
        );

        let key_attributes: HashMap<String, String> = request
            .key_attributes
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let output = self
            .client
            .get_service()
            .start_time(to_aws_time(request.start_time))
            .end_time(to_aws_time(request.end_time))
            .set_key_attributes(Some(key_attributes))
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(get_service_to_wire(&output))
    }
}

/// Service errors carry an upstream code and message; every other SDK
/// failure (dispatch, timeout, response parsing) is unclassified.
pub fn classify_sdk_error<E, R>(err: SdkError<E, R>) -> ToolError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.as_service_error() {
        Some(service_error) => ToolError::upstream(
            service_error.code().unwrap_or("Unknown"),
            service_error.message().unwrap_or("Unknown error"),
        ),
        None => ToolError::unclassified(DisplayErrorContext(&err).to_string()),
    }
}

fn to_aws_time(time: DateTime<Utc>) -> AwsDateTime {
    AwsDateTime::from_millis(time.timestamp_millis())
}

fn wire_time(time: &AwsDateTime) -> Value {
    DateTime::<Utc>::from_timestamp(time.secs(), time.subsec_nanos())
        .map(|time| Value::String(time.to_rfc3339_opts(SecondsFormat::Millis, true)))
        .unwrap_or(Value::Null)
}

fn wire_string_map(map: &HashMap<String, String>) -> Value {
    let sorted: BTreeMap<&String, &String> = map.iter().collect();
    json!(sorted)
}

fn wire_string_maps(maps: &[HashMap<String, String>]) -> Value {
    Value::Array(maps.iter().map(wire_string_map).collect())
}

fn wire_metric_reference(reference: &MetricReference) -> Value {
    let mut object = Map::new();
    object.insert("Namespace".to_string(), json!(reference.namespace()));
    object.insert("MetricType".to_string(), json!(reference.metric_type()));
    object.insert("MetricName".to_string(), json!(reference.metric_name()));
    if !reference.dimensions().is_empty() {
        let dimensions = reference
            .dimensions()
            .iter()
            .map(|dimension| json!({"Name": dimension.name(), "Value": dimension.value()}))
            .collect();
        object.insert("Dimensions".to_string(), Value::Array(dimensions));
    }
    if let Some(account_id) = reference.account_id() {
        object.insert("AccountId".to_string(), json!(account_id));
    }
    Value::Object(object)
}

fn wire_service_body(
    key_attributes: &HashMap<String, String>,
    attribute_maps: &[HashMap<String, String>],
    metric_references: &[MetricReference],
) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert("KeyAttributes".to_string(), wire_string_map(key_attributes));
    if !attribute_maps.is_empty() {
        object.insert("AttributeMaps".to_string(), wire_string_maps(attribute_maps));
    }
    object.insert(
        "MetricReferences".to_string(),
        Value::Array(metric_references.iter().map(wire_metric_reference).collect()),
    );
    object
}

pub fn list_services_to_wire(output: &ListServicesOutput) -> Value {
    let summaries = output
        .service_summaries()
        .iter()
        .map(|summary| {
            Value::Object(wire_service_body(
                summary.key_attributes(),
                summary.attribute_maps(),
                summary.metric_references(),
            ))
        })
        .collect();

    let mut object = Map::new();
    object.insert("StartTime".to_string(), wire_time(output.start_time()));
    object.insert("EndTime".to_string(), wire_time(output.end_time()));
    object.insert("ServiceSummaries".to_string(), Value::Array(summaries));
    if let Some(next_token) = output.next_token() {
        object.insert("NextToken".to_string(), json!(next_token));
    }
    Value::Object(object)
}

pub fn get_service_to_wire(output: &GetServiceOutput) -> Value {
    let mut object = Map::new();
    if let Some(service) = output.service() {
        let mut body = wire_service_body(
            service.key_attributes(),
            service.attribute_maps(),
            service.metric_references(),
        );
        if !service.log_group_references().is_empty() {
            body.insert(
                "LogGroupReferences".to_string(),
                wire_string_maps(service.log_group_references()),
            );
        }
        object.insert("Service".to_string(), Value::Object(body));
    }
    object.insert("StartTime".to_string(), wire_time(output.start_time()));
    object.insert("EndTime".to_string(), wire_time(output.end_time()));
    if !output.log_group_references().is_empty() {
        object.insert(
            "LogGroupReferences".to_string(),
            wire_string_maps(output.log_group_references()),
        );
    }
    Value::Object(object)
}
