//! Typed records for Application Signals payloads
//!
//! Every field declares its upstream (PascalCase) wire name explicitly, so the
//! same declaration drives parsing upstream responses and serializing requests.
//! Absent optional fields are skipped on output instead of written as `null`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ToolError;

/// Free-form attribute map attached to a service.
pub type AttributeMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAttributes {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(rename = "ResourceType", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Identifier", default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(rename = "Environment", default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

impl KeyAttributes {
    /// Wire-named map of the populated attributes, as the upstream expects it
    /// when the attributes are used as a lookup key.
    pub fn to_wire_map(&self) -> BTreeMap<String, String> {
        [
            ("Type", &self.service_type),
            ("ResourceType", &self.resource_type),
            ("Name", &self.name),
            ("Identifier", &self.identifier),
            ("Environment", &self.environment),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|value| (key.to_string(), value)))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDimension {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricReference {
    #[serde(rename = "Namespace", default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(rename = "MetricType", default, skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<String>,
    #[serde(rename = "Dimensions", default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<MetricDimension>>,
    #[serde(rename = "MetricName", default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,
    #[serde(rename = "AccountId", default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogGroupReference {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<String>,
    #[serde(rename = "ResourceType", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Log group name.
    #[serde(rename = "Identifier", default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSummary {
    #[serde(rename = "KeyAttributes", default, skip_serializing_if = "Option::is_none")]
    pub key_attributes: Option<KeyAttributes>,
    #[serde(rename = "AttributeMaps", default, skip_serializing_if = "Option::is_none")]
    pub attribute_maps: Option<Vec<AttributeMap>>,
    #[serde(rename = "MetricReferences", default, skip_serializing_if = "Option::is_none")]
    pub metric_references: Option<Vec<MetricReference>>,
}

impl ServiceSummary {
    pub fn name(&self) -> Option<&str> {
        self.key_attributes
            .as_ref()
            .and_then(|attributes| attributes.name.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDetail {
    #[serde(rename = "KeyAttributes", default, skip_serializing_if = "Option::is_none")]
    pub key_attributes: Option<KeyAttributes>,
    #[serde(rename = "AttributeMaps", default, skip_serializing_if = "Option::is_none")]
    pub attribute_maps: Option<Vec<AttributeMap>>,
    #[serde(rename = "MetricReferences", default, skip_serializing_if = "Option::is_none")]
    pub metric_references: Option<Vec<MetricReference>>,
    #[serde(rename = "LogGroupReferences", default, skip_serializing_if = "Option::is_none")]
    pub log_group_references: Option<Vec<LogGroupReference>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListServicesResponse {
    #[serde(rename = "StartTime", default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(rename = "EndTime", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "ServiceSummaries", default, skip_serializing_if = "Option::is_none")]
    pub service_summaries: Option<Vec<ServiceSummary>>,
    #[serde(rename = "NextToken", default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl ListServicesResponse {
    pub fn from_wire(payload: Value) -> Result<Self, ToolError> {
        parse_wire(payload, "ListServices")
    }

    pub fn summaries(&self) -> &[ServiceSummary] {
        self.service_summaries.as_deref().unwrap_or_default()
    }

    /// First summary whose `Name` key attribute equals `service_name` exactly.
    pub fn find_by_name(&self, service_name: &str) -> Option<&ServiceSummary> {
        self.summaries()
            .iter()
            .find(|summary| summary.name() == Some(service_name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetServiceResponse {
    #[serde(rename = "Service", default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceDetail>,
    #[serde(rename = "StartTime", default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(rename = "EndTime", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "LogGroupReferences", default, skip_serializing_if = "Option::is_none")]
    pub log_group_references: Option<Vec<LogGroupReference>>,
}

impl GetServiceResponse {
    pub fn from_wire(payload: Value) -> Result<Self, ToolError> {
        parse_wire(payload, "GetService")
    }
}

/// Lookup key and window for a single get-service call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetServiceRequest {
    #[serde(rename = "StartTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "EndTime")]
    pub end_time: DateTime<Utc>,
    #[serde(rename = "KeyAttributes")]
    pub key_attributes: BTreeMap<String, String>,
}

fn parse_wire<T: DeserializeOwned>(payload: Value, operation: &str) -> Result<T, ToolError> {
    serde_json::from_value(payload).map_err(|err| {
        ToolError::unclassified(format!("malformed {operation} response: {err}"))
    })
}
