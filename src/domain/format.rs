//! Text reports handed back to the tool host

use crate::domain::models::{
    AttributeMap, GetServiceResponse, KeyAttributes, ListServicesResponse, LogGroupReference,
    MetricReference, ServiceDetail, ServiceSummary,
};

pub const NO_SERVICES_MESSAGE: &str = "No services found in Application Signals.";
const UNKNOWN: &str = "Unknown";
const NEXT_TOKEN_PREVIEW_CHARS: usize = 20;

pub fn service_not_found_message(service_name: &str) -> String {
    format!("Service '{service_name}' not found in Application Signals.")
}

pub fn no_service_details_message(service_name: &str) -> String {
    format!("No service details found for '{service_name}'.")
}

pub fn format_service_list(response: &ListServicesResponse) -> String {
    let summaries = response.summaries();
    if summaries.is_empty() {
        return NO_SERVICES_MESSAGE.to_string();
    }

    let mut report = format!("Application Signals Services ({} total):\n\n", summaries.len());
    for summary in summaries {
        push_summary(&mut report, summary);
        report.push('\n');
    }

    if let Some(next_token) = response.next_token.as_deref() {
        let preview: String = next_token.chars().take(NEXT_TOKEN_PREVIEW_CHARS).collect();
        report.push_str(&format!(
            "Note: More services available (NextToken: {preview} ...)\n"
        ));
    }

    report
}

fn push_summary(report: &mut String, summary: &ServiceSummary) {
    let Some(attributes) = summary.key_attributes.as_ref() else {
        report.push_str("Service: Unknown (no attributes)\n");
        return;
    };

    report.push_str(&format!(
        "Service: {}\n",
        attributes.name.as_deref().unwrap_or(UNKNOWN)
    ));
    report.push_str(&format!(
        "  Type: {}\n",
        attributes.service_type.as_deref().unwrap_or(UNKNOWN)
    ));
    if let Some(environment) = attributes.environment.as_deref() {
        report.push_str(&format!("  Environment: {environment}\n"));
    }
    if let Some(resource_type) = attributes.resource_type.as_deref() {
        report.push_str(&format!("  Resource Type: {resource_type}\n"));
    }

    if let Some(maps) = non_empty(&summary.attribute_maps) {
        report.push_str("  Additional Attributes:\n");
        push_attribute_pairs(report, maps, "    ");
    }

    if let Some(metrics) = non_empty(&summary.metric_references) {
        report.push_str(&format!("  Metrics: {} configured\n", metrics.len()));
    }
}

/// Full report for one service. Log groups fall back to the response-level
/// mirror when the service record carries none.
pub fn format_service_detail(service_name: &str, response: &GetServiceResponse) -> String {
    let Some(service) = response.service.as_ref() else {
        return no_service_details_message(service_name);
    };

    let log_groups = non_empty(&service.log_group_references)
        .or_else(|| non_empty(&response.log_group_references));

    let mut sections = vec![format!("Service Details: {service_name}\n")];
    if let Some(attributes) = service.key_attributes.as_ref() {
        sections.push(key_attributes_section(attributes));
    }
    sections.extend(detail_sections(service, log_groups));

    sections.join("\n")
}

fn detail_sections(service: &ServiceDetail, log_groups: Option<&[LogGroupReference]>) -> Vec<String> {
    let mut sections = Vec::new();

    if let Some(maps) = non_empty(&service.attribute_maps) {
        let mut section = String::from("Additional Attributes:\n");
        push_attribute_pairs(&mut section, maps, "  ");
        sections.push(section);
    }

    if let Some(metrics) = non_empty(&service.metric_references) {
        let mut section = format!("Metric References ({} total):\n", metrics.len());
        for metric in metrics {
            push_metric_reference(&mut section, metric);
        }
        sections.push(section);
    }

    if let Some(log_groups) = log_groups {
        let mut section = format!("Log Group References ({} total):\n", log_groups.len());
        for log_group in log_groups {
            section.push_str(&format!(
                "  • {}\n",
                log_group.identifier.as_deref().unwrap_or(UNKNOWN)
            ));
        }
        sections.push(section);
    }

    sections
}

fn key_attributes_section(attributes: &KeyAttributes) -> String {
    let mut section = String::from("Key Attributes:\n");
    let lines = [
        ("Name", &attributes.name),
        ("Type", &attributes.service_type),
        ("Environment", &attributes.environment),
        ("Resource Type", &attributes.resource_type),
        ("Identifier", &attributes.identifier),
    ];
    for (label, value) in lines {
        if let Some(value) = value.as_deref() {
            section.push_str(&format!("  {label}: {value}\n"));
        }
    }
    section
}

fn push_metric_reference(section: &mut String, metric: &MetricReference) {
    section.push_str(&format!(
        "  • {}/{}\n",
        metric.namespace.as_deref().unwrap_or(UNKNOWN),
        metric.metric_name.as_deref().unwrap_or(UNKNOWN)
    ));
    if let Some(metric_type) = metric.metric_type.as_deref() {
        section.push_str(&format!("    Type: {metric_type}\n"));
    }
    if let Some(dimensions) = non_empty(&metric.dimensions) {
        let joined = dimensions
            .iter()
            .map(|dimension| format!("{}={}", dimension.name, dimension.value))
            .collect::<Vec<_>>()
            .join(", ");
        section.push_str(&format!("    Dimensions: {joined}\n"));
    }
}

fn push_attribute_pairs(report: &mut String, maps: &[AttributeMap], indent: &str) {
    for (key, value) in maps.iter().flatten() {
        report.push_str(&format!("{indent}{key}: {value}\n"));
    }
}

fn non_empty<T>(items: &Option<Vec<T>>) -> Option<&[T]> {
    items.as_deref().filter(|items| !items.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn list(payload: serde_json::Value) -> String {
        format_service_list(&ListServicesResponse::from_wire(payload).expect("valid payload"))
    }

    fn detail(payload: serde_json::Value) -> String {
        format_service_detail(
            "checkout-service",
            &GetServiceResponse::from_wire(payload).expect("valid payload"),
        )
    }

    #[test]
    fn empty_list_is_sentinel() {
        assert_eq!(list(json!({"ServiceSummaries": []})), NO_SERVICES_MESSAGE);
        assert_eq!(list(json!({})), NO_SERVICES_MESSAGE);
    }

    #[test]
    fn renders_full_service_block() {
        let report = list(json!({
            "ServiceSummaries": [{
                "KeyAttributes": {
                    "Type": "Service",
                    "Name": "checkout-service",
                    "Environment": "production",
                    "ResourceType": "AWS::ECS::Service"
                },
                "AttributeMaps": [
                    {"Telemetry.SDK": "aws-otel-python", "AWS.Application": "ecommerce-app"},
                    {"Platform": "ECS"}
                ],
                "MetricReferences": [
                    {"Namespace": "AWS/ApplicationSignals", "MetricType": "Latency"},
                    {"Namespace": "AWS/ApplicationSignals", "MetricType": "Error"}
                ]
            }]
        }));

        assert_eq!(
            report,
            "Application Signals Services (1 total):\n\n\
             Service: checkout-service\n\
             \x20 Type: Service\n\
             \x20 Environment: production\n\
             \x20 Resource Type: AWS::ECS::Service\n\
             \x20 Additional Attributes:\n\
             \x20   AWS.Application: ecommerce-app\n\
             \x20   Telemetry.SDK: aws-otel-python\n\
             \x20   Platform: ECS\n\
             \x20 Metrics: 2 configured\n\
             \n"
        );
    }

    #[test]
    fn minimal_attributes_default_type_and_skip_optional_lines() {
        let report = list(json!({
            "ServiceSummaries": [{"KeyAttributes": {"Name": "minimal-service"}}]
        }));

        assert!(report.contains("Service: minimal-service"));
        assert!(report.contains("Type: Unknown"));
        assert!(!report.contains("Environment:"));
        assert!(!report.contains("Resource Type:"));
        assert!(!report.contains("null"));
    }

    #[test]
    fn summary_without_key_attributes_is_marked() {
        let report = list(json!({
            "ServiceSummaries": [{"AttributeMaps": [{"some": "data"}]}]
        }));

        assert!(report.contains("Service: Unknown (no attributes)\n"));
        assert!(!report.contains("some: data"));
    }

    #[test]
    fn separates_multiple_services_with_blank_lines() {
        let report = list(json!({
            "ServiceSummaries": [
                {"KeyAttributes": {"Type": "Service", "Name": "checkout-service", "Environment": "production"}},
                {"KeyAttributes": {"Type": "Service", "Name": "payment-api", "Environment": "staging"}}
            ]
        }));

        assert!(report.starts_with("Application Signals Services (2 total):\n\n"));
        assert!(report.contains("Environment: production\n\nService: payment-api\n"));
        assert!(report.contains("Environment: staging"));
    }

    #[test]
    fn truncates_next_token_to_twenty_chars() {
        let report = list(json!({
            "ServiceSummaries": [{"KeyAttributes": {"Name": "service1", "Type": "Service"}}],
            "NextToken": "abcdefghijklmnopqrstuvwxyz123456"
        }));

        assert!(report
            .ends_with("Note: More services available (NextToken: abcdefghijklmnopqrst ...)\n"));
        assert!(!report.contains("abcdefghijklmnopqrstu"));
    }

    #[test]
    fn renders_detail_report() {
        let report = detail(json!({
            "Service": {
                "KeyAttributes": {
                    "Type": "Service",
                    "Name": "checkout-service",
                    "Environment": "production",
                    "ResourceType": "AWS::ECS::Service",
                    "Identifier": "checkout-arn"
                },
                "AttributeMaps": [{"Platform": "ECS"}],
                "MetricReferences": [
                    {
                        "Namespace": "AWS/ApplicationSignals",
                        "MetricName": "Latency",
                        "MetricType": "Latency",
                        "Dimensions": [
                            {"Name": "Service", "Value": "checkout-service"},
                            {"Name": "Environment", "Value": "production"}
                        ]
                    },
                    {"MetricType": "Error"}
                ],
                "LogGroupReferences": [
                    {"Type": "AWS::Resource", "Identifier": "/aws/ecs/checkout-service"}
                ]
            }
        }));

        assert_eq!(
            report,
            "Service Details: checkout-service\n\
             \n\
             Key Attributes:\n\
             \x20 Name: checkout-service\n\
             \x20 Type: Service\n\
             \x20 Environment: production\n\
             \x20 Resource Type: AWS::ECS::Service\n\
             \x20 Identifier: checkout-arn\n\
             \n\
             Additional Attributes:\n\
             \x20 Platform: ECS\n\
             \n\
             Metric References (2 total):\n\
             \x20 • AWS/ApplicationSignals/Latency\n\
             \x20   Type: Latency\n\
             \x20   Dimensions: Service=checkout-service, Environment=production\n\
             \x20 • Unknown/Unknown\n\
             \x20   Type: Error\n\
             \n\
             Log Group References (1 total):\n\
             \x20 • /aws/ecs/checkout-service\n"
        );
    }

    #[test]
    fn omits_empty_detail_sections() {
        let report = detail(json!({
            "Service": {
                "KeyAttributes": {"Name": "checkout-service"},
                "MetricReferences": [],
                "LogGroupReferences": []
            }
        }));

        assert!(report.contains("  Name: checkout-service\n"));
        assert!(!report.contains("Type:"));
        assert!(!report.contains("Metric References"));
        assert!(!report.contains("Log Group References"));
        assert!(!report.contains("0 total"));
        assert!(!report.contains("Additional Attributes"));
    }

    #[test]
    fn falls_back_to_top_level_log_groups() {
        let report = detail(json!({
            "Service": {"KeyAttributes": {"Name": "checkout-service"}},
            "LogGroupReferences": [{"ResourceType": "AWS::Logs::LogGroup"}]
        }));

        assert!(report.contains("Log Group References (1 total):\n  • Unknown\n"));
    }

    #[test]
    fn missing_service_payload_has_dedicated_message() {
        assert_eq!(
            detail(json!({"StartTime": "2026-02-27T00:00:00Z"})),
            "No service details found for 'checkout-service'."
        );
    }
}
