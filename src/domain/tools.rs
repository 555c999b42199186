//! Application Signals tools exposed via Model Context Protocol
//!
//! Provides `list_monitored_services` and `get_service_detail`. Every outcome of
//! a call, failures included, is delivered to the host as a single text block.

use std::future::Future;

use rust_mcp_sdk::{
    macros,
    schema::{CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::domain::operations;
use crate::domain::params::{ValidationError, DEFAULT_HOURS_BACK, DEFAULT_TOOL_MAX_RESULTS};
use crate::errors::ToolError;
use crate::mcp::rpc::{
    json_rpc_error, json_rpc_error_with_data, json_rpc_result, INVALID_PARAMS, METHOD_NOT_FOUND,
};
use crate::AppState;

pub const LIST_MONITORED_SERVICES: &str = "list_monitored_services";
pub const GET_SERVICE_DETAIL: &str = "get_service_detail";

#[macros::mcp_tool(
    name = "list_monitored_services",
    description = "List all services monitored by AWS Application Signals. Returns each service's name, type, key attributes (environment, resource type), additional attributes and number of configured metrics, plus the total count. Typically the first tool to use when starting an investigation."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct ListMonitoredServicesTool {
    /// Hours to look back from now (default 24)
    #[serde(default, alias = "hoursBack")]
    pub hours_back: Option<i64>,
    /// Maximum services to return, 1-500 (default 100)
    #[serde(default, alias = "maxResults")]
    pub max_results: Option<i64>,
}

#[macros::mcp_tool(
    name = "get_service_detail",
    description = "Get detailed information about one service monitored by AWS Application Signals: key attributes, additional attributes, metric references with their dimensions, and associated log groups. The service name is matched exactly and case-sensitively; use list_monitored_services to discover names."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetServiceDetailTool {
    /// Name of the service to get details for (case-sensitive)
    #[serde(alias = "serviceName")]
    pub service_name: String,
    /// Hours to look back from now, 1-168 (default 24)
    #[serde(default, alias = "hoursBack")]
    pub hours_back: Option<i64>,
}

pub fn build_tools_list() -> Vec<Tool> {
    vec![ListMonitoredServicesTool::tool(), GetServiceDetailTool::tool()]
}

pub fn tool_names() -> Vec<&'static str> {
    vec![LIST_MONITORED_SERVICES, GET_SERVICE_DETAIL]
}

pub async fn handle_tools_call(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, INVALID_PARAMS, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, INVALID_PARAMS, "Invalid params"),
    };
    let arguments = json!(tool_call.arguments.unwrap_or_default());

    let text = match tool_call.name.as_str() {
        LIST_MONITORED_SERVICES => {
            let outcome = match decode_arguments::<ListMonitoredServicesTool>(arguments) {
                Ok(args) => {
                    let api = state.appsignals.clone();
                    run_isolated(async move {
                        operations::list_monitored_services(
                            api.as_ref(),
                            args.hours_back.unwrap_or(DEFAULT_HOURS_BACK),
                            args.max_results.unwrap_or(DEFAULT_TOOL_MAX_RESULTS),
                        )
                        .await
                    })
                    .await
                }
                Err(err) => Err(err),
            };
            render_outcome(LIST_MONITORED_SERVICES, outcome)
        }
        GET_SERVICE_DETAIL => {
            let outcome = match decode_arguments::<GetServiceDetailTool>(arguments) {
                Ok(args) => {
                    let api = state.appsignals.clone();
                    run_isolated(async move {
                        operations::get_service_detail(
                            api.as_ref(),
                            args.service_name,
                            args.hours_back.unwrap_or(DEFAULT_HOURS_BACK),
                        )
                        .await
                    })
                    .await
                }
                Err(err) => Err(err),
            };
            render_outcome(GET_SERVICE_DETAIL, outcome)
        }
        _ => {
            return json_rpc_error_with_data(
                id,
                METHOD_NOT_FOUND,
                "Method not found",
                Some(json!({
                    "code": "tool_not_found",
                    "message": "unknown tool name",
                    "details": {
                        "name": tool_call.name,
                    },
                })),
            )
        }
    };

    json_rpc_result(id, text_result(text))
}

fn decode_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments)
        .map_err(|err| ToolError::from(ValidationError::single("arguments", err.to_string())))
}

/// Runs one invocation on its own task so a panic or cancellation inside it
/// comes back as an unclassified failure instead of unwinding into the server.
async fn run_isolated<F>(operation: F) -> Result<String, ToolError>
where
    F: Future<Output = Result<String, ToolError>> + Send + 'static,
{
    match tokio::spawn(operation).await {
        Ok(outcome) => outcome,
        Err(join_error) => Err(ToolError::unclassified(join_error.to_string())),
    }
}

pub fn render_outcome(tool: &str, outcome: Result<String, ToolError>) -> String {
    match outcome {
        Ok(text) => text,
        Err(err) => {
            match &err {
                ToolError::InvalidParameters(violations) => {
                    info!(tool, violations = %violations, "tool call rejected")
                }
                ToolError::Upstream { code, message } => {
                    warn!(tool, code = %code, message = %message, "upstream call failed")
                }
                ToolError::Unclassified(message) => {
                    error!(tool, error = %message, "tool call failed")
                }
            }
            err.to_string()
        }
    }
}

fn text_result(text: String) -> Value {
    serde_json::to_value(CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(text, None, None))],
        is_error: None,
        meta: None,
        structured_content: None,
    })
    .unwrap_or_else(|_| json!({ "content": [] }))
}
