//! MCP method dispatch
//!
//! Decodes JSON-RPC messages, negotiates `initialize`, and routes `tools/*`
//! calls into the Application Signals tools. Every handled method leaves one
//! audit line with secret-looking arguments redacted.

use rust_mcp_sdk::schema::{
    CallToolRequest, Implementation, InitializeRequest, InitializeResult, JsonrpcMessage,
    JsonrpcRequest, ListToolsRequest, ListToolsResult, PingRequest, ProtocolVersion,
    ServerCapabilities, ServerCapabilitiesTools,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::domain::tools::{build_tools_list, handle_tools_call};
use crate::mcp::rpc::{
    app_error_to_json_rpc, is_json_rpc_error, json_rpc_error, json_rpc_result,
    request_id_to_value, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
};
use crate::{errors::AppError, AppState};

pub const SUPPORTED_PROTOCOL_VERSION: &str = "2024-11-05";

const SERVER_INSTRUCTIONS: &str = "Query AWS Application Signals. Start with \
list_monitored_services to discover service names, then call get_service_detail \
with an exact, case-sensitive name for metric references and log groups.";

const REDACTED: &str = "[REDACTED]";

/// Handles one decoded JSON value. Returns `None` for notifications.
pub async fn handle_json_rpc_value(state: &AppState, payload: Value) -> Option<Value> {
    if !payload.is_object() {
        return Some(json_rpc_error(None, INVALID_REQUEST, "Invalid Request"));
    }

    let raw_id = payload.get("id").cloned();
    let message: JsonrpcMessage = match serde_json::from_value(payload) {
        Ok(message) => message,
        Err(_) => return Some(json_rpc_error(raw_id, INVALID_REQUEST, "Invalid Request")),
    };

    match message {
        JsonrpcMessage::Request(request) => {
            let id = Some(request_id_to_value(request.id.clone()));
            if request.method.trim().is_empty() {
                return Some(json_rpc_error(id, INVALID_REQUEST, "Invalid Request"));
            }
            if !has_valid_shape(&request) {
                return Some(json_rpc_error(id, INVALID_PARAMS, "Invalid params"));
            }

            let params = request.params.map(Value::Object);
            Some(dispatch(state, id, &request.method, params).await)
        }
        JsonrpcMessage::Notification(notification) => {
            if !notification.method.trim().is_empty() {
                let params = notification.params.map(Value::Object);
                let _ = dispatch(state, None, &notification.method, params).await;
            }
            None
        }
        JsonrpcMessage::ResultResponse(_) | JsonrpcMessage::ErrorResponse(_) => {
            Some(json_rpc_error(raw_id, INVALID_REQUEST, "Invalid Request"))
        }
    }
}

/// Re-decodes requests for known methods into their typed MCP form.
fn has_valid_shape(request: &JsonrpcRequest) -> bool {
    let Ok(payload) = serde_json::to_value(request) else {
        return false;
    };

    match request.method.as_str() {
        "initialize" => serde_json::from_value::<InitializeRequest>(payload).is_ok(),
        "ping" => serde_json::from_value::<PingRequest>(payload).is_ok(),
        "tools/list" => serde_json::from_value::<ListToolsRequest>(payload).is_ok(),
        "tools/call" => serde_json::from_value::<CallToolRequest>(payload).is_ok(),
        _ => true,
    }
}

pub async fn dispatch(
    state: &AppState,
    id: Option<Value>,
    method: &str,
    params: Option<Value>,
) -> Value {
    let audit_params = redact_audit_params(params.as_ref());

    let response = match method {
        "initialize" => match negotiate_protocol_version(params.as_ref()) {
            Ok(version) => json_rpc_result(id, to_result_value(&initialize_result(version))),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        "ping" => json_rpc_result(id, json!({})),
        "tools/list" => json_rpc_result(
            id,
            to_result_value(&ListToolsResult {
                meta: None,
                next_cursor: None,
                tools: build_tools_list(),
            }),
        ),
        "tools/call" => handle_tools_call(state, id, params).await,
        _ => json_rpc_error(id, METHOD_NOT_FOUND, "Method not found"),
    };

    info!(
        method = %method,
        params = %audit_params,
        outcome = if is_json_rpc_error(&response) { "failure" } else { "success" },
        "mcp action audited"
    );

    response
}

fn initialize_result(protocol_version: ProtocolVersion) -> InitializeResult {
    InitializeResult {
        server_info: Implementation {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: Some("Application Signals MCP Server".to_string()),
            description: None,
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools {
                list_changed: Some(false),
            }),
            ..Default::default()
        },
        protocol_version: protocol_version.into(),
        instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        meta: None,
    }
}

fn to_result_value<T: Serialize>(result: &T) -> Value {
    serde_json::to_value(result).unwrap_or_else(|_| json!({}))
}

pub fn negotiate_protocol_version(params: Option<&Value>) -> Result<ProtocolVersion, AppError> {
    let offered = params
        .and_then(|params| params.get("protocolVersion"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|version| !version.is_empty())
        .ok_or_else(|| {
            AppError::bad_request(
                "invalid_protocol_version",
                "initialize params.protocolVersion is required",
            )
        })?;

    if offered == SUPPORTED_PROTOCOL_VERSION {
        Ok(ProtocolVersion::V2024_11_05)
    } else {
        Err(AppError::bad_request(
            "unsupported_protocol_version",
            "unsupported initialize protocolVersion",
        ))
    }
}

pub fn redact_audit_params(params: Option<&Value>) -> Value {
    params.map_or(Value::Null, redact_value)
}

fn redact_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    let item = if is_sensitive_key(key) {
                        Value::String(REDACTED.to_string())
                    } else {
                        redact_value(item)
                    };
                    (key.clone(), item)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_value).collect()),
        other => other.clone(),
    }
}

/// Covers `token`, `nextToken`, `api_key`, `aws_secret_access_key` and the like.
pub fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase();
    ["token", "secret", "password", "credential", "authorization", "api_key", "apikey"]
        .iter()
        .any(|marker| normalized.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_sensitive_fields_in_audit_params() {
        let params = json!({
            "name": "list_monitored_services",
            "arguments": {
                "hours_back": 24,
                "nextToken": "should-not-appear",
                "api_key": "should-not-appear",
                "nested": [{"aws_secret_access_key": "should-not-appear"}]
            }
        });

        let redacted = redact_audit_params(Some(&params));

        assert_eq!(redacted["name"], json!("list_monitored_services"));
        assert_eq!(redacted["arguments"]["hours_back"], json!(24));
        assert_eq!(redacted["arguments"]["nextToken"], json!(REDACTED));
        assert_eq!(redacted["arguments"]["api_key"], json!(REDACTED));
        assert_eq!(
            redacted["arguments"]["nested"][0]["aws_secret_access_key"],
            json!(REDACTED)
        );
        assert_eq!(redact_audit_params(None), Value::Null);
    }

    #[test]
    fn service_names_are_not_sensitive() {
        assert!(!is_sensitive_key("service_name"));
        assert!(!is_sensitive_key("max_results"));
        assert!(is_sensitive_key("Authorization"));
    }

    #[test]
    fn negotiate_protocol_version_accepts_supported_version() {
        let params = json!({ "protocolVersion": SUPPORTED_PROTOCOL_VERSION });

        let version = negotiate_protocol_version(Some(&params)).expect("supported version");
        assert_eq!(version, ProtocolVersion::V2024_11_05);
    }

    #[test]
    fn negotiate_protocol_version_rejects_unsupported_version() {
        let params = json!({ "protocolVersion": "2026-01-01" });

        let error =
            negotiate_protocol_version(Some(&params)).expect_err("unsupported version must fail");
        assert_eq!(error.code(), "unsupported_protocol_version");
    }

    #[test]
    fn negotiate_protocol_version_requires_version() {
        let error = negotiate_protocol_version(Some(&json!({}))).expect_err("missing version");
        assert_eq!(error.code(), "invalid_protocol_version");
    }
}
