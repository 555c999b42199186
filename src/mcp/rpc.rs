//! JSON-RPC 2.0 envelopes built on the MCP schema types

use rust_mcp_sdk::schema::{
    JsonrpcErrorResponse, JsonrpcResultResponse, RequestId, Result as McpResult, RpcError,
};
use serde_json::{json, Value};

use crate::errors::AppError;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

pub fn is_json_rpc_error(value: &Value) -> bool {
    value.get("error").is_some()
}

/// Negotiation failures reach the client as invalid params, with the
/// machine-readable code in `error.data`.
pub fn app_error_to_json_rpc(id: Option<Value>, err: AppError) -> Value {
    json_rpc_error_with_data(
        id,
        INVALID_PARAMS,
        "Invalid params",
        Some(json!({
            "code": err.code(),
            "message": err.message(),
            "details": {}
        })),
    )
}

pub fn json_rpc_error(id: Option<Value>, code: i32, message: &str) -> Value {
    json_rpc_error_with_data(id, code, message, None)
}

pub fn json_rpc_error_with_data(
    id: Option<Value>,
    code: i32,
    message: &str,
    data: Option<Value>,
) -> Value {
    let response = JsonrpcErrorResponse::new(
        RpcError {
            code: i64::from(code),
            data: data.clone(),
            message: message.to_string(),
        },
        id.as_ref().and_then(value_to_request_id),
    );

    serde_json::to_value(response).unwrap_or_else(|_| {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message, "data": data }
        })
    })
}

/// Wraps `result` in a response envelope. Ids the MCP schema cannot express
/// (null, fractional numbers) are echoed back verbatim.
pub fn json_rpc_result(id: Option<Value>, result: Value) -> Value {
    let Some(request_id) = id.as_ref().and_then(value_to_request_id) else {
        return raw_result(id, result);
    };

    let response = JsonrpcResultResponse::new(
        request_id,
        McpResult {
            meta: None,
            extra: result.as_object().cloned(),
        },
    );
    serde_json::to_value(response).unwrap_or_else(|_| raw_result(id, result))
}

fn raw_result(id: Option<Value>, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

pub fn value_to_request_id(value: &Value) -> Option<RequestId> {
    match value {
        Value::String(id) => Some(RequestId::String(id.clone())),
        Value::Number(number) => number.as_i64().map(RequestId::Integer),
        _ => None,
    }
}

pub fn request_id_to_value(id: RequestId) -> Value {
    match id {
        RequestId::String(value) => Value::String(value),
        RequestId::Integer(value) => Value::Number(value.into()),
    }
}
