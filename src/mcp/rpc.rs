//! JSON-RPC protocol representations and formatting utilities
//!
//! Maps `AppError` onto JSON-RPC error payloads and wraps results in SDK envelopes.

use rust_mcp_sdk::schema::{
    JsonrpcErrorResponse, JsonrpcResultResponse, RequestId, Result as McpResult, RpcError,
};
use serde_json::{json, Value};

use crate::errors::AppError;

pub fn is_json_rpc_error(value: &Value) -> bool {
    value.get("error").is_some()
}

pub fn app_error_to_json_rpc(id: Option<Value>, err: AppError) -> Value {
    let (rpc_code, rpc_message) = match &err {
        AppError::BadRequest { .. } => (-32602, "Invalid params"),
        AppError::NotFound { .. } => (-32601, "Method not found"),
    };
    let (AppError::BadRequest {
        code,
        message,
        details,
    }
    | AppError::NotFound {
        code,
        message,
        details,
    }) = err;

    json_rpc_error_with_data(
        id,
        rpc_code,
        rpc_message,
        Some(json!({
            "code": code,
            "message": message,
            "details": details
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
            data,
            message: message.to_string(),
        },
        id.as_ref().and_then(value_to_request_id),
    );
    serde_json::to_value(response).expect("jsonrpc error response serialization")
}

pub fn json_rpc_result(id: Option<Value>, result: Value) -> Value {
    if let Some(request_id) = id.as_ref().and_then(value_to_request_id) {
        let extra = result.as_object().cloned();
        let response = JsonrpcResultResponse::new(request_id, McpResult { meta: None, extra });
        return serde_json::to_value(response).expect("jsonrpc result response serialization");
    }

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

pub fn value_to_request_id(value: &Value) -> Option<RequestId> {
    if let Some(string_id) = value.as_str() {
        return Some(RequestId::String(string_id.to_string()));
    }

    value.as_i64().map(RequestId::Integer)
}

pub fn request_id_to_value(id: RequestId) -> Value {
    match id {
        RequestId::String(value) => Value::String(value),
        RequestId::Integer(value) => Value::Number(value.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_keeps_string_ids() {
        let response = json_rpc_result(Some(json!("req-7")), json!({"tools": []}));

        assert_eq!(response["jsonrpc"], "2.0");
        assert_eq!(response["id"], "req-7");
        assert_eq!(response["result"]["tools"], json!([]));
    }

    #[test]
    fn bad_request_maps_to_invalid_params_with_code() {
        let response = app_error_to_json_rpc(
            Some(json!(3)),
            AppError::bad_request("invalid_protocol_version", "protocolVersion is required"),
        );

        assert!(is_json_rpc_error(&response));
        assert_eq!(response["error"]["code"], -32602);
        assert_eq!(
            response["error"]["data"]["code"],
            "invalid_protocol_version"
        );
        assert_eq!(response["error"]["data"]["details"], json!({}));
    }

    #[test]
    fn not_found_carries_details() {
        let response = app_error_to_json_rpc(
            Some(json!(4)),
            AppError::not_found("tool_not_found", "unknown tool name")
                .with_details(json!({"name": "tools.v1.nope"})),
        );

        assert_eq!(response["error"]["code"], -32601);
        assert_eq!(response["error"]["message"], "Method not found");
        assert_eq!(response["error"]["data"]["message"], "unknown tool name");
        assert_eq!(
            response["error"]["data"]["details"]["name"],
            "tools.v1.nope"
        );
    }
}
