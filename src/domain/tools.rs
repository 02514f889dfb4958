//! Tool catalog and `tools/call` dispatch into the bridge core
//!
//! Arguments that do not fit a tool's schema are protocol errors (`Invalid params`);
//! everything past that point reports through the tool-result envelope.

use std::collections::{BTreeMap, HashMap};

use rust_mcp_sdk::schema::{CallToolRequestParams, Tool, ToolInputSchema};
use serde::{de::Error as _, Deserialize};
use serde_json::{json, Map, Value};

use crate::bridge::{
    self,
    translator::{BridgeTool, ToolInvocation},
};
use crate::errors::AppError;
use crate::mcp::rpc::{app_error_to_json_rpc, json_rpc_error, json_rpc_result};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ApiToolArguments {
    pub endpoint: String,
    pub method: Option<String>,
    pub body: Option<Value>,
    pub headers: Option<BTreeMap<String, String>>,
}

fn property(schema: Value) -> Map<String, Value> {
    match schema {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn endpoint_schema() -> Map<String, Value> {
    property(json!({
        "type": "string",
        "description": "API endpoint path (relative to API_BASE_URL)"
    }))
}

fn headers_schema() -> Map<String, Value> {
    property(json!({
        "type": "object",
        "additionalProperties": { "type": "string" },
        "description": "Additional headers to include"
    }))
}

fn body_schema(description: &str) -> Map<String, Value> {
    property(json!({ "description": description }))
}

fn tool_definition(tool: BridgeTool) -> Tool {
    let (description, properties, required) = match tool {
        BridgeTool::Ping => (
            "Health check tool that validates server is responding",
            vec![],
            vec![],
        ),
        BridgeTool::ApiGet => (
            "Make a GET request to the configured API",
            vec![("endpoint", endpoint_schema()), ("headers", headers_schema())],
            vec!["endpoint"],
        ),
        BridgeTool::ApiPost => (
            "Make a POST request to the configured API",
            vec![
                ("endpoint", endpoint_schema()),
                ("body", body_schema("Request body")),
                ("headers", headers_schema()),
            ],
            vec!["endpoint"],
        ),
        BridgeTool::ApiPatch => (
            "Make a PATCH request to the configured API",
            vec![
                ("endpoint", endpoint_schema()),
                ("body", body_schema("Request body")),
                ("headers", headers_schema()),
            ],
            vec!["endpoint"],
        ),
        BridgeTool::ApiDelete => (
            "Make a DELETE request to the configured API",
            vec![("endpoint", endpoint_schema()), ("headers", headers_schema())],
            vec!["endpoint"],
        ),
        BridgeTool::ApiRequest => (
            "Make a generic HTTP request to the configured API",
            vec![
                (
                    "method",
                    property(json!({
                        "type": "string",
                        "enum": ["GET", "POST", "PUT", "PATCH", "DELETE"],
                        "description": "HTTP method"
                    })),
                ),
                ("endpoint", endpoint_schema()),
                ("body", body_schema("Request body (for POST, PUT, PATCH)")),
                ("headers", headers_schema()),
            ],
            vec!["method", "endpoint"],
        ),
    };

    let properties = properties
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect::<HashMap<_, _>>();

    Tool {
        annotations: None,
        description: Some(description.to_string()),
        execution: None,
        icons: vec![],
        input_schema: ToolInputSchema::new(
            required.into_iter().map(str::to_string).collect(),
            Some(properties),
            None,
        ),
        meta: None,
        name: tool.name().to_string(),
        output_schema: None,
        title: None,
    }
}

pub fn build_tools_list() -> Vec<Tool> {
    BridgeTool::ALL.into_iter().map(tool_definition).collect()
}

pub fn build_invocation(
    tool: BridgeTool,
    arguments: Option<Map<String, Value>>,
) -> Result<ToolInvocation, serde_json::Error> {
    if tool == BridgeTool::Ping {
        return Ok(ToolInvocation::new(tool, ""));
    }

    let arguments: ApiToolArguments =
        serde_json::from_value(Value::Object(arguments.unwrap_or_default()))?;
    if tool == BridgeTool::ApiRequest && arguments.method.is_none() {
        return Err(serde_json::Error::missing_field("method"));
    }

    Ok(ToolInvocation {
        tool,
        endpoint: arguments.endpoint,
        method: arguments.method,
        body: arguments.body,
        headers: arguments.headers,
    })
}

pub async fn handle_tools_call(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    let Some(tool) = BridgeTool::from_name(&tool_call.name) else {
        return app_error_to_json_rpc(
            id,
            AppError::not_found("tool_not_found", "unknown tool name")
                .with_details(json!({ "name": tool_call.name })),
        );
    };

    let invocation = match build_invocation(tool, tool_call.arguments) {
        Ok(invocation) => invocation,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    let result = bridge::invoke(&state.config, state.executor.as_ref(), invocation).await;
    json_rpc_result(
        id,
        serde_json::to_value(result).expect("tool result serialization"),
    )
}
