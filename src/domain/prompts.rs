//! Static help prompt describing the bridge

use rust_mcp_sdk::schema::{
    ContentBlock, GetPromptRequestParams, GetPromptResult, Prompt, PromptMessage, Role,
    TextContent,
};
use serde_json::{json, Value};

use crate::config::Config;
use crate::errors::AppError;
use crate::mcp::rpc::{app_error_to_json_rpc, json_rpc_error, json_rpc_result};
use crate::AppState;

pub const API_HELP_PROMPT: &str = "api-help";
const API_HELP_DESCRIPTION: &str = "Get help with using the API tools";

pub fn build_prompts_list() -> Vec<Prompt> {
    vec![Prompt {
        arguments: vec![],
        description: Some(API_HELP_DESCRIPTION.to_string()),
        icons: vec![],
        meta: None,
        name: API_HELP_PROMPT.to_string(),
        title: None,
    }]
}

pub fn api_help_text(config: &Config) -> String {
    format!(
        "This MCP server ({}) provides tools to interact with {}. Available tools: ping, api_get, api_post, api_patch, api_delete, api_request. Use the ping tool to check server health.",
        config.server_name, config.base_url
    )
}

pub fn handle_prompts_get(state: &AppState, id: Option<Value>, params: Option<Value>) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let prompt_get: GetPromptRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    if prompt_get.name != API_HELP_PROMPT {
        return app_error_to_json_rpc(
            id,
            AppError::bad_request("prompt_not_found", "unknown prompt name")
                .with_details(json!({ "name": prompt_get.name })),
        );
    }

    let result = GetPromptResult {
        description: Some(API_HELP_DESCRIPTION.to_string()),
        messages: vec![PromptMessage {
            content: ContentBlock::from(TextContent::new(
                api_help_text(&state.config),
                None,
                None,
            )),
            role: Role::User,
        }],
        meta: None,
    };

    json_rpc_result(
        id,
        serde_json::to_value(result).expect("prompt result serialization"),
    )
}
