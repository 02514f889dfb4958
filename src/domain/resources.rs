//! Read-only configuration resource exposed via Model Context Protocol

use rust_mcp_sdk::schema::{
    ReadResourceContent, ReadResourceRequestParams, ReadResourceResult, Resource,
    TextResourceContents,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::errors::AppError;
use crate::mcp::rpc::{app_error_to_json_rpc, json_rpc_error, json_rpc_result};
use crate::AppState;

pub const CONFIG_RESOURCE_URI: &str = "config://settings";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigSnapshot<'a> {
    server: &'a str,
    version: &'a str,
    api_base_url: &'a str,
    timeout: u64,
}

pub fn build_resources_list() -> Vec<Resource> {
    vec![Resource {
        annotations: None,
        description: Some("Current server configuration and settings".to_string()),
        icons: vec![],
        meta: None,
        mime_type: Some("application/json".to_string()),
        name: "Server Configuration".to_string(),
        size: None,
        title: None,
        uri: CONFIG_RESOURCE_URI.to_string(),
    }]
}

pub fn config_snapshot_text(config: &Config) -> String {
    serde_json::to_string_pretty(&ConfigSnapshot {
        server: &config.server_name,
        version: &config.server_version,
        api_base_url: &config.base_url,
        timeout: config.timeout_seconds,
    })
    .expect("config snapshot serialization")
}

pub async fn handle_resources_read(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let resource_read: ReadResourceRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    match resource_read.uri.as_str() {
        CONFIG_RESOURCE_URI => {
            let result = serde_json::to_value(ReadResourceResult {
                contents: vec![ReadResourceContent::from(TextResourceContents {
                    meta: None,
                    mime_type: Some("application/json".to_string()),
                    text: config_snapshot_text(&state.config),
                    uri: CONFIG_RESOURCE_URI.to_string(),
                })],
                meta: None,
            })
            .expect("read config result serialization");

            json_rpc_result(id, result)
        }
        _ => app_error_to_json_rpc(
            id,
            AppError::not_found("resource_not_found", "unknown resource uri")
                .with_details(json!({ "uri": resource_read.uri })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_exposes_public_settings_only() {
        let config = crate::test_support::config("https://api.example.com");
        let snapshot: Value =
            serde_json::from_str(&config_snapshot_text(&config)).expect("snapshot json");

        assert_eq!(
            snapshot,
            json!({
                "server": config.server_name,
                "version": config.server_version,
                "apiBaseUrl": "https://api.example.com",
                "timeout": config.timeout_seconds,
            })
        );
        assert!(!config_snapshot_text(&config).contains(&config.api_key));
    }
}
