//! Maps request outcomes onto the MCP tool-result envelope.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_mcp_sdk::schema::{CallToolResult, ContentBlock, TextContent};
use serde::Serialize;
use serde_json::Value;

use crate::{bridge::executor::RequestOutcome, config::Config};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuccessPayload<'a> {
    status: u16,
    status_text: &'a str,
    data: &'a Value,
}

#[derive(Debug, Serialize)]
struct FailurePayload<'a> {
    error: &'a str,
    endpoint: &'a str,
    method: &'a str,
}

#[derive(Debug, Serialize)]
struct PingPayload<'a> {
    status: &'static str,
    timestamp: String,
    server: &'a str,
    version: &'a str,
}

pub fn format_outcome(outcome: &RequestOutcome, endpoint: &str, method: &str) -> CallToolResult {
    match outcome {
        RequestOutcome::Success {
            status,
            status_text,
            data,
        } => text_result(
            serde_json::to_string(&SuccessPayload {
                status: *status,
                status_text,
                data,
            })
            .expect("success payload serialization"),
            false,
        ),
        RequestOutcome::TransportFailure { message } => failure_result(message, endpoint, method),
    }
}

/// Shared by transport failures and validation failures; always flagged as an error.
pub fn failure_result(message: &str, endpoint: &str, method: &str) -> CallToolResult {
    text_result(
        serde_json::to_string(&FailurePayload {
            error: message,
            endpoint,
            method,
        })
        .expect("failure payload serialization"),
        true,
    )
}

pub fn ping_result(config: &Config, now: DateTime<Utc>) -> CallToolResult {
    text_result(
        serde_json::to_string(&PingPayload {
            status: "ok",
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            server: &config.server_name,
            version: &config.server_version,
        })
        .expect("ping payload serialization"),
        false,
    )
}

fn text_result(text: String, is_error: bool) -> CallToolResult {
    CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(text, None, None))],
        is_error: is_error.then_some(true),
        meta: None,
        structured_content: None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(result: &CallToolResult) -> Value {
        let value = serde_json::to_value(result).expect("result serialization");
        let text = value["content"][0]["text"]
            .as_str()
            .expect("text content")
            .to_string();
        serde_json::from_str(&text).expect("payload is json")
    }

    #[test]
    fn success_carries_status_and_data_without_error_flag() {
        let result = format_outcome(
            &RequestOutcome::Success {
                status: 404,
                status_text: "Not Found".to_string(),
                data: json!({"error": "not found"}),
            },
            "/users/9",
            "GET",
        );

        assert_eq!(result.is_error, None);
        assert_eq!(
            payload(&result),
            json!({"status": 404, "statusText": "Not Found", "data": {"error": "not found"}})
        );
    }

    #[test]
    fn success_payload_keeps_field_order() {
        let result = format_outcome(
            &RequestOutcome::Success {
                status: 200,
                status_text: "OK".to_string(),
                data: json!("raw"),
            },
            "/x",
            "GET",
        );

        let value = serde_json::to_value(&result).expect("result serialization");
        assert_eq!(
            value["content"][0]["text"],
            r#"{"status":200,"statusText":"OK","data":"raw"}"#
        );
    }

    #[test]
    fn transport_failure_sets_error_flag() {
        let result = format_outcome(
            &RequestOutcome::TransportFailure {
                message: "connection refused".to_string(),
            },
            "/users/1",
            "DELETE",
        );

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            payload(&result),
            json!({"error": "connection refused", "endpoint": "/users/1", "method": "DELETE"})
        );
    }

    #[test]
    fn ping_reports_server_identity() {
        let config = crate::test_support::config("https://api.example.com");
        let now = DateTime::parse_from_rfc3339("2026-01-02T03:04:05.678Z")
            .expect("timestamp")
            .with_timezone(&Utc);

        let result = ping_result(&config, now);

        assert_eq!(result.is_error, None);
        assert_eq!(
            payload(&result),
            json!({
                "status": "ok",
                "timestamp": "2026-01-02T03:04:05.678Z",
                "server": config.server_name,
                "version": config.server_version,
            })
        );
    }
}
