//! Request-bridging core
//!
//! invocation -> translator -> executor -> formatter -> tool result. The configuration is
//! resolved once and only ever read here.

pub mod executor;
pub mod formatter;
pub mod translator;

use chrono::Utc;
use rust_mcp_sdk::schema::CallToolResult;
use tracing::{info, warn};

use crate::config::Config;
use executor::{HttpExecutor, RequestOutcome};
use translator::{translate, BridgeTool, ToolInvocation};

pub async fn invoke(
    config: &Config,
    executor: &dyn HttpExecutor,
    invocation: ToolInvocation,
) -> CallToolResult {
    if invocation.tool == BridgeTool::Ping {
        return formatter::ping_result(config, Utc::now());
    }

    let method_label = invocation.method_label();
    let request = match translate(&invocation, config) {
        Ok(request) => request,
        Err(err) => {
            warn!(
                tool = invocation.tool.name(),
                endpoint = %invocation.endpoint,
                method = %method_label,
                error = %err,
                "tool invocation rejected"
            );
            return formatter::failure_result(
                &err.to_string(),
                &invocation.endpoint,
                &method_label,
            );
        }
    };

    let method = request.method;
    let outcome = executor.execute(request, config.timeout()).await;
    match &outcome {
        RequestOutcome::Success { status, .. } => info!(
            tool = invocation.tool.name(),
            endpoint = %invocation.endpoint,
            method = %method,
            status = *status,
            "outbound request completed"
        ),
        RequestOutcome::TransportFailure { message } => warn!(
            tool = invocation.tool.name(),
            endpoint = %invocation.endpoint,
            method = %method,
            error = %message,
            "outbound request failed"
        ),
    }

    formatter::format_outcome(&outcome, &invocation.endpoint, method.as_str())
}
