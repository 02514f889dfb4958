use std::{error::Error as StdError, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::bridge::translator::OutboundRequest;

/// Terminal result of one outbound call. HTTP error statuses are `Success`.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    Success {
        status: u16,
        status_text: String,
        data: Value,
    },
    TransportFailure {
        message: String,
    },
}

#[async_trait]
pub trait HttpExecutor: Send + Sync {
    async fn execute(&self, request: OutboundRequest, timeout: Duration) -> RequestOutcome;
}

#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: OutboundRequest) -> Result<RequestOutcome, reqwest::Error> {
        let mut builder = self
            .client
            .request(request.method.to_reqwest(), request.url.as_str())
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        Ok(RequestOutcome::Success {
            status: status.as_u16(),
            status_text: status_text(status),
            data: decode_body(text),
        })
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, request: OutboundRequest, timeout: Duration) -> RequestOutcome {
        // Dropping the in-flight future on deadline cancels the call; completion disarms the timer.
        match tokio::time::timeout(timeout, self.send(request)).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => RequestOutcome::TransportFailure {
                message: describe_error(&err.without_url()),
            },
            Err(_) => RequestOutcome::TransportFailure {
                message: format!(
                    "request aborted: no response within {}s",
                    timeout.as_secs()
                ),
            },
        }
    }
}

pub fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}

/// Parsed JSON when the body is JSON text, otherwise the raw text as a string value.
pub fn decode_body(text: String) -> Value {
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

fn describe_error(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::{
        body::Bytes,
        http::{HeaderMap as AxumHeaderMap, StatusCode as AxumStatusCode},
        routing::{any, get},
        Json, Router,
    };
    use reqwest::header::{HeaderMap, HeaderValue};
    use serde_json::json;

    use super::*;
    use crate::bridge::translator::HttpMethod;

    async fn spawn_downstream() -> SocketAddr {
        let app = Router::new()
            .route(
                "/users/1",
                get(|| async { Json(json!({"id": 1, "name": "Ada"})) }),
            )
            .route(
                "/missing",
                get(|| async { (AxumStatusCode::NOT_FOUND, Json(json!({"error": "not found"}))) }),
            )
            .route("/plain", get(|| async { "pong" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .route(
                "/echo",
                any(|headers: AxumHeaderMap, body: Bytes| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    Json(json!({
                        "authorization": auth,
                        "body": String::from_utf8_lossy(&body),
                    }))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind downstream");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("downstream server");
        });
        addr
    }

    fn request(method: HttpMethod, url: String) -> OutboundRequest {
        OutboundRequest {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn json_response_is_parsed() {
        let addr = spawn_downstream().await;
        let executor = ReqwestExecutor::new().expect("client");

        let outcome = executor
            .execute(
                request(HttpMethod::Get, format!("http://{addr}/users/1")),
                Duration::from_secs(5),
            )
            .await;

        assert_eq!(
            outcome,
            RequestOutcome::Success {
                status: 200,
                status_text: "OK".to_string(),
                data: json!({"id": 1, "name": "Ada"}),
            }
        );
    }

    #[tokio::test]
    async fn error_status_is_data_not_failure() {
        let addr = spawn_downstream().await;
        let executor = ReqwestExecutor::new().expect("client");

        let outcome = executor
            .execute(
                request(HttpMethod::Get, format!("http://{addr}/missing")),
                Duration::from_secs(5),
            )
            .await;

        assert_eq!(
            outcome,
            RequestOutcome::Success {
                status: 404,
                status_text: "Not Found".to_string(),
                data: json!({"error": "not found"}),
            }
        );
    }

    #[tokio::test]
    async fn non_json_body_is_kept_as_text() {
        let addr = spawn_downstream().await;
        let executor = ReqwestExecutor::new().expect("client");

        let outcome = executor
            .execute(
                request(HttpMethod::Get, format!("http://{addr}/plain")),
                Duration::from_secs(5),
            )
            .await;

        match outcome {
            RequestOutcome::Success { data, .. } => assert_eq!(data, json!("pong")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn headers_and_body_reach_the_wire() {
        let addr = spawn_downstream().await;
        let executor = ReqwestExecutor::new().expect("client");
        let mut outbound = request(HttpMethod::Post, format!("http://{addr}/echo"));
        outbound
            .headers
            .insert("authorization", HeaderValue::from_static("Bearer abc"));
        outbound.body = Some(r#"{"a":[1,2]}"#.to_string());

        let outcome = executor.execute(outbound, Duration::from_secs(5)).await;

        match outcome {
            RequestOutcome::Success { status, data, .. } => {
                assert_eq!(status, 200);
                assert_eq!(data["authorization"], "Bearer abc");
                assert_eq!(data["body"], r#"{"a":[1,2]}"#);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn deadline_cancels_slow_call() {
        let addr = spawn_downstream().await;
        let executor = ReqwestExecutor::new().expect("client");

        let outcome = executor
            .execute(
                request(HttpMethod::Get, format!("http://{addr}/slow")),
                Duration::from_millis(200),
            )
            .await;

        match outcome {
            RequestOutcome::TransportFailure { message } => {
                assert!(message.contains("aborted"), "{message}")
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_failure_is_transport_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        let executor = ReqwestExecutor::new().expect("client");

        let outcome = executor
            .execute(
                request(HttpMethod::Get, format!("http://{addr}/users/1")),
                Duration::from_secs(5),
            )
            .await;

        assert!(matches!(outcome, RequestOutcome::TransportFailure { .. }));
    }

    #[test]
    fn decode_body_keeps_json_strings_ambiguous() {
        assert_eq!(decode_body(r#""quoted""#.to_string()), json!("quoted"));
        assert_eq!(decode_body("quoted".to_string()), json!("quoted"));
        assert_eq!(decode_body(String::new()), json!(""));
    }
}
