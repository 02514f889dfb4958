use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {message}")]
    BadRequest {
        code: &'static str,
        message: &'static str,
        details: Value,
    },
    #[error("not found: {message}")]
    NotFound {
        code: &'static str,
        message: &'static str,
        details: Value,
    },
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: Value,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: &'static str) -> Self {
        Self::BadRequest {
            code,
            message,
            details: json!({}),
        }
    }

    pub fn not_found(code: &'static str, message: &'static str) -> Self {
        Self::NotFound {
            code,
            message,
            details: json!({}),
        }
    }

    /// Attaches the offending input so clients can tell which name or uri was rejected.
    pub fn with_details(mut self, value: Value) -> Self {
        match &mut self {
            Self::BadRequest { details, .. } | Self::NotFound { details, .. } => *details = value,
        }
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            Self::BadRequest {
                code,
                message,
                details,
            } => (StatusCode::BAD_REQUEST, code, message, details),
            Self::NotFound {
                code,
                message,
                details,
            } => (StatusCode::NOT_FOUND, code, message, details),
        };

        (
            status,
            Json(ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
                details,
            }),
        )
            .into_response()
    }
}
