//! Axum handlers for the health listener

use axum::Json;
use serde::Serialize;

use crate::errors::AppError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

pub async fn not_found() -> AppError {
    AppError::not_found("not_found", "route not found")
}
