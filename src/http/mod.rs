//! HTTP health listener
//!
//! Runs beside the MCP transport and shares nothing with it beyond the resolved config.

pub mod handlers;
