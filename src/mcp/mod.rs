//! Model Context Protocol server handling and JSON-RPC implementations
//!
//! The engine in `server` is transport independent; `stdio` is the adapter that feeds it
//! newline-delimited messages.

pub mod rpc;
pub mod server;
pub mod stdio;
