//! Tools, resources and prompts exposed over the MCP protocol
//!
//! Tools delegate to the bridge core; resources and prompts only read the resolved config.

pub mod prompts;
pub mod resources;
pub mod tools;
