//! Embeddable MCP server.
//!
//! Exposes application-defined tools to any MCP-aware client through the
//! `initialize`, `tools/list` and `tools/call` methods, using newline-delimited
//! JSON-RPC 2.0 over stdio.

pub mod config;
pub mod handlers;
pub mod logging;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub mod schema;
