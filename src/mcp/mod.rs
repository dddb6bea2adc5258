//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes the cut-list engine as MCP tools. The server talks JSON-RPC 2.0
//! over stdio, one message per line.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        MCP Server                        │
//! │                                                          │
//! │   ┌─────────────┐    ┌─────────────┐    ┌────────────┐   │
//! │   │  Transport  │───▶│   Server    │───▶│   Engine   │   │
//! │   │   (stdio)   │    │ (lifecycle) │    │ (cut-list) │   │
//! │   └─────────────┘    └─────────────┘    └────────────┘   │
//! │                             │                            │
//! │                             ▼                            │
//! │                      ┌─────────────┐                     │
//! │                      │ CSV export  │                     │
//! │                      └─────────────┘                     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod protocol;
pub mod server;
pub mod transport;

pub use protocol::{Request, Response, RpcError, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
pub use transport::StdioTransport;
