//! cabinet-cutlist-mcp: cut-list engine and MCP server for modular cabinets
//!
//! Describe a cabinet as a handful of global dimensions and a row of columns,
//! each holding drawers, doors, shelves, a hanging rod or a cube grid. The
//! engine decomposes it into every board to cut, the hardware to buy and a
//! cost estimate, and reports what cannot be built as diagnostics.
//!
//! # Modules
//!
//! - [`engine`]: layout model, component expanders, aggregation and pricing
//! - [`export`]: CSV cut sheets
//! - [`config`]: configuration loading and validation
//! - [`error`]: error types
//! - [`mcp`]: MCP protocol implementation

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod mcp;
