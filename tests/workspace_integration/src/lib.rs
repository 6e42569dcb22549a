//! Workspace-level integration tests for the GenMedia MCP server.
//!
//! These tests verify:
//! - The server constructs and reports its capabilities
//! - Every tool's input schema is a well-formed object schema with the
//!   expected required fields
//! - Validation and defaulting behave consistently across all seven tools

pub mod input_validation;
pub mod output_format;
pub mod server_startup;
pub mod tool_schema;
