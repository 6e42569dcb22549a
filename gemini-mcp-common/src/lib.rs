//! Gemini MCP Common Library
//!
//! Shared utilities for configuration, error handling, model definitions,
//! artifact output, and server plumbing used by the GenMedia MCP server.

pub mod artifacts;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod tracing;
pub mod transport;

pub use artifacts::ArtifactWriter;
pub use config::Config;
pub use error::{ConfigError, Error, Result, ValidationError};
pub use server::{McpServerBuilder, ServerError, shutdown_channel};
pub use transport::{Transport, TransportArgs, TransportMode};
