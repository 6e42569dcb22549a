//! MCP transport configuration.
//!
//! The server speaks the MCP protocol over one of three transports:
//!
//! - **Stdio**: default mode for local subprocess communication
//! - **HTTP**: streamable HTTP transport for web-based clients
//! - **SSE**: Server-Sent Events, served by the same HTTP infrastructure
//!
//! The effective transport is resolved from the `TRANSPORT` environment
//! variable (see [`crate::config::Config`]) with the `--transport` CLI flag
//! taking precedence when given.

use clap::Args;
use std::fmt;
use std::str::FromStr;

/// Resolved transport for MCP server communication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// Standard input/output transport (default).
    /// Communicates through stdin/stdout, similar to LSP servers.
    #[default]
    Stdio,
    /// HTTP streamable transport on the given port.
    Http {
        /// Port to listen on
        port: u16,
    },
    /// Server-Sent Events transport on the given port.
    Sse {
        /// Port to listen on
        port: u16,
    },
}

impl Transport {
    /// Create a new stdio transport.
    pub fn stdio() -> Self {
        Transport::Stdio
    }

    /// Create a new HTTP transport on the specified port.
    pub fn http(port: u16) -> Self {
        Transport::Http { port }
    }

    /// Create a new SSE transport on the specified port.
    pub fn sse(port: u16) -> Self {
        Transport::Sse { port }
    }

    /// Get the port if this is a network transport.
    pub fn port(&self) -> Option<u16> {
        match self {
            Transport::Stdio => None,
            Transport::Http { port } | Transport::Sse { port } => Some(*port),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Stdio => write!(f, "stdio"),
            Transport::Http { port } => write!(f, "http (port {})", port),
            Transport::Sse { port } => write!(f, "sse (port {})", port),
        }
    }
}

/// Transport mode before a port is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    #[default]
    Stdio,
    Http,
    Sse,
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stdio" => Ok(TransportMode::Stdio),
            "http" => Ok(TransportMode::Http),
            "sse" => Ok(TransportMode::Sse),
            _ => Err(format!(
                "Invalid transport mode '{}'. Valid options: stdio, http, sse",
                s
            )),
        }
    }
}

impl TransportMode {
    /// Attach a port, producing a runnable transport.
    pub fn with_port(self, port: u16) -> Transport {
        match self {
            TransportMode::Stdio => Transport::Stdio,
            TransportMode::Http => Transport::Http { port },
            TransportMode::Sse => Transport::Sse { port },
        }
    }
}

/// Command-line arguments for transport selection.
///
/// Both flags are optional so that the environment-sourced configuration
/// applies when they are absent:
///
/// ```ignore
/// let args = Args::parse();
/// let transport = args.transport.resolve(&config);
/// ```
#[derive(Args, Debug, Clone, Default)]
pub struct TransportArgs {
    /// Transport mode: stdio, http, or sse (overrides TRANSPORT env var)
    #[arg(long, value_parser = TransportMode::from_str)]
    pub transport: Option<TransportMode>,

    /// Port for HTTP/SSE transport (overrides PORT env var)
    #[arg(long)]
    pub port: Option<u16>,
}

impl TransportArgs {
    /// Resolve the effective transport: CLI flags win over the configured
    /// values.
    pub fn resolve(&self, config: &crate::config::Config) -> Transport {
        let mode = self.transport.unwrap_or(config.transport);
        let port = self.port.unwrap_or(config.port);
        mode.with_port(port)
    }
}
