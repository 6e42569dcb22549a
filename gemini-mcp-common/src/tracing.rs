//! Tracing initialization for the GenMedia MCP server.
//!
//! Log filtering is controlled by the `RUST_LOG` environment variable
//! (default `info`), e.g. `RUST_LOG=gemini_mcp_genmedia=debug`.
//!
//! Log output goes to stderr: when serving on the stdio transport, stdout
//! carries the MCP protocol stream and must stay clean.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Initialize the tracing subscriber with environment-based filtering.
///
/// # Panics
///
/// Panics if called more than once; the global subscriber can only be set
/// once per process.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Try to initialize tracing, returning an error if already initialized.
///
/// Useful in tests where initialization may happen more than once.
pub fn try_init_tracing() -> Result<(), ()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|_| ())
}
