//! Gemini GenMedia MCP Server binary.
//!
//! Loads configuration from the environment, then serves the generative
//! media tools over the selected transport.

use anyhow::Result;
use clap::Parser;
use gemini_mcp_common::{Config, McpServerBuilder, TransportArgs};
use gemini_mcp_genmedia::GenmediaServer;

const SERVICE_NAME: &str = "gemini-mcp-genmedia";

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = SERVICE_NAME)]
#[command(about = "MCP server for Google Gemini, Imagen, and Veo media generation")]
#[command(disable_version_flag = true)]
struct Args {
    /// Show version and build information, then exit
    #[arg(long, short = 'V')]
    version: bool,

    /// Transport configuration
    #[command(flatten)]
    transport: TransportArgs,
}

/// Print name, version, and build metadata. Build time and commit are baked
/// in by the release pipeline; local builds report them as unknown.
fn print_version() {
    println!("{} v{}", SERVICE_NAME, env!("CARGO_PKG_VERSION"));
    println!("A Model Context Protocol server for Google generative media APIs");
    println!("Built: {}", option_env!("BUILD_TIME").unwrap_or("unknown"));
    println!("Commit: {}", option_env!("GIT_COMMIT").unwrap_or("unknown"));
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        print_version();
        return Ok(());
    }

    gemini_mcp_common::tracing::init_tracing();

    // Missing credentials are fatal here, before any transport is opened.
    let config = Config::from_env()?;
    tracing::info!(
        location = %config.location,
        output_dir = %config.output_dir,
        "Configuration loaded"
    );

    let transport = args.transport.resolve(&config);
    let server = GenmediaServer::new(config);

    tracing::info!(service = SERVICE_NAME, transport = %transport, "Starting MCP server");

    McpServerBuilder::new(server)
        .with_transport(transport)
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
