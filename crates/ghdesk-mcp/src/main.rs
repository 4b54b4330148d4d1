// SPDX-License-Identifier: Apache-2.0

//! Binary entry point for the ghdesk MCP server.

use clap::Parser;

/// MCP server for GitHub issues, repositories and organizations.
#[derive(Debug, Parser)]
#[command(name = "ghdesk-mcp", version, about)]
struct Args {
    /// Serve over streamable HTTP at /mcp instead of stdio.
    #[arg(long)]
    http: bool,

    /// Host to bind in HTTP mode.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind in HTTP mode.
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    ghdesk_mcp::init_logging();

    if args.http {
        ghdesk_mcp::run_http(&args.host, args.port).await
    } else {
        ghdesk_mcp::run_stdio().await
    }
}
