//! MCP Gateway
//!
//! HTTP front door that exposes a host application's tools to MCP clients
//! over JSON-RPC, with session event streams and the legacy SSE bridge.

use clap::Parser;
use mgw_server::init::run;

/// Command line interface for the MCP gateway
#[derive(Parser, Debug)]
#[command(name = "mgw")]
#[command(about = "MCP Gateway - JSON-RPC and SSE front end for host application tools")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Address to bind, overriding `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overriding `server.port`
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli.config.as_deref(), cli.host.as_deref(), cli.port).await
}
