use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use slack_bot_mcp::Config;
use slack_bot_mcp::mcp::server::McpServer;
use slack_bot_mcp::slack::SlackClient;

#[derive(Debug, Parser)]
#[command(name = "slack-bot-mcp", version, about = "MCP server exposing Slack bot tools over stdio")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "SLACK_MCP_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides RUST_LOG and LOG_LEVEL
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let config = Config::load(cli.config.as_deref())?;

    // Rejects non-bot tokens before any request is made
    let slack_client = Arc::new(SlackClient::new(&config)?);
    let mcp_server = McpServer::new(slack_client);
    info!("Slack bot MCP server ready");

    tokio::select! {
        result = mcp_server.run() => {
            if let Err(e) = result {
                error!("MCP server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down");
        }
    }

    Ok(())
}

fn level_directive(level: &str) -> &'static str {
    match level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "warn",
    }
}

fn init_logging(cli_level: Option<&str>) {
    use tracing_subscriber::EnvFilter;

    let filter = if let Some(level) = cli_level {
        EnvFilter::new(level_directive(level))
    } else if let Ok(rust_log) = std::env::var("RUST_LOG") {
        // RUST_LOG allows module-specific directives
        EnvFilter::try_new(rust_log).unwrap_or_else(|_| EnvFilter::new("warn"))
    } else if let Ok(log_level) = std::env::var("LOG_LEVEL") {
        EnvFilter::new(level_directive(&log_level))
    } else {
        EnvFilter::new("warn")
    };

    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .with_target(false)
        .init();
}
