//! callscope daemon — entry point for running a callscope node.

use anyhow::Context;
use clap::Parser;

use callscope_node::{init_logging, CallscopeNode, LogFormat, NodeConfig};

#[derive(Parser)]
#[command(name = "callscope-daemon", about = "Contract-call traffic tracker daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<String>,

    /// Port for the HTTP/WebSocket API.
    #[arg(long, env = "CALLSCOPE_API_PORT")]
    port: Option<u16>,

    /// Base URL of the external transaction-history provider.
    #[arg(long, env = "CALLSCOPE_SCAN_URL")]
    scan_url: Option<String>,

    /// API key for the external provider.
    #[arg(long, env = "CALLSCOPE_SCAN_API_KEY")]
    scan_api_key: Option<String>,

    /// Enable the Prometheus metrics endpoint.
    #[arg(long, env = "CALLSCOPE_ENABLE_METRICS")]
    metrics: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "CALLSCOPE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "CALLSCOPE_LOG_FORMAT")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => NodeConfig::from_toml_file(path)
            .with_context(|| format!("loading config file {path}"))?,
        None => NodeConfig::default(),
    };

    if let Some(port) = cli.port {
        config.api_port = port;
    }
    if let Some(url) = cli.scan_url {
        config.scan_base_url = url;
    }
    if let Some(key) = cli.scan_api_key {
        config.scan_api_key = key;
    }
    if cli.metrics {
        config.enable_metrics = true;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    init_logging(LogFormat::from_config(&config.log_format), &config.log_level);

    tracing::info!(
        port = config.api_port,
        provider = %config.scan_base_url,
        metrics = config.enable_metrics,
        "starting callscope node"
    );
    if let Some(path) = cli.config.as_deref() {
        tracing::info!("configuration loaded from {path}");
    }

    let node = CallscopeNode::new(config);
    node.start().await?;

    tracing::info!("callscope daemon exited cleanly");
    Ok(())
}
