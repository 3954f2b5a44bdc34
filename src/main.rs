use agent_control::{create_router, AppState, Config, RuntimeAgentFactory, SessionRegistry};
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};

/// Control plane for AI meeting-assistant sessions
#[derive(Debug, Parser)]
#[command(name = "agent-control", version)]
struct Cli {
    /// Path to a config file (TOML/YAML/JSON)
    #[arg(long)]
    config: Option<String>,

    /// Override the listen address, e.g. 0.0.0.0:8000
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(cli.config.as_deref())?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    if let Err(err) = cfg.secrets.validate() {
        warn!("{err}; /agent/start will fail until it is provided");
    }

    let addr = cli
        .listen
        .unwrap_or_else(|| format!("{}:{}", cfg.service.http.bind, cfg.service.http.port));

    let factory = Arc::new(RuntimeAgentFactory::new(cfg.agent.runtime_url.clone()));
    let registry = Arc::new(SessionRegistry::new(factory, cfg));
    let router = create_router(AppState::new(registry));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}
