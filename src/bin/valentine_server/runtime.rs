use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use valentine::logging::{self, LogFormat, LogLevel};

use super::*;

#[derive(Parser)]
#[command(name = "valentine-server")]
#[command(about = "Serve the valentine proposal pages", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Config file (JSON); defaults to $VALENTINE_CONFIG
    #[arg(long)]
    config: Option<PathBuf>,

    /// Public origin and path used in generated links (overrides the config)
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[arg(long, value_enum, default_value_t = LogFormat::Human)]
    log_format: LogFormat,
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_level, args.log_format);

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        config.public_base_url = base_url;
        config.validate().context("--base-url")?;
    }
    let settings = config.flow_settings()?;
    let state = Arc::new(AppState { config, settings });

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    tracing::info!(addr = %local_addr, "valentine-server listening");

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
