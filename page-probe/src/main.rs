//! Page Probe server entry point.
//!
//! Wires configuration (defaults < environment < CLI flags), constructs the
//! browser probe, and serves the axum router.

use clap::Parser;
use page_probe::{build_router, AppContext};
use page_probe_lib::{load_env_config, BrowserProbe, ProbeConfig, ServerConfig};
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// CLI arguments for page-probe
#[derive(Parser, Debug)]
#[command(name = "page-probe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "HTTP service for load/smoke testing page rendering with headless-browser probes")]
pub struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Maximum tasks accepted per batch
    #[arg(long, value_name = "N")]
    pub max_tasks: Option<usize>,

    /// Maximum concurrency accepted per batch
    #[arg(long, value_name = "N")]
    pub max_concurrent: Option<usize>,

    /// Per-probe timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub probe_timeout: Option<u64>,

    /// Return real HTTP status codes (400/500) instead of always 200
    #[arg(long)]
    pub strict_status: bool,
}

/// Merge CLI flags over the environment-derived configuration.
fn resolve_config(args: &Args) -> ServerConfig {
    let mut config = ServerConfig::default().apply_env(&load_env_config());

    if let Some(ref bind) = args.bind {
        config = config.with_bind(bind.clone());
    }
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(max_tasks) = args.max_tasks {
        config = config.with_max_tasks(max_tasks);
    }
    if let Some(max_concurrent) = args.max_concurrent {
        config = config.with_max_concurrency(max_concurrent);
    }
    if let Some(secs) = args.probe_timeout {
        config = config.with_probe_timeout(Duration::from_secs(secs.max(1)));
    }
    if args.strict_status {
        config = config.with_strict_status(true);
    }

    config
}

#[tokio::main]
async fn main() {
    // .env values become process environment before anything reads it.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = resolve_config(&args);

    let probe_config = ProbeConfig::default()
        .with_probe_timeout(config.probe_timeout)
        .with_full_page(config.full_page);
    let probe = Arc::new(BrowserProbe::with_config(probe_config));

    let addr = config.listen_addr();
    let ctx = Arc::new(AppContext { config, probe });
    let router = build_router(ctx);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %addr, error = %e, "failed to bind listen address");
            process::exit(1);
        }
    };

    info!("page-probe listening on http://{}", addr);
    if let Err(e) = axum::serve(listener, router).await {
        error!(error = %e, "server error");
        process::exit(1);
    }
}
