use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;
use tracing::info;

use frontdesk_server::{build_router, AppState};
use frontdesk_upstream::{BookingApi, BookingApiOptions};

#[derive(Debug, Parser)]
#[command(name = "frontdesk-server", version, about = "frontdesk webhook server")]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if verbose {
                eprintln!("error: {err:#}");
            } else {
                eprintln!("error: {err}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = frontdesk_config::load(cli.config).context("load config")?;

    // Fail at startup rather than booting into a permanently-500 state.
    let shared_secret = config.shared_secret.clone().with_context(|| {
        format!(
            "missing webhook shared secret: set {} or shared_secret in the config file",
            frontdesk_config::SHARED_SECRET_ENV
        )
    })?;
    let api_key = config.upstream.api_key.clone().with_context(|| {
        format!(
            "missing upstream api key: set {} or upstream.api_key in the config file",
            frontdesk_config::API_KEY_ENV
        )
    })?;

    let api = BookingApi::new(BookingApiOptions {
        base_url: config.upstream.base_url.clone(),
        api_key,
        api_version: config.upstream.api_version.clone(),
        page_size: config.upstream.page_size,
        max_pages: config.upstream.max_pages,
    })
    .context("build upstream client")?;

    let app = build_router(AppState {
        shared_secret,
        matching: config.matching,
        api,
    });

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("bind {}", cli.bind))?;
    info!(addr = %cli.bind, "frontdesk-server listening");
    axum::serve(listener, app).await.context("serve")?;
    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
