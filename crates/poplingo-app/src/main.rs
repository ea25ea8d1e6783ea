use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod controller;
pub mod events;
pub mod profile;
pub mod state;
pub mod ui;


use self::controller::AppController;
use self::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "poplingo", about = "AI-assisted vocabulary notebook")]
struct Args {
    /// Settings file (defaults to settings.json in the config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the notebook is stored
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Native language code, e.g. `en`
    #[arg(long)]
    native: Option<String>,

    /// Language being learned, e.g. `es`
    #[arg(long)]
    target: Option<String>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout belongs to the terminal UI
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var("POPLINGO_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.with_ansi(atty::is(atty::Stream::Stderr)).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let args = Args::parse();

    let settings = profile::settings_path(args.config.as_deref());
    profile::init_user_config(&settings)?;
    let mut config = profile::load_config(&settings)?;

    if let Some(dir) = args.data_dir {
        config.storage.data_dir = dir;
    }
    if let Some(native) = args.native {
        config.languages.native = native;
    }
    if let Some(target) = args.target {
        config.languages.target = target;
    }

    if !config.gemini.has_api_key() {
        tracing::warn!("No Gemini API key configured, lookups will fail");
    }

    let state = AppState::init(config)
        .await
        .context("Failed to open the notebook")?;

    let controller = AppController::new(Arc::new(state));
    let mut tasks = controller.spawn_tasks();

    tokio::select! {
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Failed to listen for Ctrl+C: {e}");
            }
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("Task finished, shutting down"),
                Ok(Err(e)) => tracing::error!("Task failed: {e:#}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    tasks.shutdown().await;

    Ok(())
}
