use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use todoterm::api::HttpTodoApi;
use todoterm::app::{App, AppEvent};
use todoterm::config::Config;
use todoterm::ui;

/// Get the config directory path (~/.config/todoterm/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("todoterm"))
}

#[derive(Parser, Debug)]
#[command(name = "todoterm", about = "Terminal to-do list for a REST todos API")]
struct Args {
    /// API base URL (overrides config)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Owner id whose todos are shown (overrides config)
    #[arg(long, value_name = "N")]
    owner_id: Option<i64>,

    /// Config file (default: ~/.config/todoterm/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to this file (overrides config)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Install the tracing subscriber. The TUI owns the terminal, so logs go to
/// a file when one is configured and to stderr otherwise.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?;

    // CLI flags win over the config file
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(owner_id) = args.owner_id {
        config.owner_id = owner_id;
    }
    if args.log_file.is_some() {
        config.log_file = args.log_file;
    }

    init_tracing(config.log_file.as_deref())?;

    let api = HttpTodoApi::new(&config.base_url, config.owner_id, config.request_timeout())
        .with_context(|| format!("Invalid API base URL '{}'", config.base_url))?;
    tracing::info!(
        base_url = %config.base_url,
        owner_id = config.owner_id,
        "Starting todoterm"
    );

    let mut app = App::new(Arc::new(api), &config);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    app.load_todos(&event_tx);

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
