mod api;
mod app;
mod cli;
mod config;
mod event;
mod listing;
mod logging;
mod query;
mod report;
mod store;
mod ui;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing::info;

use crate::api::{ItemsApi, ReqwestBackend, Transport};
use crate::store::ItemStore;
use crate::ui::views::GroceryListView;

#[derive(Parser, Debug)]
#[command(name = "grocer")]
#[command(about = "A terminal grocery list backed by a REST API")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/grocer/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// API server URL, overrides the config file and GROCER_API_URL
  #[arg(short, long)]
  url: Option<String>,

  #[command(subcommand)]
  command: Option<cli::Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration, then apply overrides
  let config = config::Config::load(args.config.as_deref())?
    .with_url_override(config::Config::env_url(), args.url);

  let _log_guard = logging::init(&config.log_level)?;

  let base_url = config.api.base_url()?;
  let backend = ReqwestBackend::new(config.api.timeout())
    .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;
  let api = ItemsApi::new(Transport::new(backend, base_url), &config.api.endpoint);
  let store = ItemStore::new(api);

  match args.command {
    Some(command) => cli::run(command, store).await,
    None => {
      info!(url = %config.api.url, endpoint = %config.api.endpoint, "starting grocer");
      let view = GroceryListView::new(store);
      let mut app = app::App::new(config.title(), Box::new(view));
      app.run().await
    }
  }
}
