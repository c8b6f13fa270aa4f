//! `driftline` binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! catalog, and either serves the JSON API, runs a one-shot rebuild, or
//! imports a batch of articles.
//!
//! ```text
//! driftline serve
//! driftline rebuild
//! driftline import articles.json
//! ```

mod config;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use driftline_api::{ApiState, api_router};
use driftline_core::{article::NewArticle, rebuild::RebuildCoordinator, store::CatalogStore};
use driftline_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "Driftline incident catalog")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the JSON API over HTTP (the default).
  Serve,
  /// Recompute all incidents and mappings, print the report as JSON.
  Rebuild,
  /// Insert every article from a JSON array file.
  Import {
    file: PathBuf,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = ServerConfig::load(&cli.config)?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let coordinator = RebuildCoordinator::from_config(&server_cfg.cluster)
    .context("invalid [cluster] configuration")?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(store, coordinator, &server_cfg).await,
    Command::Rebuild => rebuild(store, coordinator).await,
    Command::Import { file } => import(store, &file).await,
  }
}

async fn serve(
  store: SqliteStore,
  coordinator: RebuildCoordinator,
  server_cfg: &ServerConfig,
) -> anyhow::Result<()> {
  let state = ApiState::new(Arc::new(store), coordinator);
  let app = api_router(state).layer(TraceLayer::new_for_http());
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn rebuild(store: SqliteStore, coordinator: RebuildCoordinator) -> anyhow::Result<()> {
  let report = store.rebuild(coordinator).await.context("rebuild failed")?;
  println!("{}", serde_json::to_string_pretty(&report)?);
  Ok(())
}

async fn import(store: SqliteStore, file: &std::path::Path) -> anyhow::Result<()> {
  let raw = tokio::fs::read_to_string(file)
    .await
    .with_context(|| format!("failed to read {file:?}"))?;
  let inputs: Vec<NewArticle> =
    serde_json::from_str(&raw).with_context(|| format!("{file:?} is not a JSON array of articles"))?;

  let total = import_articles(&store, inputs).await?;
  tracing::info!(count = total, "import finished");
  println!("imported {total} articles");
  Ok(())
}

/// Insert `inputs` in order. Rows before a failing element stay inserted; the
/// error names the element and how many landed.
async fn import_articles<S: CatalogStore>(store: &S, inputs: Vec<NewArticle>) -> anyhow::Result<usize> {
  let total = inputs.len();
  for (index, input) in inputs.into_iter().enumerate() {
    let article = store.add_article(input).await.with_context(|| {
      format!("failed to insert article at index {index}; {index} of {total} were imported")
    })?;
    tracing::debug!(article_id = article.article_id, "imported");
  }
  Ok(total)
}
