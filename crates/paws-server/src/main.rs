//! paws-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, optionally seeds it from a catalog export, and
//! serves the discovery API over HTTP.
//!
//! # Seeding a standalone store
//!
//! ```
//! cargo run -p paws-server -- --import catalog.json
//! ```

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use paws_core::{candidate::Catalog, service::Discovery};
use paws_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "Paws discovery server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Insert or replace the organisations and candidates in this JSON
  /// catalog before serving.
  #[arg(long, value_name = "CATALOG")]
  import: Option<PathBuf>,
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
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if let Some(path) = &cli.import {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("failed to read catalog {path:?}"))?;
    let catalog: Catalog = serde_json::from_str(&raw)
      .with_context(|| format!("failed to parse catalog {path:?}"))?;
    let (orgs, pets) = (catalog.organizations.len(), catalog.candidates.len());
    store
      .import_catalog(catalog)
      .await
      .context("failed to import catalog")?;
    tracing::info!(organizations = orgs, candidates = pets, "imported catalog");
  }

  let discovery = Discovery::new(Arc::new(store), server_cfg.discovery);
  let app = paws_api::api_router(discovery);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
