//! comedor-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) merged with
//! `COMEDOR_*` environment variables, opens the SQLite store, and serves
//! the check-in JSON API.
//!
//! # Importing guests
//!
//! Guest records are maintained by an external registration process; this
//! server never creates them during check-in. To load a registration export
//! (a JSON array of guest records) into the store:
//!
//! ```sh
//! comedor-server --import-guests guests.json
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use comedor_core::{guest::NewGuest, store::CheckinStore as _};
use comedor_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Comedor check-in server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Import a JSON array of guest records into the store, then exit.
  #[arg(long, value_name = "FILE")]
  import_guests: Option<PathBuf>,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8430
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `COMEDOR_*` environment variables.
///
/// `store_path` has no default: starting without a configured store is a
/// fatal error.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:       String,
  #[serde(default = "default_port")]
  port:       u16,
  store_path: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("COMEDOR"))
    .build()
    .context("failed to read configuration")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig (is store_path set?)")?;

  // Open the SQLite store.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.store_path)
    })?;

  // Helper mode: load a registration export and exit.
  if let Some(path) = cli.import_guests {
    return import_guests(&store, &path).await;
  }

  let app = comedor_api::api_router(Arc::new(store))
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a JSON array of [`NewGuest`] records from `path` and insert them.
async fn import_guests(store: &SqliteStore, path: &Path) -> anyhow::Result<()> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading {}", path.display()))?;
  let guests: Vec<NewGuest> =
    serde_json::from_str(&raw).context("parsing guest export")?;

  let count = guests.len();
  for guest in guests {
    let external_id = guest.external_id.clone();
    store
      .add_guest(guest)
      .await
      .with_context(|| format!("importing guest {external_id}"))?;
  }

  tracing::info!("imported {count} guests");
  Ok(())
}
