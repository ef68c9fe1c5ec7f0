//! phreg-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and either serves the registration API over HTTP or runs a
//! single operator command against the same store.
//!
//! ```text
//! phreg-server                          # serve
//! phreg-server grant-admin --email a@b.com
//! phreg-server check-in auth0|abc123
//! phreg-server import export.json
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use phreg_api::AppState;
use phreg_core::Registrar;
use phreg_server::{ServerConfig, operator};
use phreg_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Hackathon registration server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Give the applicant registered under an email admin rights.
  GrantAdmin {
    #[arg(long)]
    email: String,
  },
  /// Take admin rights away again.
  RevokeAdmin {
    #[arg(long)]
    email: String,
  },
  /// Mark a confirmed applicant as arrived at the venue.
  CheckIn {
    /// Identity of the applicant.
    id: String,
  },
  /// Import a JSON array of records, current or legacy shape.
  Import { file: PathBuf },
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

  let server_cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;

  let store_path = server_cfg.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let store = Arc::new(store);

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(&server_cfg, store).await,
    Command::GrantAdmin { email } => {
      let record = operator::set_admin(&Registrar::new(store), &email, true).await?;
      println!("{} ({}) is now an admin", record.profile.email, record.id);
      Ok(())
    }
    Command::RevokeAdmin { email } => {
      let record = operator::set_admin(&Registrar::new(store), &email, false).await?;
      println!("{} ({}) is no longer an admin", record.profile.email, record.id);
      Ok(())
    }
    Command::CheckIn { id } => {
      let record = operator::check_in(&Registrar::new(store), &id).await?;
      println!("{} checked in", record.profile.full_name());
      Ok(())
    }
    Command::Import { file } => {
      let written = operator::import(&Registrar::new(store), &file).await?;
      println!("imported {written} record(s)");
      Ok(())
    }
  }
}

async fn serve(cfg: &ServerConfig, store: Arc<SqliteStore>) -> anyhow::Result<()> {
  let app = phreg_api::router(AppState::new(store, cfg.identity()));
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
