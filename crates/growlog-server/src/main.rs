//! growlog server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `GROWLOG_*`
//! environment variables, opens the SQLite store and photo directory, and
//! serves the JSON API.
//!
//! # Password hash generation
//!
//! ```text
//! cargo run -p growlog-server -- --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use growlog_core::Journal;
use growlog_guide::ChatGuide;
use growlog_server::{DiskMediaStore, ServerConfig, bootstrap::bootstrap_admin};
use growlog_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "growlog plant journal server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
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

  if cli.hash_password {
    let password = read_password()?;
    let hash = growlog_api::auth::hash_password(&password)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let media_dir = expand_tilde(&server_cfg.media_dir);
  let media = DiskMediaStore::open(&media_dir)
    .await
    .with_context(|| format!("failed to prepare media directory {media_dir:?}"))?;

  let guide = ChatGuide::new(server_cfg.guide.clone())
    .context("failed to build the guideline generator client")?;
  if !guide.has_api_key() {
    tracing::warn!(
      "no guide.api_key (or GROWLOG_GUIDE__API_KEY) set; care guideline generation will fail"
    );
  }

  let journal = Arc::new(Journal::new(Arc::new(store), Arc::new(guide), Arc::new(media)));

  if let Some(creds) = bootstrap_admin(&*journal)
    .await
    .context("failed to create initial admin account")?
  {
    println!("Created initial account");
    println!("  username: {}", creds.name);
    println!("  password: {}", creds.password);
    println!("Change this password after logging in.");
  }

  let app = growlog_server::app(journal, &media_dir, server_cfg.max_upload_bytes);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password line from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
