//! Runtime configuration: an optional TOML file overlaid with `GROWLOG_*`
//! environment variables.

use std::path::{Path, PathBuf};

use growlog_guide::GuideConfig;
use serde::Deserialize;

use crate::error::Result;

/// Environment variable prefix. Nested keys use `__`, e.g.
/// `GROWLOG_GUIDE__API_KEY`.
pub const ENV_PREFIX: &str = "GROWLOG";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// Directory holding uploaded photos; served under `/uploads`.
  #[serde(default = "default_media_dir")]
  pub media_dir:  PathBuf,
  /// Largest accepted fact submission, photo included.
  #[serde(default = "default_max_upload_bytes")]
  pub max_upload_bytes: usize,
  #[serde(default)]
  pub guide:      GuideConfig,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("growlog.db") }
fn default_media_dir() -> PathBuf { PathBuf::from("uploads") }
fn default_max_upload_bytes() -> usize { growlog_api::DEFAULT_MAX_UPLOAD_BYTES }

impl ServerConfig {
  /// Load from `path` (which may be absent) and the process environment.
  pub fn load(path: &Path) -> Result<Self> { Self::load_with_env(path, None) }

  /// Like [`Self::load`], reading variables from `env` instead of the
  /// process environment when given.
  pub fn load_with_env(
    path: &Path,
    env: Option<config::Map<String, String>>,
  ) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix(ENV_PREFIX)
          .prefix_separator("_")
          .separator("__")
          .source(env),
      )
      .build()?;

    Ok(settings.try_deserialize()?)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}
