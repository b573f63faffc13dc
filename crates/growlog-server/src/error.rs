//! Error type for `growlog-server`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error(transparent)]
  Core(#[from] growlog_core::Error),

  #[error("password hashing failed: {0}")]
  Hash(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("refusing media path {0:?}")]
  UnsafePath(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
