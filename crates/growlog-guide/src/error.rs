//! Error type for `growlog-guide`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no API key configured for the guideline generator")]
  MissingApiKey,

  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("request timed out")]
  Timeout,

  #[error("request failed: {0}")]
  Request(#[source] reqwest::Error),

  #[error("endpoint answered {status}: {body}")]
  Status { status: u16, body: String },

  #[error("malformed completion: {0}")]
  Malformed(String),

  #[error("completion contained no text")]
  EmptyCompletion,
}

impl From<reqwest::Error> for Error {
  fn from(e: reqwest::Error) -> Self {
    if e.is_timeout() {
      Self::Timeout
    } else if e.is_decode() {
      Self::Malformed(e.to_string())
    } else {
      Self::Request(e)
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
