//! Error types for `growlog-core`.

use thiserror::Error;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// The request is missing something it needs; nothing was changed.
  #[error("validation error: {0}")]
  Validation(String),

  #[error("unknown fact kind: {0:?}")]
  UnknownFactKind(String),

  #[error("owner not found: {0}")]
  OwnerNotFound(Uuid),

  #[error("plant not found: {0}")]
  PlantNotFound(Uuid),

  #[error("fact not found: {0}")]
  FactNotFound(Uuid),

  #[error("conflict: {0}")]
  Conflict(String),

  /// The stored text of a fact does not parse as its declared kind.
  #[error("cannot decode {kind} value {raw:?}")]
  Decode { kind: String, raw: String },

  #[error("guideline generation failed: {0}")]
  Generation(#[source] BoxError),

  #[error("media error: {0}")]
  Media(#[source] BoxError),

  #[error("store error: {0}")]
  Store(#[source] BoxError),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  pub fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }

  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub fn generation<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Generation(Box::new(e))
  }

  pub fn media<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Media(Box::new(e))
  }

  /// `true` for errors caused by the caller's input rather than the system.
  pub fn is_validation(&self) -> bool {
    matches!(self, Self::Validation(_) | Self::UnknownFactKind(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
