//! Owner: an account that owns plants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
  pub owner_id:      Uuid,
  pub name:          String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`. Never sent over
  /// the wire.
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub is_admin:      bool,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::PlantStore::add_owner`].
#[derive(Debug, Clone)]
pub struct NewOwner {
  pub name:          String,
  pub password_hash: String,
  pub is_admin:      bool,
}

/// Partial owner update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct OwnerPatch {
  pub name:          Option<String>,
  pub password_hash: Option<String>,
  pub is_admin:      Option<bool>,
}
