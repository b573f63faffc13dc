//! A plant: the envelope that owns an ordered list of facts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fact::{Fact, MediaRef};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plant {
  pub plant_id:   Uuid,
  pub owner_id:   Uuid,
  /// User-assigned label number, e.g. the tag stuck in the pot.
  pub number:     i64,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::PlantStore::add_plant`].
#[derive(Debug, Clone)]
pub struct NewPlant {
  pub owner_id: Uuid,
  pub number:   i64,
  pub name:     String,
}

/// Partial plant update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct PlantPatch {
  pub number:   Option<i64>,
  pub name:     Option<String>,
  pub owner_id: Option<Uuid>,
}

/// Parameters for [`crate::store::PlantStore::list_plants`].
#[derive(Debug, Clone, Default)]
pub struct PlantQuery {
  /// Restrict to one owner's plants; `None` lists every plant.
  pub owner_id: Option<Uuid>,
  /// Matches a name substring, or the exact number when all digits.
  pub text:     Option<String>,
}

/// A plant as shown in a listing: the plant plus its first photo, if any.
#[derive(Debug, Clone, Serialize)]
pub struct PlantSummary {
  #[serde(flatten)]
  pub plant: Plant,
  pub cover: Option<MediaRef>,
}

/// A plant with its facts in position order.
#[derive(Debug, Clone, Serialize)]
pub struct PlantView {
  #[serde(flatten)]
  pub plant: Plant,
  pub facts: Vec<Fact>,
}
