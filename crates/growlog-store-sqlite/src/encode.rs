//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Media references are stored
//! as compact JSON. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use growlog_core::{
  fact::{Fact, FactKind, MediaRef},
  owner::Owner,
  plant::Plant,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── FactKind ────────────────────────────────────────────────────────────────

pub fn encode_kind(k: FactKind) -> &'static str { k.as_str() }

pub fn decode_kind(s: &str) -> Result<FactKind> {
  FactKind::parse(s).map_err(|_| Error::Corrupt {
    column: "kind",
    value:  s.to_owned(),
  })
}

// ─── MediaRef ────────────────────────────────────────────────────────────────

pub fn encode_media(m: &MediaRef) -> Result<String> {
  Ok(serde_json::to_string(m)?)
}

pub fn decode_media(s: &str) -> Result<MediaRef> { Ok(serde_json::from_str(s)?) }

// ─── Position ────────────────────────────────────────────────────────────────

pub fn decode_position(p: i64) -> Result<u32> {
  u32::try_from(p).map_err(|_| Error::Corrupt {
    column: "position",
    value:  p.to_string(),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawOwner::from_row`].
pub const OWNER_COLUMNS: &str = "owner_id, name, password_hash, is_admin, created_at";

/// Raw values read directly from an `owners` row.
pub struct RawOwner {
  pub owner_id:      String,
  pub name:          String,
  pub password_hash: String,
  pub is_admin:      bool,
  pub created_at:    String,
}

impl RawOwner {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      owner_id:      row.get(0)?,
      name:          row.get(1)?,
      password_hash: row.get(2)?,
      is_admin:      row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_owner(self) -> Result<Owner> {
    Ok(Owner {
      owner_id:      decode_uuid(&self.owner_id)?,
      name:          self.name,
      password_hash: self.password_hash,
      is_admin:      self.is_admin,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawPlant::from_row`].
pub const PLANT_COLUMNS: &str = "plant_id, owner_id, number, name, created_at";

/// Raw values read directly from a `plants` row.
pub struct RawPlant {
  pub plant_id:   String,
  pub owner_id:   String,
  pub number:     i64,
  pub name:       String,
  pub created_at: String,
}

impl RawPlant {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      plant_id:   row.get(0)?,
      owner_id:   row.get(1)?,
      number:     row.get(2)?,
      name:       row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_plant(self) -> Result<Plant> {
    Ok(Plant {
      plant_id:   decode_uuid(&self.plant_id)?,
      owner_id:   decode_uuid(&self.owner_id)?,
      number:     self.number,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawFact::from_row`].
pub const FACT_COLUMNS: &str = "fact_id, plant_id, label, value, kind, media_json, \
                                position, created_at, updated_at";

/// Raw values read directly from a `facts` row.
pub struct RawFact {
  pub fact_id:    String,
  pub plant_id:   String,
  pub label:      String,
  pub value:      String,
  pub kind:       String,
  pub media_json: Option<String>,
  pub position:   i64,
  pub created_at: String,
  pub updated_at: String,
}

impl RawFact {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      fact_id:    row.get(0)?,
      plant_id:   row.get(1)?,
      label:      row.get(2)?,
      value:      row.get(3)?,
      kind:       row.get(4)?,
      media_json: row.get(5)?,
      position:   row.get(6)?,
      created_at: row.get(7)?,
      updated_at: row.get(8)?,
    })
  }

  pub fn into_fact(self) -> Result<Fact> {
    Ok(Fact {
      fact_id:    decode_uuid(&self.fact_id)?,
      plant_id:   decode_uuid(&self.plant_id)?,
      label:      self.label,
      value:      self.value,
      kind:       decode_kind(&self.kind)?,
      media:      self.media_json.as_deref().map(decode_media).transpose()?,
      position:   decode_position(self.position)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
