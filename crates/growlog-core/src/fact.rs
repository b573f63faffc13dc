//! Fact types: one labelled, typed, positioned attribute of a plant.
//!
//! Every fact value is stored as text. The declared [`FactKind`] says how that
//! text is meant to be read; [`FactValue`] is the typed view recovered from it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Stored value text for photo facts; the image itself lives in media storage.
pub const PHOTO_VALUE: &str = "Photo";

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The fixed enumeration governing how a fact's value is interpreted.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FactKind {
  Date,
  ShortText,
  LongText,
  Integer,
  Decimal,
  Photo,
  /// Text produced by the guideline generator. Older clients call it
  /// `plant_care`.
  #[serde(alias = "plant_care")]
  #[strum(to_string = "derived_text", serialize = "plant_care")]
  DerivedText,
}

impl FactKind {
  /// The string stored in the `kind` column.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Date => "date",
      Self::ShortText => "short_text",
      Self::LongText => "long_text",
      Self::Integer => "integer",
      Self::Decimal => "decimal",
      Self::Photo => "photo",
      Self::DerivedText => "derived_text",
    }
  }

  /// Parse a kind name as sent by clients, mapping failures to
  /// [`Error::UnknownFactKind`].
  pub fn parse(s: &str) -> Result<Self> {
    s.trim()
      .parse()
      .map_err(|_| Error::UnknownFactKind(s.to_owned()))
  }
}

// ─── Media ───────────────────────────────────────────────────────────────────

/// A photo stored on disk; no binary data lives in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
  /// Path relative to the configured media directory.
  pub path:         String,
  /// SHA-256 hex digest of the stored bytes.
  pub content_hash: String,
  pub media_type:   String,
}

// ─── Typed value ─────────────────────────────────────────────────────────────

/// The typed payload of a fact, keyed by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FactValue {
  Date(NaiveDate),
  ShortText(String),
  LongText(String),
  Integer(i64),
  Decimal(f64),
  Photo(MediaRef),
  DerivedText(String),
}

impl FactValue {
  pub fn kind(&self) -> FactKind {
    match self {
      Self::Date(_) => FactKind::Date,
      Self::ShortText(_) => FactKind::ShortText,
      Self::LongText(_) => FactKind::LongText,
      Self::Integer(_) => FactKind::Integer,
      Self::Decimal(_) => FactKind::Decimal,
      Self::Photo(_) => FactKind::Photo,
      Self::DerivedText(_) => FactKind::DerivedText,
    }
  }

  /// Split into the text stored in the `value` column and the media
  /// reference, which is present only for photos.
  pub fn to_stored(&self) -> (String, Option<MediaRef>) {
    match self {
      Self::Date(d) => (d.format(DATE_FORMAT).to_string(), None),
      Self::ShortText(s) | Self::LongText(s) | Self::DerivedText(s) => {
        (s.clone(), None)
      }
      Self::Integer(n) => (n.to_string(), None),
      Self::Decimal(x) => (x.to_string(), None),
      Self::Photo(m) => (PHOTO_VALUE.to_owned(), Some(m.clone())),
    }
  }

  /// Rebuild the typed value from its stored parts.
  pub fn from_stored(
    kind: FactKind,
    raw: &str,
    media: Option<&MediaRef>,
  ) -> Result<Self> {
    let decode_err = || Error::Decode {
      kind: kind.to_string(),
      raw:  raw.to_owned(),
    };

    Ok(match kind {
      FactKind::Date => Self::Date(
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
          .map_err(|_| decode_err())?,
      ),
      FactKind::ShortText => Self::ShortText(raw.to_owned()),
      FactKind::LongText => Self::LongText(raw.to_owned()),
      FactKind::Integer => {
        Self::Integer(raw.trim().parse().map_err(|_| decode_err())?)
      }
      FactKind::Decimal => {
        Self::Decimal(raw.trim().parse().map_err(|_| decode_err())?)
      }
      FactKind::Photo => Self::Photo(media.cloned().ok_or_else(decode_err)?),
      FactKind::DerivedText => Self::DerivedText(raw.to_owned()),
    })
  }
}

/// Serialise a raw client value to the canonical text stored for a fact.
///
/// Strings are kept verbatim, objects and arrays become compact JSON, numbers
/// and booleans their textual form. `null` counts as absent.
pub fn normalize_value(raw: &serde_json::Value) -> Option<String> {
  use serde_json::Value;

  match raw {
    Value::Null => None,
    Value::String(s) => Some(s.clone()),
    Value::Bool(b) => Some(b.to_string()),
    Value::Number(n) => Some(n.to_string()),
    Value::Array(_) | Value::Object(_) => Some(raw.to_string()),
  }
}

// ─── Fact ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
  pub fact_id:    Uuid,
  pub plant_id:   Uuid,
  pub label:      String,
  /// Canonical text form of the value; see [`FactValue::to_stored`].
  pub value:      String,
  pub kind:       FactKind,
  /// Present if and only if `kind` is [`FactKind::Photo`].
  pub media:      Option<MediaRef>,
  /// Zero-based index within the plant's fact sequence.
  pub position:   u32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Fact {
  /// Decode the stored text according to the declared kind.
  pub fn typed_value(&self) -> Result<FactValue> {
    FactValue::from_stored(self.kind, &self.value, self.media.as_ref())
  }
}

/// Input to [`crate::store::PlantStore::append_fact`].
/// `position` and timestamps are always set by the store.
#[derive(Debug, Clone)]
pub struct NewFact {
  pub plant_id: Uuid,
  pub label:    String,
  pub value:    String,
  pub kind:     FactKind,
  pub media:    Option<MediaRef>,
}

impl NewFact {
  pub fn new(plant_id: Uuid, label: impl Into<String>, value: FactValue) -> Self {
    let kind = value.kind();
    let (value, media) = value.to_stored();
    Self { plant_id, label: label.into(), value, kind, media }
  }
}

/// Partial fact update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct FactPatch {
  pub label: Option<String>,
  pub value: Option<String>,
  pub kind:  Option<FactKind>,
}

/// Which neighbour a fact trades places with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
  Up,
  Down,
}
