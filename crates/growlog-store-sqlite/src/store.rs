//! [`SqliteStore`], the SQLite implementation of [`PlantStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use growlog_core::{
  fact::{Fact, FactPatch, MoveDirection, NewFact},
  owner::{NewOwner, Owner, OwnerPatch},
  plant::{NewPlant, Plant, PlantPatch, PlantQuery},
  store::PlantStore,
};

use crate::{
  Result,
  encode::{
    FACT_COLUMNS, OWNER_COLUMNS, PLANT_COLUMNS, RawFact, RawOwner, RawPlant,
    decode_position, encode_dt, encode_kind, encode_media, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A growlog store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_owner(&self, sql: String, key: String) -> Result<Option<Owner>> {
    let raw: Option<RawOwner> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![key], RawOwner::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawOwner::into_owner).transpose()
  }

  async fn fetch_fact(&self, sql: String, params: Vec<String>) -> Result<Option<Fact>> {
    let raw: Option<RawFact> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params_from_iter(params.iter()),
              RawFact::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawFact::into_fact).transpose()
  }
}

// ─── PlantStore impl ─────────────────────────────────────────────────────────

impl PlantStore for SqliteStore {
  type Error = crate::Error;

  // ── Owners ────────────────────────────────────────────────────────────────

  async fn add_owner(&self, input: NewOwner) -> Result<Owner> {
    let owner = Owner {
      owner_id:      Uuid::new_v4(),
      name:          input.name,
      password_hash: input.password_hash,
      is_admin:      input.is_admin,
      created_at:    Utc::now(),
    };

    let id_str   = encode_uuid(owner.owner_id);
    let name     = owner.name.clone();
    let hash     = owner.password_hash.clone();
    let is_admin = owner.is_admin;
    let at_str   = encode_dt(owner.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO owners (owner_id, name, password_hash, is_admin, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, hash, is_admin, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(owner)
  }

  async fn get_owner(&self, id: Uuid) -> Result<Option<Owner>> {
    self
      .fetch_owner(
        format!("SELECT {OWNER_COLUMNS} FROM owners WHERE owner_id = ?1"),
        encode_uuid(id),
      )
      .await
  }

  async fn find_owner_by_name(&self, name: String) -> Result<Option<Owner>> {
    self
      .fetch_owner(
        format!("SELECT {OWNER_COLUMNS} FROM owners WHERE name = ?1"),
        name,
      )
      .await
  }

  async fn list_owners(&self) -> Result<Vec<Owner>> {
    let raws: Vec<RawOwner> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {OWNER_COLUMNS} FROM owners ORDER BY name"))?;
        let rows = stmt
          .query_map([], RawOwner::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawOwner::into_owner).collect()
  }

  async fn update_owner(&self, id: Uuid, patch: OwnerPatch) -> Result<Option<Owner>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawOwner> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE owners SET
             name          = COALESCE(?2, name),
             password_hash = COALESCE(?3, password_hash),
             is_admin      = COALESCE(?4, is_admin)
           WHERE owner_id = ?1",
          rusqlite::params![id_str, patch.name, patch.password_hash, patch.is_admin],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(Some(conn.query_row(
          &format!("SELECT {OWNER_COLUMNS} FROM owners WHERE owner_id = ?1"),
          rusqlite::params![id_str],
          RawOwner::from_row,
        )?))
      })
      .await?;

    raw.map(RawOwner::into_owner).transpose()
  }

  async fn delete_owner(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM owners WHERE owner_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn count_owners(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM owners", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n.max(0) as u64)
  }

  // ── Plants ────────────────────────────────────────────────────────────────

  async fn add_plant(&self, input: NewPlant) -> Result<Plant> {
    let plant = Plant {
      plant_id:   Uuid::new_v4(),
      owner_id:   input.owner_id,
      number:     input.number,
      name:       input.name,
      created_at: Utc::now(),
    };

    let id_str    = encode_uuid(plant.plant_id);
    let owner_str = encode_uuid(plant.owner_id);
    let number    = plant.number;
    let name      = plant.name.clone();
    let at_str    = encode_dt(plant.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO plants (plant_id, owner_id, number, name, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, owner_str, number, name, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(plant)
  }

  async fn get_plant(&self, id: Uuid) -> Result<Option<Plant>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPlant> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PLANT_COLUMNS} FROM plants WHERE plant_id = ?1"),
              rusqlite::params![id_str],
              RawPlant::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPlant::into_plant).transpose()
  }

  async fn list_plants(&self, query: PlantQuery) -> Result<Vec<Plant>> {
    let owner_str = query.owner_id.map(encode_uuid);
    let text = query
      .text
      .map(|t| t.trim().to_owned())
      .filter(|t| !t.is_empty());
    // A purely numeric query also matches the plant number exactly.
    let number: Option<i64> = text
      .as_deref()
      .filter(|t| t.bytes().all(|b| b.is_ascii_digit()))
      .and_then(|t| t.parse().ok());
    let pattern = text.map(|t| format!("%{t}%"));

    let raws: Vec<RawPlant> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PLANT_COLUMNS} FROM plants
           WHERE (?1 IS NULL OR owner_id = ?1)
             AND (?2 IS NULL OR name LIKE ?2 OR number = ?3)
           ORDER BY number, name"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![owner_str, pattern, number],
            RawPlant::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPlant::into_plant).collect()
  }

  async fn update_plant(&self, id: Uuid, patch: PlantPatch) -> Result<Option<Plant>> {
    let id_str    = encode_uuid(id);
    let owner_str = patch.owner_id.map(encode_uuid);

    let raw: Option<RawPlant> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE plants SET
             number   = COALESCE(?2, number),
             name     = COALESCE(?3, name),
             owner_id = COALESCE(?4, owner_id)
           WHERE plant_id = ?1",
          rusqlite::params![id_str, patch.number, patch.name, owner_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(Some(conn.query_row(
          &format!("SELECT {PLANT_COLUMNS} FROM plants WHERE plant_id = ?1"),
          rusqlite::params![id_str],
          RawPlant::from_row,
        )?))
      })
      .await?;

    raw.map(RawPlant::into_plant).transpose()
  }

  async fn delete_plant(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM plants WHERE plant_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Facts ─────────────────────────────────────────────────────────────────

  async fn append_fact(&self, input: NewFact) -> Result<Fact> {
    let now        = Utc::now();
    let fact_id    = Uuid::new_v4();
    let id_str     = encode_uuid(fact_id);
    let plant_str  = encode_uuid(input.plant_id);
    let label      = input.label.clone();
    let value      = input.value.clone();
    let kind_str   = encode_kind(input.kind);
    let media_str  = input.media.as_ref().map(encode_media).transpose()?;
    let at_str     = encode_dt(now);

    let position: i64 = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // Equal to the fact count while positions stay contiguous.
        let position: i64 = tx.query_row(
          "SELECT COALESCE(MAX(position) + 1, 0) FROM facts WHERE plant_id = ?1",
          rusqlite::params![plant_str],
          |r| r.get(0),
        )?;
        tx.execute(
          "INSERT INTO facts (
             fact_id, plant_id, label, value, kind, media_json,
             position, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
          rusqlite::params![
            id_str, plant_str, label, value, kind_str, media_str, position, at_str,
          ],
        )?;
        tx.commit()?;
        Ok(position)
      })
      .await?;

    Ok(Fact {
      fact_id,
      plant_id:   input.plant_id,
      label:      input.label,
      value:      input.value,
      kind:       input.kind,
      media:      input.media,
      position:   decode_position(position)?,
      created_at: now,
      updated_at: now,
    })
  }

  async fn get_fact(&self, id: Uuid) -> Result<Option<Fact>> {
    self
      .fetch_fact(
        format!("SELECT {FACT_COLUMNS} FROM facts WHERE fact_id = ?1"),
        vec![encode_uuid(id)],
      )
      .await
  }

  async fn list_facts(&self, plant_id: Uuid) -> Result<Vec<Fact>> {
    let plant_str = encode_uuid(plant_id);

    let raws: Vec<RawFact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {FACT_COLUMNS} FROM facts
           WHERE plant_id = ?1
           ORDER BY position, created_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![plant_str], RawFact::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFact::into_fact).collect()
  }

  async fn find_fact_by_label(&self, plant_id: Uuid, label: String) -> Result<Option<Fact>> {
    self
      .fetch_fact(
        format!(
          "SELECT {FACT_COLUMNS} FROM facts
           WHERE plant_id = ?1 AND label = ?2
           ORDER BY position
           LIMIT 1"
        ),
        vec![encode_uuid(plant_id), label],
      )
      .await
  }

  async fn update_fact(&self, id: Uuid, patch: FactPatch) -> Result<Option<Fact>> {
    let id_str   = encode_uuid(id);
    let kind_str = patch.kind.map(encode_kind);
    let at_str   = encode_dt(Utc::now());

    let raw: Option<RawFact> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE facts SET
             label      = COALESCE(?2, label),
             value      = COALESCE(?3, value),
             kind       = COALESCE(?4, kind),
             updated_at = ?5
           WHERE fact_id = ?1",
          rusqlite::params![id_str, patch.label, patch.value, kind_str, at_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(Some(conn.query_row(
          &format!("SELECT {FACT_COLUMNS} FROM facts WHERE fact_id = ?1"),
          rusqlite::params![id_str],
          RawFact::from_row,
        )?))
      })
      .await?;

    raw.map(RawFact::into_fact).transpose()
  }

  async fn delete_fact(&self, id: Uuid) -> Result<Option<Fact>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawFact> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = tx
          .query_row(
            &format!("SELECT {FACT_COLUMNS} FROM facts WHERE fact_id = ?1"),
            rusqlite::params![id_str],
            RawFact::from_row,
          )
          .optional()?;
        let Some(raw) = raw else {
          return Ok(None);
        };

        tx.execute(
          "DELETE FROM facts WHERE fact_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute(
          "UPDATE facts SET position = position - 1
           WHERE plant_id = ?1 AND position > ?2",
          rusqlite::params![raw.plant_id, raw.position],
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawFact::into_fact).transpose()
  }

  async fn move_fact(&self, id: Uuid, direction: MoveDirection) -> Result<Option<u32>> {
    let id_str = encode_uuid(id);

    let position: Option<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current: Option<(String, i64)> = tx
          .query_row(
            "SELECT plant_id, position FROM facts WHERE fact_id = ?1",
            rusqlite::params![id_str],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;
        let Some((plant_str, position)) = current else {
          return Ok(None);
        };

        let neighbour_sql = match direction {
          MoveDirection::Up => {
            "SELECT fact_id, position FROM facts
             WHERE plant_id = ?1 AND position < ?2
             ORDER BY position DESC
             LIMIT 1"
          }
          MoveDirection::Down => {
            "SELECT fact_id, position FROM facts
             WHERE plant_id = ?1 AND position > ?2
             ORDER BY position ASC
             LIMIT 1"
          }
        };
        let neighbour: Option<(String, i64)> = tx
          .query_row(
            neighbour_sql,
            rusqlite::params![plant_str, position],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;

        let Some((other_id, other_position)) = neighbour else {
          return Ok(Some(position));
        };

        tx.execute(
          "UPDATE facts SET position = ?2 WHERE fact_id = ?1",
          rusqlite::params![other_id, position],
        )?;
        tx.execute(
          "UPDATE facts SET position = ?2 WHERE fact_id = ?1",
          rusqlite::params![id_str, other_position],
        )?;
        tx.commit()?;
        Ok(Some(other_position))
      })
      .await?;

    position.map(decode_position).transpose()
  }
}
