//! [`Journal`]: the operations a user performs on their plants.
//!
//! The journal validates and normalises client input, enforces the
//! prerequisites of guideline generation, and keeps media storage in step
//! with fact rows. Persistence itself is delegated to a [`PlantStore`].

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  fact::{
    Fact, FactKind, FactPatch, FactValue, MediaRef, MoveDirection, NewFact,
    normalize_value,
  },
  guide::{DEFAULT_GUIDE_LABEL, GuideGenerator, PLANT_TYPE_LABEL},
  media::{MediaStore, PhotoUpload},
  owner::{NewOwner, Owner, OwnerPatch},
  plant::{NewPlant, Plant, PlantPatch, PlantQuery, PlantSummary, PlantView},
  store::PlantStore,
};

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// A fact as submitted by a client, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct FactDraft {
  pub label: Option<String>,
  /// Any JSON value; see [`normalize_value`].
  pub value: Option<serde_json::Value>,
  /// Kind name; parsed with [`FactKind::parse`].
  #[serde(alias = "value_type")]
  pub kind:  String,
}

/// A partial fact edit as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FactEdit {
  pub label: Option<String>,
  pub value: Option<serde_json::Value>,
  #[serde(alias = "value_type")]
  pub kind:  Option<String>,
}

fn required_label(label: Option<String>) -> Result<String> {
  label
    .filter(|l| !l.trim().is_empty())
    .ok_or_else(|| Error::validation("label is required"))
}

// ─── Journal ─────────────────────────────────────────────────────────────────

/// Cheap to clone; every collaborator is reference-counted.
pub struct Journal<S, G, M> {
  store: Arc<S>,
  guide: Arc<G>,
  media: Arc<M>,
}

impl<S, G, M> Clone for Journal<S, G, M> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      guide: Arc::clone(&self.guide),
      media: Arc::clone(&self.media),
    }
  }
}

impl<S, G, M> Journal<S, G, M>
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  pub fn new(store: Arc<S>, guide: Arc<G>, media: Arc<M>) -> Self {
    Self { store, guide, media }
  }

  pub fn store(&self) -> &S { &self.store }

  // ── Lookups ─────────────────────────────────────────────────────────────

  pub async fn owner(&self, owner_id: Uuid) -> Result<Owner> {
    self
      .store
      .get_owner(owner_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::OwnerNotFound(owner_id))
  }

  pub async fn plant(&self, plant_id: Uuid) -> Result<Plant> {
    self
      .store
      .get_plant(plant_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::PlantNotFound(plant_id))
  }

  pub async fn fact(&self, fact_id: Uuid) -> Result<Fact> {
    self
      .store
      .get_fact(fact_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::FactNotFound(fact_id))
  }

  /// A plant visible to `owner`. Plants of other owners are reported as
  /// missing unless `owner` is an admin.
  pub async fn owned_plant(&self, owner: &Owner, plant_id: Uuid) -> Result<Plant> {
    let plant = self.plant(plant_id).await?;
    if owner.is_admin || plant.owner_id == owner.owner_id {
      Ok(plant)
    } else {
      Err(Error::PlantNotFound(plant_id))
    }
  }

  /// A fact whose plant is visible to `owner`.
  pub async fn owned_fact(&self, owner: &Owner, fact_id: Uuid) -> Result<Fact> {
    let fact = self.fact(fact_id).await?;
    match self.owned_plant(owner, fact.plant_id).await {
      Ok(_) => Ok(fact),
      Err(Error::PlantNotFound(_)) => Err(Error::FactNotFound(fact_id)),
      Err(e) => Err(e),
    }
  }

  /// A plant together with its facts in position order.
  pub async fn view(&self, plant: Plant) -> Result<PlantView> {
    let facts = self
      .store
      .list_facts(plant.plant_id)
      .await
      .map_err(Error::store)?;
    Ok(PlantView { plant, facts })
  }

  /// Plants matching `query`, each with its first photo as cover.
  pub async fn summaries(&self, query: PlantQuery) -> Result<Vec<PlantSummary>> {
    let plants = self.store.list_plants(query).await.map_err(Error::store)?;

    let mut out = Vec::with_capacity(plants.len());
    for plant in plants {
      let cover = self
        .store
        .list_facts(plant.plant_id)
        .await
        .map_err(Error::store)?
        .into_iter()
        .find_map(|f| f.media);
      out.push(PlantSummary { plant, cover });
    }
    Ok(out)
  }

  // ── Ordered fact list ───────────────────────────────────────────────────

  /// Append a fact at the tail of the plant's sequence.
  ///
  /// A `derived_text` draft without a value is handed to the guideline
  /// generator. Photos must go through [`Self::append_photo`].
  pub async fn append_fact(&self, plant_id: Uuid, draft: FactDraft) -> Result<Fact> {
    let kind = FactKind::parse(&draft.kind)?;
    let value = draft.value.as_ref().and_then(normalize_value);

    match (kind, value) {
      (FactKind::Photo, _) => {
        Err(Error::validation("photo facts require an uploaded image"))
      }
      (FactKind::DerivedText, None) => {
        self.generate_guidelines(plant_id, draft.label).await
      }
      (_, None) => Err(Error::validation("value is required")),
      (kind, Some(value)) => {
        let label = required_label(draft.label)?;
        self.plant(plant_id).await?;
        self
          .store
          .append_fact(NewFact { plant_id, label, value, kind, media: None })
          .await
          .map_err(Error::store)
      }
    }
  }

  /// Store an uploaded photo and append a photo fact pointing at it.
  pub async fn append_photo(
    &self,
    plant_id: Uuid,
    label: Option<String>,
    upload: Option<PhotoUpload>,
  ) -> Result<Fact> {
    let label = required_label(label)?;
    let upload = upload.ok_or_else(|| Error::validation("no photo uploaded"))?;
    if upload.filename.trim().is_empty() || upload.bytes.is_empty() {
      return Err(Error::validation("no photo selected"));
    }

    self.plant(plant_id).await?;
    let position = self
      .store
      .list_facts(plant_id)
      .await
      .map_err(Error::store)?
      .len() as u32;

    let media = self
      .media
      .save(plant_id, position, upload)
      .await
      .map_err(Error::media)?;

    let input = NewFact::new(plant_id, label, FactValue::Photo(media.clone()));
    match self.store.append_fact(input).await {
      Ok(fact) => Ok(fact),
      Err(e) => {
        self.discard_media(&media).await;
        Err(Error::store(e))
      }
    }
  }

  /// Change only the supplied fields of a fact.
  pub async fn update_fact(&self, fact_id: Uuid, edit: FactEdit) -> Result<Fact> {
    let current = self.fact(fact_id).await?;

    let kind = edit.kind.as_deref().map(FactKind::parse).transpose()?;
    if let Some(kind) = kind
      && (kind == FactKind::Photo) != (current.kind == FactKind::Photo)
    {
      return Err(Error::validation(
        "a fact cannot be converted to or from a photo",
      ));
    }

    let label = match edit.label {
      Some(l) if l.trim().is_empty() => {
        return Err(Error::validation("label must not be empty"));
      }
      other => other,
    };

    let patch = FactPatch {
      label,
      value: edit.value.as_ref().and_then(normalize_value),
      kind,
    };

    self
      .store
      .update_fact(fact_id, patch)
      .await
      .map_err(Error::store)?
      .ok_or(Error::FactNotFound(fact_id))
  }

  /// Remove a fact; later facts move up to close the gap.
  pub async fn delete_fact(&self, fact_id: Uuid) -> Result<()> {
    let removed = self
      .store
      .delete_fact(fact_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::FactNotFound(fact_id))?;

    if let Some(media) = &removed.media {
      self.discard_media(media).await;
    }
    Ok(())
  }

  /// Swap a fact with its neighbour. Moving past either end is a no-op.
  pub async fn move_fact(&self, fact_id: Uuid, direction: MoveDirection) -> Result<u32> {
    self
      .store
      .move_fact(fact_id, direction)
      .await
      .map_err(Error::store)?
      .ok_or(Error::FactNotFound(fact_id))
  }

  // ── Generation ──────────────────────────────────────────────────────────

  /// Ask the generator for care guidelines matching the plant's
  /// `"Plant Type"` fact and append them as a `derived_text` fact.
  ///
  /// Nothing is written when the prerequisite is missing or the generator
  /// fails.
  pub async fn generate_guidelines(
    &self,
    plant_id: Uuid,
    label: Option<String>,
  ) -> Result<Fact> {
    self.plant(plant_id).await?;

    let plant_type = self
      .store
      .find_fact_by_label(plant_id, PLANT_TYPE_LABEL.to_owned())
      .await
      .map_err(Error::store)?
      .ok_or_else(|| {
        tracing::warn!(%plant_id, "no plant type fact; refusing to generate");
        Error::validation(format!(
          "missing prerequisite fact: set a {PLANT_TYPE_LABEL:?} fact first"
        ))
      })?;

    tracing::info!(%plant_id, plant_type = %plant_type.value, "generating care guidelines");

    let text = self
      .guide
      .care_guidelines(&plant_type.value)
      .await
      .map_err(|e| {
        tracing::error!(%plant_id, error = %e, "care guideline generation failed");
        Error::generation(e)
      })?;

    let label = label
      .filter(|l| !l.trim().is_empty())
      .unwrap_or_else(|| DEFAULT_GUIDE_LABEL.to_owned());

    self
      .store
      .append_fact(NewFact::new(plant_id, label, FactValue::DerivedText(text)))
      .await
      .map_err(Error::store)
  }

  // ── Plants and owners ───────────────────────────────────────────────────

  pub async fn add_plant(&self, input: NewPlant) -> Result<Plant> {
    if input.name.trim().is_empty() {
      return Err(Error::validation("plant name is required"));
    }
    self.owner(input.owner_id).await?;
    self.store.add_plant(input).await.map_err(Error::store)
  }

  /// Change only the supplied fields of a plant. A new owner must exist.
  pub async fn update_plant(&self, plant_id: Uuid, patch: PlantPatch) -> Result<Plant> {
    if patch.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
      return Err(Error::validation("plant name must not be empty"));
    }
    if let Some(owner_id) = patch.owner_id {
      self.owner(owner_id).await?;
    }
    self
      .store
      .update_plant(plant_id, patch)
      .await
      .map_err(Error::store)?
      .ok_or(Error::PlantNotFound(plant_id))
  }

  /// Delete a plant, its facts, and any photos they reference.
  pub async fn delete_plant(&self, plant_id: Uuid) -> Result<()> {
    let facts = self
      .store
      .list_facts(plant_id)
      .await
      .map_err(Error::store)?;

    if !self.store.delete_plant(plant_id).await.map_err(Error::store)? {
      return Err(Error::PlantNotFound(plant_id));
    }

    for media in facts.iter().filter_map(|f| f.media.as_ref()) {
      self.discard_media(media).await;
    }
    Ok(())
  }

  /// Create an owner; names are unique.
  pub async fn register_owner(&self, input: NewOwner) -> Result<Owner> {
    if input.name.trim().is_empty() {
      return Err(Error::validation("owner name is required"));
    }
    self.ensure_name_free(&input.name, None).await?;
    self.store.add_owner(input).await.map_err(Error::store)
  }

  pub async fn update_owner(&self, owner_id: Uuid, patch: OwnerPatch) -> Result<Owner> {
    if let Some(name) = &patch.name {
      if name.trim().is_empty() {
        return Err(Error::validation("owner name must not be empty"));
      }
      self.ensure_name_free(name, Some(owner_id)).await?;
    }
    self
      .store
      .update_owner(owner_id, patch)
      .await
      .map_err(Error::store)?
      .ok_or(Error::OwnerNotFound(owner_id))
  }

  /// Delete an owner with all their plants. Nobody can delete themselves.
  pub async fn remove_owner(&self, acting: &Owner, owner_id: Uuid) -> Result<()> {
    if acting.owner_id == owner_id {
      return Err(Error::validation("cannot delete your own account"));
    }

    let plants = self
      .store
      .list_plants(PlantQuery { owner_id: Some(owner_id), text: None })
      .await
      .map_err(Error::store)?;
    let mut media = Vec::new();
    for plant in &plants {
      let facts = self
        .store
        .list_facts(plant.plant_id)
        .await
        .map_err(Error::store)?;
      media.extend(facts.into_iter().filter_map(|f| f.media));
    }

    if !self.store.delete_owner(owner_id).await.map_err(Error::store)? {
      return Err(Error::OwnerNotFound(owner_id));
    }
    for m in &media {
      self.discard_media(m).await;
    }
    Ok(())
  }

  async fn ensure_name_free(&self, name: &str, except: Option<Uuid>) -> Result<()> {
    let existing = self
      .store
      .find_owner_by_name(name.to_owned())
      .await
      .map_err(Error::store)?;
    match existing {
      Some(o) if Some(o.owner_id) != except => {
        Err(Error::Conflict(format!("owner name {name:?} is taken")))
      }
      _ => Ok(()),
    }
  }

  async fn discard_media(&self, media: &MediaRef) {
    if let Err(e) = self.media.remove(media).await {
      tracing::warn!(path = %media.path, error = %e, "failed to remove stored photo");
    }
  }
}
