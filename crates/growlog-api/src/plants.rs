//! Handlers for `/plants` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/plants` | `?q=` name substring or exact number; admins may pass `?owner_id=` |
//! | `POST`   | `/plants` | Body: [`NewPlantBody`]; returns 201 + plant |
//! | `GET`    | `/plants/{id}` | Plant with its facts in position order |
//! | `PUT`    | `/plants/{id}` | Body: [`PlantPatchBody`]; only admins may reassign ownership |
//! | `DELETE` | `/plants/{id}` | Also removes facts and stored photos |
//! | `POST`   | `/plants/{id}/guidelines` | Optional body `{"label": ...}` |

use std::sync::Arc;

use axum::{
  Json,
  body::Bytes,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use growlog_core::{
  Journal,
  guide::GuideGenerator,
  media::MediaStore,
  plant::{NewPlant, Plant, PlantPatch, PlantQuery, PlantSummary, PlantView},
  store::PlantStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{auth::CurrentOwner, error::ApiError, json::JsonBody};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub q:        Option<String>,
  pub owner_id: Option<Uuid>,
}

/// `GET /plants[?q=...][&owner_id=...]`
pub async fn list<S, G, M>(
  State(journal): State<Arc<Journal<S, G, M>>>,
  current: CurrentOwner,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PlantSummary>>, ApiError>
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  let owner_id = match params.owner_id {
    Some(id) if id != current.0.owner_id => {
      current.require_admin()?;
      id
    }
    _ => current.0.owner_id,
  };
  let text = params.q.map(|q| q.trim().to_owned()).filter(|q| !q.is_empty());

  let plants = journal
    .summaries(PlantQuery { owner_id: Some(owner_id), text })
    .await?;
  Ok(Json(plants))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewPlantBody {
  pub number:   i64,
  pub name:     String,
  /// Admin only; defaults to the caller.
  pub owner_id: Option<Uuid>,
}

/// `POST /plants`
pub async fn create<S, G, M>(
  State(journal): State<Arc<Journal<S, G, M>>>,
  current: CurrentOwner,
  JsonBody(body): JsonBody<NewPlantBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  let owner_id = match body.owner_id {
    Some(id) if id != current.0.owner_id => {
      current.require_admin()?;
      id
    }
    _ => current.0.owner_id,
  };

  let plant = journal
    .add_plant(NewPlant { owner_id, number: body.number, name: body.name })
    .await?;
  Ok((StatusCode::CREATED, Json(plant)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /plants/{id}`
pub async fn get_one<S, G, M>(
  State(journal): State<Arc<Journal<S, G, M>>>,
  CurrentOwner(owner): CurrentOwner,
  Path(id): Path<Uuid>,
) -> Result<Json<PlantView>, ApiError>
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  let plant = journal.owned_plant(&owner, id).await?;
  Ok(Json(journal.view(plant).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct PlantPatchBody {
  pub number:   Option<i64>,
  pub name:     Option<String>,
  pub owner_id: Option<Uuid>,
}

/// `PUT /plants/{id}`
pub async fn update<S, G, M>(
  State(journal): State<Arc<Journal<S, G, M>>>,
  current: CurrentOwner,
  Path(id): Path<Uuid>,
  JsonBody(body): JsonBody<PlantPatchBody>,
) -> Result<Json<Plant>, ApiError>
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  let plant = journal.owned_plant(&current.0, id).await?;
  if body.owner_id.is_some_and(|o| o != plant.owner_id) {
    current.require_admin()?;
  }

  let patch = PlantPatch {
    number:   body.number,
    name:     body.name,
    owner_id: body.owner_id,
  };
  Ok(Json(journal.update_plant(id, patch).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /plants/{id}`
pub async fn delete_one<S, G, M>(
  State(journal): State<Arc<Journal<S, G, M>>>,
  CurrentOwner(owner): CurrentOwner,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  journal.owned_plant(&owner, id).await?;
  journal.delete_plant(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Guidelines ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct GuidelinesBody {
  pub label: Option<String>,
}

/// `POST /plants/{id}/guidelines`; the body may be empty.
pub async fn generate<S, G, M>(
  State(journal): State<Arc<Journal<S, G, M>>>,
  CurrentOwner(owner): CurrentOwner,
  Path(id): Path<Uuid>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  let body: GuidelinesBody = if body.iter().all(u8::is_ascii_whitespace) {
    GuidelinesBody::default()
  } else {
    serde_json::from_slice(&body).map_err(ApiError::bad_request)?
  };

  journal.owned_plant(&owner, id).await?;
  let fact = journal.generate_guidelines(id, body.label).await?;
  Ok((StatusCode::CREATED, Json(fact)))
}
