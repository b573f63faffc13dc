//! Handlers for fact endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/plants/{id}/facts` | JSON [`FactDraft`], or multipart with a `photo` file |
//! | `GET`    | `/facts/{id}` | Single fact |
//! | `PUT`    | `/facts/{id}` | Body: [`FactEdit`]; absent fields are kept |
//! | `DELETE` | `/facts/{id}` | Later facts move up one position |
//! | `POST`   | `/facts/{id}/move` | `{"direction":"up"\|"down"}` → `{"new_position": n}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{FromRequest, Multipart, Path, Request, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use growlog_core::{
  Journal,
  fact::{Fact, FactKind, MoveDirection},
  guide::GuideGenerator,
  journal::{FactDraft, FactEdit},
  media::{MediaStore, PhotoUpload},
  store::PlantStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::CurrentOwner, error::ApiError, json::JsonBody};

// ─── Create ───────────────────────────────────────────────────────────────────

/// A multipart submission, collected before dispatch.
#[derive(Debug, Default)]
struct FactForm {
  label:  Option<String>,
  kind:   Option<String>,
  value:  Option<String>,
  upload: Option<PhotoUpload>,
}

impl FactForm {
  async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
    let mut form = FactForm::default();

    while let Some(field) = multipart.next_field().await? {
      let name = field.name().unwrap_or_default().to_owned();
      match name.as_str() {
        "photo" => {
          let filename = field.file_name().unwrap_or_default().to_owned();
          let content_type = field.content_type().map(str::to_owned);
          let bytes = field.bytes().await?;
          form.upload = Some(PhotoUpload { filename, content_type, bytes: bytes.to_vec() });
        }
        "label" | "kind" | "value_type" | "value" => {
          let text = field.text().await?;
          let slot = match name.as_str() {
            "label" => &mut form.label,
            "value" => &mut form.value,
            _ => &mut form.kind,
          };
          *slot = Some(text);
        }
        _ => {}
      }
    }
    Ok(form)
  }

  /// Photo unless a different kind is named explicitly.
  fn is_photo(&self) -> Result<bool, ApiError> {
    match &self.kind {
      Some(kind) => Ok(FactKind::parse(kind)? == FactKind::Photo),
      None => Ok(self.upload.is_some()),
    }
  }
}

/// `POST /plants/{id}/facts`; returns 201 + the appended fact.
///
/// Bodies above the router's upload limit are refused with 413.
pub async fn create<S, G, M>(
  State(journal): State<Arc<Journal<S, G, M>>>,
  CurrentOwner(owner): CurrentOwner,
  Path(plant_id): Path<Uuid>,
  request: Request,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  journal.owned_plant(&owner, plant_id).await?;

  let is_multipart = request
    .headers()
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|ct| ct.starts_with("multipart/form-data"));

  let fact = if is_multipart {
    let multipart = Multipart::from_request(request, &()).await?;
    let form = FactForm::read(multipart).await?;

    if form.is_photo()? {
      journal.append_photo(plant_id, form.label, form.upload).await?
    } else {
      let draft = FactDraft {
        label: form.label,
        value: form.value.map(serde_json::Value::String),
        kind:  form.kind.unwrap_or_default(),
      };
      journal.append_fact(plant_id, draft).await?
    }
  } else {
    let JsonBody(draft) = JsonBody::<FactDraft>::from_request(request, &()).await?;
    journal.append_fact(plant_id, draft).await?
  };

  Ok((StatusCode::CREATED, Json(fact)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /facts/{id}`
pub async fn get_one<S, G, M>(
  State(journal): State<Arc<Journal<S, G, M>>>,
  CurrentOwner(owner): CurrentOwner,
  Path(id): Path<Uuid>,
) -> Result<Json<Fact>, ApiError>
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  Ok(Json(journal.owned_fact(&owner, id).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /facts/{id}`
pub async fn update<S, G, M>(
  State(journal): State<Arc<Journal<S, G, M>>>,
  CurrentOwner(owner): CurrentOwner,
  Path(id): Path<Uuid>,
  JsonBody(edit): JsonBody<FactEdit>,
) -> Result<Json<Fact>, ApiError>
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  journal.owned_fact(&owner, id).await?;
  Ok(Json(journal.update_fact(id, edit).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /facts/{id}`
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
  journal.owned_fact(&owner, id).await?;
  journal.delete_fact(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Move ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MoveBody {
  pub direction: MoveDirection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MoveResponse {
  pub new_position: u32,
}

/// `POST /facts/{id}/move`
pub async fn move_one<S, G, M>(
  State(journal): State<Arc<Journal<S, G, M>>>,
  CurrentOwner(owner): CurrentOwner,
  Path(id): Path<Uuid>,
  JsonBody(body): JsonBody<MoveBody>,
) -> Result<Json<MoveResponse>, ApiError>
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  journal.owned_fact(&owner, id).await?;
  let new_position = journal.move_fact(id, body.direction).await?;
  Ok(Json(MoveResponse { new_position }))
}
