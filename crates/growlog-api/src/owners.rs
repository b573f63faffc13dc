//! Handlers for `/me` and the admin-only `/owners` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/me` | The authenticated owner |
//! | `GET`    | `/owners` | Admin only |
//! | `POST`   | `/owners` | Admin only; body: [`NewOwnerBody`] |
//! | `PUT`    | `/owners/{id}` | Admin only; body: [`OwnerPatchBody`] |
//! | `DELETE` | `/owners/{id}` | Admin only; not yourself |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use growlog_core::{
  Journal,
  guide::GuideGenerator,
  media::MediaStore,
  owner::{NewOwner, Owner, OwnerPatch},
  store::PlantStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  auth::{CurrentOwner, hash_password},
  error::ApiError,
  json::JsonBody,
};

fn hash(password: &str) -> Result<String, ApiError> {
  if password.is_empty() {
    return Err(ApiError::bad_request("password must not be empty"));
  }
  hash_password(password).map_err(|e| ApiError::Internal(format!("argon2: {e}")))
}

/// `GET /me`
pub async fn me(CurrentOwner(owner): CurrentOwner) -> Json<Owner> { Json(owner) }

/// `GET /owners`
pub async fn list<S, G, M>(
  State(journal): State<Arc<Journal<S, G, M>>>,
  current: CurrentOwner,
) -> Result<Json<Vec<Owner>>, ApiError>
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  current.require_admin()?;
  let owners = journal
    .store()
    .list_owners()
    .await
    .map_err(growlog_core::Error::store)?;
  Ok(Json(owners))
}

#[derive(Debug, Deserialize)]
pub struct NewOwnerBody {
  pub name:     String,
  pub password: String,
  #[serde(default)]
  pub is_admin: bool,
}

/// `POST /owners`
pub async fn create<S, G, M>(
  State(journal): State<Arc<Journal<S, G, M>>>,
  current: CurrentOwner,
  JsonBody(body): JsonBody<NewOwnerBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  current.require_admin()?;
  let owner = journal
    .register_owner(NewOwner {
      name:          body.name.trim().to_owned(),
      password_hash: hash(&body.password)?,
      is_admin:      body.is_admin,
    })
    .await?;
  tracing::info!(owner = %owner.name, by = %current.0.name, "owner created");
  Ok((StatusCode::CREATED, Json(owner)))
}

#[derive(Debug, Default, Deserialize)]
pub struct OwnerPatchBody {
  pub name:     Option<String>,
  /// New password; omitted or empty keeps the current one.
  pub password: Option<String>,
  pub is_admin: Option<bool>,
}

/// `PUT /owners/{id}`
pub async fn update<S, G, M>(
  State(journal): State<Arc<Journal<S, G, M>>>,
  current: CurrentOwner,
  Path(id): Path<Uuid>,
  JsonBody(body): JsonBody<OwnerPatchBody>,
) -> Result<Json<Owner>, ApiError>
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  current.require_admin()?;
  let password_hash = match body.password.as_deref() {
    Some(p) if !p.is_empty() => Some(hash(p)?),
    _ => None,
  };
  let patch = OwnerPatch {
    name: body.name.map(|n| n.trim().to_owned()),
    password_hash,
    is_admin: body.is_admin,
  };
  Ok(Json(journal.update_owner(id, patch).await?))
}

/// `DELETE /owners/{id}`
pub async fn delete_one<S, G, M>(
  State(journal): State<Arc<Journal<S, G, M>>>,
  current: CurrentOwner,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  current.require_admin()?;
  journal.remove_owner(&current.0, id).await?;
  tracing::info!(%id, by = %current.0.name, "owner deleted");
  Ok(StatusCode::NO_CONTENT)
}
