//! HTTP Basic auth against the owners table.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use growlog_core::{
  Journal, guide::GuideGenerator, media::MediaStore, owner::Owner,
  store::PlantStore,
};
use rand_core::OsRng;

use crate::error::ApiError;

/// The authenticated owner making the request.
pub struct CurrentOwner(pub Owner);

impl CurrentOwner {
  pub fn require_admin(&self) -> Result<(), ApiError> {
    if self.0.is_admin {
      Ok(())
    } else {
      Err(ApiError::Forbidden("administrator access required".into()))
    }
  }
}

/// Hash `password` into an argon2 PHC string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)?
      .to_string(),
  )
}

/// Check `password` against a stored PHC string.
pub fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc)
    .and_then(|hash| Argon2::default().verify_password(password.as_bytes(), &hash))
    .is_ok()
}

/// Decode `Authorization: Basic …` into a name and password.
fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), ApiError> {
  let encoded = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Basic "))
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded.trim()).map_err(|_| ApiError::Unauthorized)?;
  let creds = String::from_utf8(decoded).map_err(|_| ApiError::Unauthorized)?;
  let (name, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;
  Ok((name.to_owned(), password.to_owned()))
}

impl<S, G, M> FromRequestParts<Arc<Journal<S, G, M>>> for CurrentOwner
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    journal: &Arc<Journal<S, G, M>>,
  ) -> Result<Self, Self::Rejection> {
    let (name, password) = basic_credentials(&parts.headers)?;

    let owner = journal
      .store()
      .find_owner_by_name(name)
      .await
      .map_err(growlog_core::Error::store)?
      .ok_or(ApiError::Unauthorized)?;

    if !verify_password(&password, &owner.password_hash) {
      tracing::debug!(owner = %owner.name, "rejected credentials");
      return Err(ApiError::Unauthorized);
    }
    Ok(CurrentOwner(owner))
  }
}
