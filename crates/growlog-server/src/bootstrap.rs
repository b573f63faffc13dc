//! First-run account creation.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use growlog_api::auth::hash_password;
use growlog_core::{
  Journal, guide::GuideGenerator, media::MediaStore, owner::NewOwner,
  store::PlantStore,
};
use rand_core::{OsRng, RngCore as _};

use crate::error::{Error, Result};

pub const ADMIN_NAME: &str = "admin";

/// Credentials of a freshly created account, shown to the operator once.
#[derive(Debug, Clone)]
pub struct InitialCredentials {
  pub name:     String,
  pub password: String,
}

pub fn random_password() -> String {
  let mut bytes = [0u8; 18];
  OsRng.fill_bytes(&mut bytes);
  URL_SAFE_NO_PAD.encode(bytes)
}

/// Create an `admin` account with a random password if no owner exists yet.
pub async fn bootstrap_admin<S, G, M>(
  journal: &Journal<S, G, M>,
) -> Result<Option<InitialCredentials>>
where
  S: PlantStore,
  G: GuideGenerator,
  M: MediaStore,
{
  let count = journal
    .store()
    .count_owners()
    .await
    .map_err(growlog_core::Error::store)?;
  if count > 0 {
    return Ok(None);
  }

  let password = random_password();
  let password_hash = hash_password(&password).map_err(|e| Error::Hash(e.to_string()))?;
  journal
    .register_owner(NewOwner {
      name: ADMIN_NAME.to_owned(),
      password_hash,
      is_admin: true,
    })
    .await?;

  tracing::info!(owner = ADMIN_NAME, "created initial admin account");
  Ok(Some(InitialCredentials { name: ADMIN_NAME.to_owned(), password }))
}
