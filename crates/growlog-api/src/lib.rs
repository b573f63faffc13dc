//! JSON REST API for growlog.
//!
//! Exposes an axum [`Router`] backed by a [`Journal`]. Every route requires
//! HTTP Basic auth against the owners table; TLS and static media serving
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", growlog_api::api_router(journal.clone(), DEFAULT_MAX_UPLOAD_BYTES))
//! ```

pub mod auth;
pub mod error;
pub mod facts;
pub mod json;
pub mod owners;
pub mod plants;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post, put},
};
use growlog_core::{
  Journal, guide::GuideGenerator, media::MediaStore, store::PlantStore,
};

pub use error::ApiError;

/// Upload limit for fact submissions when none is configured.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Build the API router for `journal`.
///
/// Fact submissions (which carry photo uploads) may be up to
/// `max_upload_bytes` long; other routes keep axum's default body limit.
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, G, M>(
  journal: Arc<Journal<S, G, M>>,
  max_upload_bytes: usize,
) -> Router<()>
where
  S: PlantStore + 'static,
  G: GuideGenerator + 'static,
  M: MediaStore + 'static,
{
  Router::new()
    .route("/me", get(owners::me))
    // Plants
    .route("/plants", get(plants::list::<S, G, M>).post(plants::create::<S, G, M>))
    .route(
      "/plants/{id}",
      get(plants::get_one::<S, G, M>)
        .put(plants::update::<S, G, M>)
        .delete(plants::delete_one::<S, G, M>),
    )
    .route(
      "/plants/{id}/facts",
      post(facts::create::<S, G, M>).layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
    .route("/plants/{id}/guidelines", post(plants::generate::<S, G, M>))
    // Facts
    .route(
      "/facts/{id}",
      get(facts::get_one::<S, G, M>)
        .put(facts::update::<S, G, M>)
        .delete(facts::delete_one::<S, G, M>),
    )
    .route("/facts/{id}/move", post(facts::move_one::<S, G, M>))
    // Owners
    .route("/owners", get(owners::list::<S, G, M>).post(owners::create::<S, G, M>))
    .route(
      "/owners/{id}",
      put(owners::update::<S, G, M>).delete(owners::delete_one::<S, G, M>),
    )
    .with_state(journal)
}

#[cfg(test)]
mod tests;
