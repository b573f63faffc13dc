//! growlog server: configuration, photo storage, first-run setup, and the
//! composed HTTP application.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod media;

use std::{path::Path, sync::Arc};

use axum::Router;
use growlog_core::{
  Journal, guide::GuideGenerator, media::MediaStore, store::PlantStore,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use media::DiskMediaStore;

/// The full application: the JSON API under `/api` and stored photos under
/// `/uploads`.
pub fn app<S, G, M>(
  journal: Arc<Journal<S, G, M>>,
  media_dir: &Path,
  max_upload_bytes: usize,
) -> Router
where
  S: PlantStore + 'static,
  G: GuideGenerator + 'static,
  M: MediaStore + 'static,
{
  Router::new()
    .nest("/api", growlog_api::api_router(journal, max_upload_bytes))
    .nest_service("/uploads", ServeDir::new(media_dir))
    .layer(TraceLayer::new_for_http())
}
