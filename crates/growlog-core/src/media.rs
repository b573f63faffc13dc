//! The `MediaStore` trait, where uploaded photos live.

use std::future::Future;

use uuid::Uuid;

use crate::fact::MediaRef;

/// An uploaded image as received from a client.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
  /// Client-supplied file name; implementations must sanitise it.
  pub filename:     String,
  pub content_type: Option<String>,
  pub bytes:        Vec<u8>,
}

/// Persistence for photo bytes. The database only keeps the returned
/// [`MediaRef`].
pub trait MediaStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store `upload` under a name derived from `plant_id` and the `position`
  /// the photo fact will take.
  fn save(
    &self,
    plant_id: Uuid,
    position: u32,
    upload: PhotoUpload,
  ) -> impl Future<Output = Result<MediaRef, Self::Error>> + Send + '_;

  /// Remove stored bytes. Removing something already gone is not an error.
  fn remove<'a>(
    &'a self,
    media: &'a MediaRef,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
