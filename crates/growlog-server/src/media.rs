//! Photo storage on the local filesystem.

use std::{
  future::Future,
  io::ErrorKind,
  path::{Path, PathBuf},
};

use growlog_core::{
  fact::MediaRef,
  media::{MediaStore, PhotoUpload},
};
use sha2::{Digest, Sha256};
use tokio::{fs, io::AsyncWriteExt as _};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Writes photos as flat files under one directory. The stored path is the
/// bare file name, relative to that directory.
#[derive(Debug, Clone)]
pub struct DiskMediaStore {
  root: PathBuf,
}

impl DiskMediaStore {
  /// Use `root`, creating it if needed.
  pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
    let root = root.into();
    fs::create_dir_all(&root).await?;
    Ok(Self { root })
  }

  pub fn root(&self) -> &Path { &self.root }

  fn resolve(&self, relative: &str) -> Result<PathBuf> {
    if relative.is_empty()
      || relative.starts_with('.')
      || relative.contains(['/', '\\'])
    {
      return Err(Error::UnsafePath(relative.to_owned()));
    }
    Ok(self.root.join(relative))
  }

  /// Write `bytes` to a new file, never replacing an existing one.
  async fn write_new(&self, name: &str, bytes: &[u8]) -> Result<bool> {
    let path = self.resolve(name)?;
    let file = fs::OpenOptions::new()
      .write(true)
      .create_new(true)
      .open(&path)
      .await;
    let mut file = match file {
      Ok(f) => f,
      Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
      Err(e) => return Err(e.into()),
    };
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(true)
  }

  async fn store(&self, plant_id: Uuid, position: u32, upload: PhotoUpload) -> Result<MediaRef> {
    let filename = sanitize_filename(&upload.filename);
    let mut name = format!("plant_{plant_id}_fact_{position}_{filename}");

    // Positions shift when facts move, so an older photo may already hold
    // this name.
    if !self.write_new(&name, &upload.bytes).await? {
      let tag = Uuid::new_v4().simple().to_string();
      name = format!("plant_{plant_id}_fact_{position}_{}_{filename}", &tag[..8]);
      if !self.write_new(&name, &upload.bytes).await? {
        return Err(Error::Io(ErrorKind::AlreadyExists.into()));
      }
    }

    let media_type = upload
      .content_type
      .filter(|ct| !ct.trim().is_empty())
      .unwrap_or_else(|| guess_media_type(&filename).to_owned());

    tracing::debug!(path = %name, bytes = upload.bytes.len(), "stored photo");
    Ok(MediaRef {
      path: name,
      content_hash: hex::encode(Sha256::digest(&upload.bytes)),
      media_type,
    })
  }

  async fn delete(&self, media: &MediaRef) -> Result<()> {
    match fs::remove_file(self.resolve(&media.path)?).await {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}

impl MediaStore for DiskMediaStore {
  type Error = Error;

  fn save(
    &self,
    plant_id: Uuid,
    position: u32,
    upload: PhotoUpload,
  ) -> impl Future<Output = Result<MediaRef, Self::Error>> + Send + '_ {
    self.store(plant_id, position, upload)
  }

  fn remove<'a>(
    &'a self,
    media: &'a MediaRef,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a {
    self.delete(media)
  }
}

/// Reduce a client file name to a safe single path component.
pub fn sanitize_filename(raw: &str) -> String {
  let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
  let cleaned: String = base
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
        c
      } else {
        '_'
      }
    })
    .collect();
  let cleaned = cleaned.trim_start_matches('.');
  if cleaned.is_empty() {
    "upload".to_owned()
  } else {
    cleaned.to_owned()
  }
}

fn guess_media_type(filename: &str) -> &'static str {
  let ext = filename
    .rsplit_once('.')
    .map(|(_, ext)| ext.to_ascii_lowercase())
    .unwrap_or_default();
  match ext.as_str() {
    "jpg" | "jpeg" => "image/jpeg",
    "png" => "image/png",
    "gif" => "image/gif",
    "webp" => "image/webp",
    "heic" => "image/heic",
    _ => "application/octet-stream",
  }
}
