use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

pub const IMAGE_PREFIX: &str = "images/";

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("invalid blob key `{0}`")]
    InvalidKey(String),
    #[error("blob io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("blob metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Key-addressed binary storage for uploaded images.
#[axum::async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), BlobError>;

    async fn get(&self, key: &str) -> Result<Option<StoredBlob>, BlobError>;

    /// Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), BlobError>;

    async fn exists(&self, key: &str) -> Result<bool, BlobError> {
        Ok(self.get(key).await?.is_some())
    }
}

/// Blob key for an uploaded image file name.
pub fn image_key(filename: &str) -> String {
    format!("{IMAGE_PREFIX}{filename}")
}

/// Rejects names that could escape the image namespace.
pub fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains("..")
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.contains('\0')
}

fn validate_key(key: &str) -> Result<(), BlobError> {
    let valid = !key.is_empty()
        && !key.starts_with('/')
        && key
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
        && !key.contains('\\')
        && !key.contains('\0');
    if valid {
        Ok(())
    } else {
        Err(BlobError::InvalidKey(key.to_owned()))
    }
}

// ----------------- Filesystem Store -----------------

#[derive(Debug, Serialize, Deserialize)]
struct BlobMetadata {
    content_type: String,
}

/// Stores each blob as a file under `root`, with its content type in a
/// `<file>.meta.json` sidecar.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn paths(&self, key: &str) -> Result<(PathBuf, PathBuf), BlobError> {
        validate_key(key)?;
        let data = self.root.join(key);
        let meta = self.root.join(format!("{key}.meta.json"));
        Ok((data, meta))
    }
}

async fn remove_if_exists(path: &Path) -> Result<(), BlobError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[axum::async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), BlobError> {
        let (data, meta) = self.paths(key)?;
        if let Some(parent) = data.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let metadata = serde_json::to_vec(&BlobMetadata {
            content_type: content_type.to_owned(),
        })?;
        tokio::fs::write(&data, &bytes).await?;
        tokio::fs::write(&meta, metadata).await?;
        tracing::debug!(key, size = bytes.len(), "stored blob");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredBlob>, BlobError> {
        let (data, meta) = self.paths(key)?;
        let bytes = match tokio::fs::read(&data).await {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let content_type = match tokio::fs::read(&meta).await {
            Ok(raw) => Some(serde_json::from_slice::<BlobMetadata>(&raw)?.content_type),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(Some(StoredBlob {
            bytes,
            content_type,
        }))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        let (data, meta) = self.paths(key)?;
        remove_if_exists(&data).await?;
        remove_if_exists(&meta).await?;
        tracing::debug!(key, "deleted blob");
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, BlobError> {
        let (data, _) = self.paths(key)?;
        Ok(tokio::fs::try_exists(&data).await?)
    }
}

// ----------------- In-Memory Store -----------------

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, StoredBlob>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[axum::async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<(), BlobError> {
        validate_key(key)?;
        self.blobs.write().await.insert(
            key.to_owned(),
            StoredBlob {
                bytes,
                content_type: Some(content_type.to_owned()),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredBlob>, BlobError> {
        validate_key(key)?;
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        validate_key(key)?;
        self.blobs.write().await.remove(key);
        Ok(())
    }
}
