use std::fmt;

use async_trait::async_trait;

use crate::{entities::upload::UploadedFile, errors::StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Local,
    S3,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Local => write!(f, "local"),
            StorageKind::S3 => write!(f, "s3"),
        }
    }
}

/// Where uploaded images are persisted.
///
/// `destination` is the logical folder the caller files the object under
/// (e.g. `"products"`); backends keep their own key layout.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Persists the file and returns its location identifier
    async fn save(&self, file: &UploadedFile, destination: &str) -> Result<String, StorageError>;

    /// Removes a previously stored file, addressed by its public URL
    async fn delete(&self, location: &str, destination: &str) -> Result<(), StorageError>;

    /// Public URL for a location returned by `save`
    fn public_url(&self, location: &str) -> String;

    fn kind(&self) -> StorageKind;
}
