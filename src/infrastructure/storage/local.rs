use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
    time::Instant,
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use uuid::Uuid;

use crate::{
    constants::STATIC_URL_PREFIX,
    domain::image::image_extension,
    entities::upload::UploadedFile,
    errors::StorageError,
    repositories::storage::{StorageBackend, StorageKind},
};

/// Stores images in a directory on the local filesystem, served under `/static/`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    upload_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        LocalStorage {
            upload_dir: upload_dir.into(),
        }
    }

    fn generate_file_name(ext: &str) -> String {
        format!("{}_{}{}", Uuid::new_v4().simple(), Utc::now().timestamp(), ext)
    }

    /// Maps `/static/<name>` onto a path inside the upload directory.
    fn path_for_url(&self, url: &str) -> Result<PathBuf, StorageError> {
        let name = url
            .strip_prefix(STATIC_URL_PREFIX)
            .ok_or_else(|| StorageError::InvalidLocation(url.to_string()))?;

        // Exactly one plain file name; no separators or dot segments.
        let mut parts = Path::new(name).components();
        match (parts.next(), parts.next()) {
            (Some(Component::Normal(_)), None) if !name.ends_with(['/', '\\']) => {
                Ok(self.upload_dir.join(name))
            }
            _ => Err(StorageError::InvalidLocation(url.to_string())),
        }
    }
}

#[async_trait]
impl StorageBackend for LocalStorage {
    async fn save(&self, file: &UploadedFile, destination: &str) -> Result<String, StorageError> {
        let start = Instant::now();

        fs::create_dir_all(&self.upload_dir).await?;

        let path = self
            .upload_dir
            .join(Self::generate_file_name(&image_extension(&file.file_name)));

        let mut target = fs::File::create(&path).await?;
        let copied = async {
            let mut source = file.rewound().await?;
            let written = tokio::io::copy(&mut source, &mut target).await?;
            target.sync_all().await?;
            Ok::<u64, std::io::Error>(written)
        }
        .await;

        let written = match copied {
            Ok(written) => written,
            Err(e) => {
                drop(target);
                let _ = fs::remove_file(&path).await;
                return Err(e.into());
            }
        };

        let absolute = fs::canonicalize(&path).await?;

        tracing::info!(
            path = %absolute.display(),
            destination,
            size_bytes = written,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage save successful"
        );

        Ok(absolute.to_string_lossy().into_owned())
    }

    async fn delete(&self, location: &str, destination: &str) -> Result<(), StorageError> {
        if location.is_empty() {
            return Ok(());
        }

        let path = self.path_for_url(location)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), destination, "Local storage delete successful");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, location: &str) -> String {
        let name = Path::new(location)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}{}", STATIC_URL_PREFIX, name)
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn png(bytes: &[u8]) -> UploadedFile {
        UploadedFile::from_bytes("Product Shot.PNG", "image/png", bytes).await.unwrap()
    }

    #[actix_rt::test]
    async fn save_writes_the_whole_file_and_returns_an_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("uploads"));
        let upload = png(b"not really a png").await;

        let location = storage.save(&upload, "products").await.unwrap();

        let path = Path::new(&location);
        assert!(path.is_absolute());
        assert!(location.ends_with(".png"));
        assert_eq!(std::fs::read(path).unwrap(), b"not really a png");
    }

    #[actix_rt::test]
    async fn save_generates_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let upload = png(b"x").await;

        let first = storage.save(&upload, "products").await.unwrap();
        let second = storage.save(&upload, "products").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read(&second).unwrap(), b"x");
    }

    #[actix_rt::test]
    async fn save_fails_when_upload_dir_cannot_be_created() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("occupied");
        std::fs::write(&blocker, b"file, not dir").unwrap();
        let storage = LocalStorage::new(blocker.join("uploads"));

        let result = storage.save(&png(b"x").await, "products").await;

        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[actix_rt::test]
    async fn public_url_uses_the_basename() {
        let storage = LocalStorage::new("/srv/uploads");
        assert_eq!(storage.public_url("/srv/uploads/abc_1.png"), "/static/abc_1.png");
    }

    #[actix_rt::test]
    async fn delete_removes_a_saved_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let location = storage.save(&png(b"x").await, "products").await.unwrap();
        let url = storage.public_url(&location);

        storage.delete(&url, "products").await.unwrap();

        assert!(!Path::new(&location).exists());
    }

    #[actix_rt::test]
    async fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        assert!(storage.delete("", "products").await.is_ok());
        assert!(storage.delete("/static/missing.png", "products").await.is_ok());
        assert!(storage.delete("/static/missing.png", "products").await.is_ok());
    }

    #[actix_rt::test]
    async fn delete_accepts_flat_names_containing_double_dots() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let path = dir.path().join("shoe..v2.png");
        std::fs::write(&path, b"x").unwrap();

        storage.delete("/static/shoe..v2.png", "products").await.unwrap();

        assert!(!path.exists());
    }

    #[actix_rt::test]
    async fn delete_rejects_urls_outside_static() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        for url in [
            "/uploads/a.png",
            "static/a.png",
            "https://bucket.s3.amazonaws.com/uploads/a.png",
            "/static/",
            "/static/../secret",
            "/static/nested/a.png",
            "/static/..",
            "/static/.",
            "/static/a.png/",
        ] {
            assert!(
                matches!(storage.delete(url, "products").await, Err(StorageError::InvalidLocation(_))),
                "{url} should be rejected"
            );
        }
    }
}
