use std::time::Instant;

use async_trait::async_trait;
use aws_config::{meta::region::RegionProviderChain, BehaviorVersion};
use aws_sdk_s3::{error::DisplayErrorContext, primitives::ByteStream, Client};
use chrono::Utc;
use url::Url;
use uuid::Uuid;

use crate::{
    constants::S3_KEY_PREFIX,
    domain::image::{image_extension, is_allowed_extension},
    entities::upload::UploadedFile,
    errors::StorageError,
    repositories::storage::{StorageBackend, StorageKind},
};

/// Stores images as objects in an S3 (or S3-compatible) bucket.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    endpoint_url: Option<String>,
}

impl S3Storage {
    /// Builds a client from the ambient AWS credential chain.
    ///
    /// `endpoint_url` switches to path-style addressing for S3-compatible
    /// providers such as MinIO.
    pub async fn new(bucket: String, region: String, endpoint_url: Option<String>) -> Self {
        let region_provider = RegionProviderChain::first_try(aws_config::Region::new(region));
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;

        let client = match endpoint_url.as_deref() {
            Some(endpoint) => {
                let conf = aws_sdk_s3::config::Builder::from(&shared)
                    .endpoint_url(endpoint)
                    .force_path_style(true)
                    .build();
                Client::from_conf(conf)
            }
            None => Client::new(&shared),
        };

        Self::with_client(client, bucket, endpoint_url)
    }

    pub fn with_client(client: Client, bucket: String, endpoint_url: Option<String>) -> Self {
        S3Storage {
            client,
            bucket,
            endpoint_url,
        }
    }

    fn generate_key(ext: &str) -> String {
        format!("{}{}_{}{}", S3_KEY_PREFIX, Uuid::new_v4().simple(), Utc::now().timestamp(), ext)
    }

    fn object_url(&self, key: &str) -> String {
        match self.endpoint_url.as_deref() {
            Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key),
            None => format!("https://{}.s3.amazonaws.com/{}", self.bucket, key),
        }
    }

    /// Recovers the object key from a URL produced by `save`.
    fn key_from_url(&self, location: &str) -> Result<String, StorageError> {
        let url = Url::parse(location)
            .map_err(|e| StorageError::InvalidLocation(format!("{}: {}", location, e)))?;

        let path = url.path();
        let mut key = path.strip_prefix('/').unwrap_or(path);

        // Path-style URLs carry the bucket as the first segment.
        if self.endpoint_url.is_some() {
            if let Some(rest) = key.strip_prefix(self.bucket.as_str()).and_then(|k| k.strip_prefix('/')) {
                key = rest;
            }
        }

        if key.is_empty() {
            return Err(StorageError::InvalidLocation(format!("{}: empty object key", location)));
        }

        Ok(key.to_string())
    }
}

#[async_trait]
impl StorageBackend for S3Storage {
    async fn save(&self, file: &UploadedFile, destination: &str) -> Result<String, StorageError> {
        let ext = image_extension(&file.file_name);
        if !is_allowed_extension(&ext) {
            return Err(StorageError::InvalidExtension(ext));
        }

        let key = Self::generate_key(&ext);
        let start = Instant::now();

        // Streams from the spooled temp file instead of buffering it.
        let body = ByteStream::from_path(file.content.path())
            .await
            .map_err(|e| StorageError::Backend(format!("failed to open upload for streaming: {}", e)))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(body)
            .content_type(&file.content_type)
            .send()
            .await
            .map_err(|e| StorageError::Backend(DisplayErrorContext(&e).to_string()))?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            destination,
            size_bytes = file.size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(self.object_url(&key))
    }

    async fn delete(&self, location: &str, destination: &str) -> Result<(), StorageError> {
        let key = self.key_from_url(location)?;
        let start = Instant::now();

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| StorageError::Backend(DisplayErrorContext(&e).to_string()))?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            destination,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    fn public_url(&self, location: &str) -> String {
        location.to_string()
    }

    fn kind(&self) -> StorageKind {
        StorageKind::S3
    }
}
