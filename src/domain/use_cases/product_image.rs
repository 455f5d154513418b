use actix_multipart::Multipart;
use actix_web::http::header::CONTENT_TYPE;
use anyhow::anyhow;
use futures_util::StreamExt;
use tempfile::NamedTempFile;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::instrument;

use crate::{
    constants::{IMAGE_FIELD, PRODUCT_IMAGE_DESTINATION},
    domain::image::validate_image,
    entities::{product::UpdateProductImageUrlParams, upload::UploadedFile},
    errors::UploadError,
    repositories::{product::ProductRepository, storage::StorageBackend},
};

/// Turns multipart image uploads into stored files and, for existing
/// products, a new `image_url`.
///
/// Failures come back as [`UploadError`]s; logging is left to the caller.
pub struct ProductImageHandler<R, S>
where
    R: ProductRepository,
    S: StorageBackend,
{
    pub product_repo: R,
    pub storage: S,
}

impl<R, S> ProductImageHandler<R, S>
where
    R: ProductRepository,
    S: StorageBackend,
{
    pub fn new(product_repo: R, storage: S) -> Self {
        ProductImageHandler {
            product_repo,
            storage,
        }
    }

    /// Stores a new product image and returns its public URL.
    #[instrument(skip(self, form), fields(storage = %self.storage.kind()))]
    pub async fn upload_product_image(
        &self,
        user_id: &str,
        form: Multipart,
    ) -> Result<String, UploadError> {
        let file = read_image_field(form).await?;
        validate_image(&file.file_name, &file.content_type).map_err(UploadError::invalid_image)?;

        let location = self
            .storage
            .save(&file, PRODUCT_IMAGE_DESTINATION)
            .await
            .map_err(UploadError::file_save_failed)?;

        Ok(self.storage.public_url(&location))
    }

    /// Replaces the image of an existing product and returns the new URL.
    ///
    /// The old image is removed before the new one is saved and a failed
    /// removal does not stop the update. None of the three steps roll back.
    #[instrument(skip(self, form), fields(storage = %self.storage.kind()))]
    pub async fn update_product_image(
        &self,
        product_id: &str,
        user_id: &str,
        form: Multipart,
    ) -> Result<String, UploadError> {
        let product = self
            .product_repo
            .get_product_by_id(product_id)
            .await
            .map_err(UploadError::not_found)?;

        let file = read_image_field(form).await?;
        validate_image(&file.file_name, &file.content_type).map_err(UploadError::invalid_image)?;

        if let Some(old_url) = product.current_image_url() {
            let _ = self.storage.delete(old_url, PRODUCT_IMAGE_DESTINATION).await;
        }

        let location = self
            .storage
            .save(&file, PRODUCT_IMAGE_DESTINATION)
            .await
            .map_err(UploadError::file_save_failed)?;
        let image_url = self.storage.public_url(&location);

        let params = UpdateProductImageUrlParams::new(&product.id, &image_url);
        self.product_repo
            .update_product_image_url(&params)
            .await
            .map_err(UploadError::db_error)?;

        Ok(image_url)
    }
}

/// Reads the whole multipart body and spools the first `image` file field.
///
/// Other fields are drained so that a body-size overflow anywhere in the
/// request still fails the form.
async fn read_image_field(mut form: Multipart) -> Result<UploadedFile, UploadError> {
    let mut image: Option<UploadedFile> = None;

    while let Some(item) = form.next().await {
        let mut field = item.map_err(|e| UploadError::invalid_form(anyhow!("{}", e)))?;

        if image.is_some() || field.name() != Some(IMAGE_FIELD) {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| UploadError::invalid_form(anyhow!("{}", e)))?;
            }
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string)
            .ok_or_else(|| UploadError::invalid_form(anyhow!("field '{}' is not a file", IMAGE_FIELD)))?;

        let content_type = field
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let content = NamedTempFile::new().map_err(anyhow::Error::from)?;
        let mut writer = File::from_std(content.as_file().try_clone().map_err(anyhow::Error::from)?);
        let mut size = 0u64;

        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| UploadError::invalid_form(anyhow!("{}", e)))?;
            writer.write_all(&chunk).await.map_err(anyhow::Error::from)?;
            size += chunk.len() as u64;
        }
        writer.flush().await.map_err(anyhow::Error::from)?;

        image = Some(UploadedFile::new(content, file_name, content_type, size));
    }

    image.ok_or_else(|| UploadError::invalid_form(anyhow!("missing '{}' file field", IMAGE_FIELD)))
}
