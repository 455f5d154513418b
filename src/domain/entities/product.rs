use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// ───── Domain Models ────────────────────────────────────────────────

/// The slice of a product the image workflows care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub image_url: Option<String>,
}

impl Product {
    /// Current image URL, ignoring NULL and empty values.
    pub fn current_image_url(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|url| !url.is_empty())
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id.to_string(),
            image_url: row.image_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProductImageUrlParams {
    pub id: String,
    pub image_url: String,
    pub updated_at: DateTime<Utc>,
}

impl UpdateProductImageUrlParams {
    pub fn new(id: &str, image_url: &str) -> Self {
        UpdateProductImageUrlParams {
            id: id.to_string(),
            image_url: image_url.to_string(),
            updated_at: Utc::now(),
        }
    }
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ImageUploadResponse {
    pub message: String,
    pub image_url: String,
}

impl ImageUploadResponse {
    pub fn new(message: &str, image_url: String) -> Self {
        ImageUploadResponse {
            message: message.to_string(),
            image_url,
        }
    }
}
