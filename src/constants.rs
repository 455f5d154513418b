use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Hard cap on an upload request body, multipart framing included.
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Multipart field that carries the image.
pub const IMAGE_FIELD: &str = "image";

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

pub const ALLOWED_IMAGE_MIME_TYPES: [&str; 4] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Public prefix under which locally stored images are served.
pub const STATIC_URL_PREFIX: &str = "/static/";

/// Key prefix for objects written to the bucket.
pub const S3_KEY_PREFIX: &str = "uploads/";

/// Logical folder passed to the storage backends for product images.
pub const PRODUCT_IMAGE_DESTINATION: &str = "products";
