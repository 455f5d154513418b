use std::fmt;
use std::io;

use derive_more::Display;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    InvalidInput(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg)
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Database row not found".into()),
            _ => AppError::InternalError(format!("Database error: {}", err))
        }
    }
}

/// Rejections from the extension / declared content-type checks.
#[derive(Debug, Display, PartialEq, Eq)]
pub enum ImageValidationError {
    #[display("Unsupported file extension: {_0:?}")]
    UnsupportedExtension(String),

    #[display("Unsupported content type: {_0:?}")]
    UnsupportedContentType(String),
}

impl std::error::Error for ImageValidationError {}

#[derive(Debug, Display)]
pub enum StorageError {
    #[display("Invalid file extension: {_0:?}")]
    InvalidExtension(String),

    #[display("Invalid storage location: {_0}")]
    InvalidLocation(String),

    #[display("Failed to write file: {_0}")]
    Io(io::Error),

    #[display("Object storage request failed: {_0}")]
    Backend(String),
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::Io(err)
    }
}

/// Closed set of upload failure codes. The HTTP layer switches on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadErrorCode {
    MissingProductId,
    InvalidForm,
    InvalidImage,
    NotFound,
    FileSaveFailed,
    DbError,
    Internal,
}

impl UploadErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadErrorCode::MissingProductId => "missing_product_id",
            UploadErrorCode::InvalidForm => "invalid_form",
            UploadErrorCode::InvalidImage => "invalid_image",
            UploadErrorCode::NotFound => "not_found",
            UploadErrorCode::FileSaveFailed => "file_save_failed",
            UploadErrorCode::DbError => "db_error",
            UploadErrorCode::Internal => "internal",
        }
    }
}

impl fmt::Display for UploadErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged failure returned by the upload workflows.
#[derive(Debug)]
pub struct UploadError {
    pub code: UploadErrorCode,
    pub message: String,
    pub cause: Option<anyhow::Error>,
}

impl UploadError {
    pub fn new(code: UploadErrorCode, message: impl Into<String>) -> Self {
        UploadError {
            code,
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<anyhow::Error>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn missing_product_id() -> Self {
        Self::new(UploadErrorCode::MissingProductId, "Product ID is required")
    }

    pub fn invalid_form(cause: impl Into<anyhow::Error>) -> Self {
        Self::new(UploadErrorCode::InvalidForm, "Invalid form data").with_cause(cause)
    }

    pub fn invalid_image(err: ImageValidationError) -> Self {
        Self::new(UploadErrorCode::InvalidImage, format!("Invalid image: {}", err)).with_cause(err)
    }

    pub fn not_found(cause: impl Into<anyhow::Error>) -> Self {
        Self::new(UploadErrorCode::NotFound, "Product not found").with_cause(cause)
    }

    pub fn file_save_failed(err: StorageError) -> Self {
        Self::new(UploadErrorCode::FileSaveFailed, "Failed to save image file").with_cause(err)
    }

    pub fn db_error(cause: impl Into<anyhow::Error>) -> Self {
        Self::new(UploadErrorCode::DbError, "Failed to update product image").with_cause(cause)
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {}: {}", self.code, self.message, cause),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for UploadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|cause| {
            let err: &(dyn std::error::Error + 'static) = &**cause;
            err
        })
    }
}

impl From<anyhow::Error> for UploadError {
    fn from(err: anyhow::Error) -> Self {
        UploadError::new(UploadErrorCode::Internal, "Unexpected error").with_cause(err)
    }
}
