use std::path::Path;

use crate::{
    constants::{ALLOWED_IMAGE_EXTENSIONS, ALLOWED_IMAGE_MIME_TYPES},
    errors::ImageValidationError,
};

/// Lower-cased extension of `file_name` including the leading dot, or an
/// empty string when there is none.
pub fn image_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

pub fn is_allowed_extension(ext: &str) -> bool {
    ALLOWED_IMAGE_EXTENSIONS.contains(&ext)
}

/// Checks the declared file name and content type of an uploaded image.
///
/// The content type is the value the client sent; the file bytes are not
/// inspected.
pub fn validate_image(file_name: &str, content_type: &str) -> Result<(), ImageValidationError> {
    let ext = image_extension(file_name);
    if !is_allowed_extension(&ext) {
        return Err(ImageValidationError::UnsupportedExtension(ext));
    }

    if !ALLOWED_IMAGE_MIME_TYPES.contains(&content_type) {
        return Err(ImageValidationError::UnsupportedContentType(content_type.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_allowed_pair() {
        let cases = [
            ("photo.jpg", "image/jpeg"),
            ("photo.JPEG", "image/jpeg"),
            ("logo.png", "image/png"),
            ("anim.gif", "image/gif"),
            ("hero.WebP", "image/webp"),
        ];
        for (name, mime) in cases {
            assert_eq!(validate_image(name, mime), Ok(()), "{name} / {mime}");
        }
    }

    #[test]
    fn rejects_unlisted_extensions_whatever_the_content_type() {
        for name in ["doc.pdf", "script.exe", "image.bmp", "noext", "archive.png.zip", ".png"] {
            for mime in ALLOWED_IMAGE_MIME_TYPES {
                assert!(
                    matches!(
                        validate_image(name, mime),
                        Err(ImageValidationError::UnsupportedExtension(_))
                    ),
                    "{name} should be rejected"
                );
            }
        }
    }

    #[test]
    fn rejects_unlisted_content_types_even_with_allowed_extension() {
        for mime in ["image/bmp", "text/plain", "application/octet-stream", "", "IMAGE/PNG", "image/png; charset=utf-8"] {
            assert_eq!(
                validate_image("photo.png", mime),
                Err(ImageValidationError::UnsupportedContentType(mime.to_string()))
            );
        }
    }

    #[test]
    fn content_type_is_not_cross_checked_against_extension() {
        assert_eq!(validate_image("photo.png", "image/gif"), Ok(()));
    }

    #[test]
    fn extension_is_lowercased_with_dot() {
        assert_eq!(image_extension("A.JPG"), ".jpg");
        assert_eq!(image_extension("plain"), "");
    }
}
