use std::io::{self, SeekFrom};

use tempfile::NamedTempFile;
use tokio::{fs::File, io::{AsyncSeekExt, AsyncWriteExt}};

/// An image received in a multipart request, spooled to a temporary file.
///
/// The temp file is removed when the value is dropped.
#[derive(Debug)]
pub struct UploadedFile {
    pub content: NamedTempFile,
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
}

impl UploadedFile {
    pub fn new(content: NamedTempFile, file_name: String, content_type: String, size: u64) -> Self {
        UploadedFile {
            content,
            file_name,
            content_type,
            size,
        }
    }

    /// Spools `bytes` into a fresh temp file.
    pub async fn from_bytes(file_name: &str, content_type: &str, bytes: &[u8]) -> io::Result<Self> {
        let content = NamedTempFile::new()?;
        let mut writer = File::from_std(content.as_file().try_clone()?);
        writer.write_all(bytes).await?;
        writer.flush().await?;

        Ok(UploadedFile::new(
            content,
            file_name.to_string(),
            content_type.to_string(),
            bytes.len() as u64,
        ))
    }

    /// Async handle on the content, rewound to the first byte.
    ///
    /// The handle shares its cursor with every other handle on the temp
    /// file, so earlier readers or writers may have left it anywhere.
    pub async fn rewound(&self) -> io::Result<File> {
        let mut file = File::from_std(self.content.as_file().try_clone()?);
        file.seek(SeekFrom::Start(0)).await?;
        Ok(file)
    }
}
