use std::path::PathBuf;

use common::database::Ulid;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to write file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AcceptedFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
    Avif,
}

impl AcceptedFormat {
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            "image/avif" => Some(Self::Avif),
            _ => None,
        }
    }

    pub const fn ext(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Avif => "avif",
        }
    }
}

/// Disk-backed file storage for uploaded images. Files are named by a fresh
/// ULID so the returned path never collides; the path is relative to the
/// store root and is what gets persisted on the owning row.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub async fn store(
        &self,
        data: &[u8],
        folder: &str,
        content_type: &str,
    ) -> Result<String, UploadError> {
        let format = AcceptedFormat::from_content_type(content_type)
            .ok_or_else(|| UploadError::UnsupportedFormat(content_type.to_string()))?;

        let name = format!("{}.{}", Ulid::new(), format.ext());

        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&name), data).await?;

        Ok(format!("{folder}/{name}"))
    }
}
