pub mod cloudinary;

use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub use cloudinary::CloudinaryAssetStore;

/// Durable storage for rendered images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Persists `bytes` and returns the public URL they are served from.
    async fn upload(&self, bytes: &[u8]) -> Result<String>;
}

/// Image container detected from the leading bytes. Providers differ:
/// placeholders come back as PNG, stock photos as JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

/// An image written to local disk so it can be handed to an upload API.
/// Named by millisecond timestamp plus a random suffix, so concurrent
/// requests never share a file.
#[derive(Debug)]
pub struct StagedImage {
    path: PathBuf,
    format: Option<ImageFormat>,
}

impl StagedImage {
    pub async fn write(dir: &Path, bytes: &[u8]) -> Result<Self> {
        tokio::fs::create_dir_all(dir).await?;
        let format = ImageFormat::sniff(bytes);
        let extension = format.map(ImageFormat::extension).unwrap_or("bin");
        let path = dir.join(format!(
            "thumbnail-{}-{}.{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            extension
        ));
        tokio::fs::write(&path, bytes).await?;
        log::debug!("Staged {} bytes at {}", bytes.len(), path.display());
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when the bytes are not a recognised image container.
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// Removes the staged file. Errors are logged, never returned.
    pub async fn discard(self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            log::warn!(
                "Failed to remove staged image {}: {}",
                self.path.display(),
                e
            );
        }
    }
}
