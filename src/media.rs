//! Uploaded images, stored on disk under the media root.

use entity::problems::HintKind;
use std::{
    io,
    path::{Component, Path, PathBuf},
};
use uuid::Uuid;

pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Problems,
    Hint(HintKind),
    Questions,
}

impl MediaCategory {
    pub fn directory(&self) -> &'static str {
        match self {
            Self::Problems => "problems",
            Self::Hint(HintKind::Approach) => "hints/approach",
            Self::Hint(HintKind::Formula) => "hints/formula",
            Self::Hint(HintKind::Technique) => "hints/technique",
            Self::Questions => "questions",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("file extension is not one of jpg, jpeg, png, gif or webp")]
    UnsupportedExtension,
    #[error("file content is not a supported image")]
    UnsupportedContent,
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

fn sniff(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(ImageFormat::Jpeg)
    } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some(ImageFormat::Png)
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some(ImageFormat::Gif)
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some(ImageFormat::Webp)
    } else {
        None
    }
}

fn format_of_extension(extension: &str) -> Option<ImageFormat> {
    match extension {
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        "png" => Some(ImageFormat::Png),
        "gif" => Some(ImageFormat::Gif),
        "webp" => Some(ImageFormat::Webp),
        _ => None,
    }
}

/// Checks an upload and returns the lowercase extension it will be stored
/// with.
pub fn check_image(file_name: &str, bytes: &[u8]) -> Result<String, MediaError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or(MediaError::UnsupportedExtension)?;

    let Some(expected) = format_of_extension(&extension) else {
        return Err(MediaError::UnsupportedExtension);
    };

    if sniff(bytes) != Some(expected) {
        return Err(MediaError::UnsupportedContent);
    }

    Ok(extension)
}

pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the image and returns its path relative to the media root.
    pub async fn store(
        &self,
        category: MediaCategory,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, MediaError> {
        let extension = check_image(file_name, bytes)?;
        let directory = self.root.join(category.directory());

        tokio::fs::create_dir_all(&directory).await?;

        let name = format!("{}.{}", Uuid::new_v4().simple(), extension);
        tokio::fs::write(directory.join(&name), bytes).await?;

        Ok(format!("{}/{}", category.directory(), name))
    }

    /// Best effort removal of a stored file; failures are only logged.
    pub async fn remove(&self, relative: &str) {
        let path = Path::new(relative);

        if path
            .components()
            .any(|component| !matches!(component, Component::Normal(_)))
        {
            warn!("refusing to remove media outside the media root: {relative}");
            return;
        }

        if let Err(error) = tokio::fs::remove_file(self.root.join(path)).await {
            if error.kind() != io::ErrorKind::NotFound {
                warn!("failed to remove media file {relative}: {error}");
            }
        }
    }
}
