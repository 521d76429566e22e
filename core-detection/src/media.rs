//! Local media inspection
//!
//! Validates a file against the fixed table of supported extensions and size
//! ceilings and loads it for upload. Nothing here is negotiated with the
//! service.

use bridge_traits::storage::FileSystemAccess;
use bytes::Bytes;
use core_runtime::logging::strip_path;
use std::path::Path;
use tracing::debug;

use crate::error::{DetectionError, Result};

const MIB: u64 = 1024 * 1024;

/// Extensions sharing one size ceiling.
#[derive(Debug, Clone, Copy)]
pub struct FileCategory {
    pub extensions: &'static [&'static str],
    pub size_limit: u64,
}

pub const SUPPORTED_FILE_TYPES: &[FileCategory] = &[
    FileCategory {
        extensions: &[".mp4", ".mov"],
        size_limit: 250 * MIB,
    },
    FileCategory {
        extensions: &[".jpg", ".png", ".jpeg", ".gif", ".webp"],
        size_limit: 50 * MIB,
    },
    FileCategory {
        extensions: &[".flac", ".wav", ".mp3", ".m4a", ".aac", ".alac", ".ogg"],
        size_limit: 20 * MIB,
    },
    FileCategory {
        extensions: &[".txt"],
        size_limit: 5 * MIB,
    },
];

const MIME_TYPES: &[(&str, &str)] = &[
    (".mp4", "video/mp4"),
    (".mov", "video/quicktime"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".png", "image/png"),
    (".gif", "image/gif"),
    (".webp", "image/webp"),
    (".flac", "audio/flac"),
    (".wav", "audio/x-wav"),
    (".mp3", "audio/mpeg"),
    (".m4a", "audio/mp4"),
    (".aac", "audio/aac"),
    (".ogg", "audio/ogg"),
    (".txt", "text/plain"),
];

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A validated file, ready to upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub file_name: String,
    pub content: Bytes,
    pub content_type: String,
}

/// Lower-cased extension including the dot, or `""` if there is none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// Final path component, the name the service sees.
pub fn file_name_of(path: &str) -> String {
    strip_path(path).to_string()
}

/// Size ceiling for an extension such as `".mp4"`.
pub fn size_limit_for(extension: &str) -> Option<u64> {
    let extension = extension.to_lowercase();
    SUPPORTED_FILE_TYPES
        .iter()
        .find(|category| category.extensions.contains(&extension.as_str()))
        .map(|category| category.size_limit)
}

pub fn mime_type_for(extension: &str) -> &'static str {
    let extension = extension.to_lowercase();
    MIME_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_MIME_TYPE)
}

/// Validate `path` and read its content.
///
/// # Errors
///
/// - `invalid_file` if the path is not a regular file, has an unsupported
///   extension or cannot be read
/// - `file_too_large` if it exceeds its category's ceiling
pub async fn inspect(file_system: &dyn FileSystemAccess, path: &str) -> Result<MediaFile> {
    let fs_path = Path::new(path);

    let is_file = file_system.is_file(fs_path).await.unwrap_or(false);
    if !is_file {
        return Err(DetectionError::invalid_file(format!(
            "File not found: {}",
            path
        )));
    }

    let extension = extension_of(fs_path);
    let size_limit = size_limit_for(&extension).ok_or_else(|| {
        DetectionError::invalid_file(format!("Unsupported file type: {}", extension))
    })?;

    let metadata = file_system
        .metadata(fs_path)
        .await
        .map_err(|e| DetectionError::invalid_file(format!("Error reading file: {}", e)))?;
    if metadata.size > size_limit {
        return Err(DetectionError::file_too_large(format!(
            "File too large to upload: {}",
            path
        )));
    }

    let content = file_system
        .read_file(fs_path)
        .await
        .map_err(|e| DetectionError::invalid_file(format!("Error reading file: {}", e)))?;

    debug!(
        file = %strip_path(path),
        size = metadata.size,
        "Media file validated"
    );

    Ok(MediaFile {
        file_name: file_name_of(path),
        content,
        content_type: mime_type_for(&extension).to_string(),
    })
}
