use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{MediaSortError, Result};
use crate::media::{self, Category};
use crate::metadata::{ContainerBackend, ContainerMetadata, StreamKind};

/// Where a file belongs before collisions are taken into account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalLocation {
    pub category: Category,
    /// `YYYY/MM/DD`
    pub date_subpath: PathBuf,
    /// `YYYY-MM-DD_HH-MM-SS`
    pub base_name: String,
    /// Without the leading dot
    pub extension: String,
}

/// Classify `path` and derive its canonical location from its metadata.
///
/// The container handle lives until the end of this call and is closed on
/// every return path.
pub fn canonical_location<B: ContainerBackend>(backend: &B, path: &Path) -> Result<CanonicalLocation> {
    let info = backend.open(path)?;

    let media_type = info.get(StreamKind::General, 0, "InternetMediaType");
    let extension = file_extension(&info, &media_type)?;
    debug!("Media type {:?}, extension {:?}", media_type, extension);

    let entry = media::lookup(&media_type)?;
    let timestamp = entry.strategy.resolve(path, &info)?;

    Ok(CanonicalLocation {
        category: entry.category,
        date_subpath: timestamp.date_subpath(),
        base_name: timestamp.base_name(),
        extension,
    })
}

fn file_extension<M: ContainerMetadata>(info: &M, media_type: &str) -> Result<String> {
    let extension = info.get(StreamKind::General, 0, "FileExtension");
    if !extension.is_empty() {
        return Ok(extension);
    }

    let extension = info
        .get(StreamKind::General, 0, "Format/Extensions")
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string();
    debug!("Using file extension {:?} for media type {:?}", extension, media_type);

    if extension.is_empty() {
        return Err(MediaSortError::MissingExtension(media_type.to_string()));
    }
    Ok(extension)
}
