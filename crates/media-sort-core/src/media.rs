use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::date::{container, exif, Timestamp};
use crate::error::{MediaSortError, Result};
use crate::metadata::ContainerMetadata;

/// Top-level destination folder of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Pictures,
    Videos,
    Audio,
    Other,
}

impl Category {
    pub const fn folder_name(self) -> &'static str {
        match self {
            Category::Pictures => "Pictures",
            Category::Videos => "Videos",
            Category::Audio => "Audio",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

/// Where the creation time of a file is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStrategy {
    /// EXIF tags of the image itself
    ImageTags,
    /// Date fields of the container's general stream
    ContainerTags,
}

impl DateStrategy {
    pub fn resolve<M: ContainerMetadata + ?Sized>(self, path: &Path, info: &M) -> Result<Timestamp> {
        match self {
            DateStrategy::ImageTags => exif::image_datetime(path),
            DateStrategy::ContainerTags => container::read_container_datetime(info),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaTypeEntry {
    pub strategy: DateStrategy,
    pub category: Category,
}

const fn entry(strategy: DateStrategy, category: Category) -> MediaTypeEntry {
    MediaTypeEntry { strategy, category }
}

const PICTURE: MediaTypeEntry = entry(DateStrategy::ImageTags, Category::Pictures);
const AUDIO: MediaTypeEntry = entry(DateStrategy::ContainerTags, Category::Audio);
const VIDEO: MediaTypeEntry = entry(DateStrategy::ContainerTags, Category::Videos);

/// Media types as reported by the container backend (`InternetMediaType`).
pub const MEDIA_TYPES: &[(&str, MediaTypeEntry)] = &[
    // Bitmap
    ("image/bmp", PICTURE),
    // Graphics Interchange Format
    ("image/gif", PICTURE),
    ("image/jpeg", PICTURE),
    // Portable Network Graphic
    ("image/png", PICTURE),
    ("image/tiff", PICTURE),
    // MPEG-4
    ("audio/mp4", AUDIO),
    // Adaptive Multi-Rate
    ("audio/AMR", AUDIO),
    // Wave
    ("audio/vnd.wave", AUDIO),
    // Windows Media
    ("audio/x-ms-wma", AUDIO),
    // MPEG-4 base media and 3GPP
    ("video/mp4", VIDEO),
    ("video/quicktime", VIDEO),
    // Audio Video Interleave
    ("video/vnd.avi", VIDEO),
    ("video/x-ms-wmv", VIDEO),
    // MPEG transport streams report no media type at all. Treating every
    // unidentified container as video is a heuristic for that one family;
    // checking `Format` (BDAV) would be the precise test.
    ("", VIDEO),
];

pub fn lookup(media_type: &str) -> Result<MediaTypeEntry> {
    MEDIA_TYPES
        .iter()
        .find(|(name, _)| *name == media_type)
        .map(|(_, entry)| *entry)
        .ok_or_else(|| MediaSortError::UnsupportedType(media_type.to_string()))
}
