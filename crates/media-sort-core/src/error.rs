use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MediaSortError>;

/// Everything that can stop a single file from being sorted.
#[derive(Error, Debug)]
pub enum MediaSortError {
    /// None of the candidate image tags is present
    #[error("None of the tags ({tags}) available for {}", path.display())]
    TagNotFound { tags: String, path: PathBuf },

    #[error("Got empty timestamp")]
    EmptyTimestamp,

    #[error("Unsupported timestamp format: {0}")]
    UnsupportedTimestamp(String),

    #[error("Invalid image date/time value: {0:?}")]
    InvalidImageDateTime(String),

    /// Every container date field was absent or unparsable
    #[error("No (valid) date/time info found in: {fields}")]
    NoContainerDate { fields: String },

    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),

    #[error("Unable to determine file extension for media type: {0}")]
    MissingExtension(String),

    #[error("Unable to load input file '{}': {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    #[error("EXIF error: {0}")]
    Exif(#[from] exif::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
