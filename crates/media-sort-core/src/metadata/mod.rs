pub mod mediainfo;

use std::path::Path;

use crate::error::Result;

pub use mediainfo::{MediaInfoCli, MediaInfoReport};

/// Stream kinds of a container, as MediaInfo names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    General,
    Video,
    Audio,
    Text,
    Other,
    Image,
    Menu,
}

impl StreamKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "General" => StreamKind::General,
            "Video" => StreamKind::Video,
            "Audio" => StreamKind::Audio,
            "Text" => StreamKind::Text,
            "Other" => StreamKind::Other,
            "Image" => StreamKind::Image,
            "Menu" => StreamKind::Menu,
            _ => return None,
        })
    }
}

/// Read access to an opened container.
pub trait ContainerMetadata {
    /// Value of `field` in stream `index` of `kind`; empty when absent.
    fn get(&self, kind: StreamKind, index: usize, field: &str) -> String;
}

/// Opens containers. Dropping the returned handle closes it.
pub trait ContainerBackend {
    type Handle: ContainerMetadata;

    fn open(&self, path: &Path) -> Result<Self::Handle>;
}
