use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{Map, Value};
use tracing::debug;

use super::{ContainerBackend, ContainerMetadata, StreamKind};
use crate::error::{MediaSortError, Result};

const DEFAULT_BINARY: &str = "mediainfo";

/// Container metadata read through the `mediainfo` command-line tool.
#[derive(Debug, Clone)]
pub struct MediaInfoCli {
    binary: PathBuf,
}

impl Default for MediaInfoCli {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY)
    }
}

impl MediaInfoCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into() }
    }
}

/// Relative paths get a `./` prefix so a name like `-clip.mp4` is not read
/// as an option.
fn path_argument(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        Path::new(".").join(path)
    }
}

impl ContainerBackend for MediaInfoCli {
    type Handle = MediaInfoReport;

    fn open(&self, path: &Path) -> Result<MediaInfoReport> {
        let open_error = |reason: String| MediaSortError::Open {
            path: path.to_path_buf(),
            reason,
        };

        let output = Command::new(&self.binary)
            .arg("--Full")
            .arg("--Output=JSON")
            .arg(path_argument(path))
            .output()
            .map_err(|e| open_error(format!("failed to run {}: {}", self.binary.display(), e)))?;

        if !output.status.success() {
            return Err(open_error(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        MediaInfoReport::from_json(&output.stdout).map_err(open_error)
    }
}

/// Tracks of one file, grouped by stream kind in file order.
#[derive(Debug, Clone, Default)]
pub struct MediaInfoReport {
    tracks: HashMap<StreamKind, Vec<Map<String, Value>>>,
}

impl MediaInfoReport {
    /// Parse the output of `mediainfo --Output=JSON` for a single file.
    pub fn from_json(bytes: &[u8]) -> std::result::Result<Self, String> {
        let root: Value =
            serde_json::from_slice(bytes).map_err(|e| format!("invalid MediaInfo output: {}", e))?;
        let track_list = root
            .get("media")
            .and_then(|m| m.get("track"))
            .and_then(Value::as_array)
            .ok_or_else(|| "no media tracks in MediaInfo output".to_string())?;

        let mut tracks: HashMap<StreamKind, Vec<Map<String, Value>>> = HashMap::new();
        for track in track_list {
            let Some(obj) = track.as_object() else {
                continue;
            };
            let kind = obj
                .get("@type")
                .and_then(Value::as_str)
                .and_then(StreamKind::from_name);
            match kind {
                Some(kind) => tracks.entry(kind).or_default().push(obj.clone()),
                None => debug!("Ignoring MediaInfo track {:?}", obj.get("@type")),
            }
        }

        Ok(Self { tracks })
    }
}

impl ContainerMetadata for MediaInfoReport {
    fn get(&self, kind: StreamKind, index: usize, field: &str) -> String {
        let Some(track) = self.tracks.get(&kind).and_then(|t| t.get(index)) else {
            return String::new();
        };

        // The JSON output flattens `Format/Extensions` to `Format_Extensions`
        let value = track
            .get(field)
            .or_else(|| track.get(&field.replace('/', "_")));

        match value {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }
}
