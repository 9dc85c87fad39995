pub mod date;
pub mod error;
pub mod location;
pub mod media;
pub mod metadata;
pub mod writer;

use std::path::{Path, PathBuf};

use glob::MatchOptions;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

pub use error::{MediaSortError, Result};
pub use location::{canonical_location, CanonicalLocation};
pub use media::Category;
pub use metadata::{ContainerBackend, ContainerMetadata, MediaInfoCli, StreamKind};
pub use writer::{resolve_destination, transfer_fn, TransferMode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOptions {
    /// Root of the sorted tree
    pub dest_dir: PathBuf,
    /// Put each category under its own top-level folder
    #[serde(default)]
    pub separate: bool,
    /// Name files after their timestamp instead of keeping the original name
    #[serde(default = "default_rename")]
    pub rename: bool,
}

fn default_rename() -> bool {
    true
}

impl ProcessOptions {
    pub fn new(dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            dest_dir: dest_dir.into(),
            separate: false,
            rename: true,
        }
    }

    pub fn with_separate(mut self, separate: bool) -> Self {
        self.separate = separate;
        self
    }

    pub fn with_rename(mut self, rename: bool) -> Self {
        self.rename = rename;
        self
    }
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub processed: u64,
    pub skipped_dirs: u64,
    /// Inputs that could not be sorted, in the order they were met
    pub failed: Vec<PathBuf>,
}

impl BatchReport {
    pub fn failed_count(&self) -> u64 {
        self.failed.len() as u64
    }
}

/// Glob semantics: `*` never matches a leading dot, matching is case sensitive.
const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Sort every file matched by `source_files`.
///
/// A file that cannot be sorted is logged and skipped; only an invalid
/// pattern fails the whole run.
pub fn process_media_files<B, F>(
    source_files: &str,
    options: &ProcessOptions,
    backend: &B,
    mut transfer: F,
) -> Result<BatchReport>
where
    B: ContainerBackend,
    F: FnMut(&Path, &Path) -> Result<()>,
{
    let mut report = BatchReport::default();

    for entry in glob::glob_with(source_files, GLOB_OPTIONS)? {
        let input = match entry {
            Ok(path) => path,
            Err(e) => {
                error!("Failed to read {}: {}. Skipping.", e.path().display(), e.error());
                report.failed.push(e.path().to_path_buf());
                continue;
            }
        };

        if input.is_dir() {
            info!("Skipping directory {}", input.display());
            report.skipped_dirs += 1;
            continue;
        }

        info!("Processing input file {}", input.display());
        match process_input_file(&input, options, backend, &mut transfer) {
            Ok(dest) => {
                debug!("{} -> {}", input.display(), dest.display());
                report.processed += 1;
            }
            Err(e) => {
                error!("Failed to process {}: {}. Skipping.", input.display(), e);
                debug!("Failed to process {}: {:?}", input.display(), e);
                report.failed.push(input);
            }
        }
    }

    Ok(report)
}

fn process_input_file<B, F>(
    input: &Path,
    options: &ProcessOptions,
    backend: &B,
    transfer: &mut F,
) -> Result<PathBuf>
where
    B: ContainerBackend,
    F: FnMut(&Path, &Path) -> Result<()>,
{
    let location = canonical_location(backend, input)?;
    let dest = resolve_destination(
        &location,
        &options.dest_dir,
        options.separate,
        options.rename,
        input,
    );
    transfer(input, &dest)?;
    Ok(dest)
}
