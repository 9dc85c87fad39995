use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::location::CanonicalLocation;

/// Pick the output path for `input`, appending `_1`, `_2`, ... to the base
/// name until nothing exists at that path.
///
/// The check is not atomic with the later transfer.
pub fn resolve_destination(
    location: &CanonicalLocation,
    dest_dir: &Path,
    separate: bool,
    rename: bool,
    input: &Path,
) -> PathBuf {
    let output_dir = if separate {
        dest_dir
            .join(location.category.folder_name())
            .join(&location.date_subpath)
    } else {
        dest_dir.join(&location.date_subpath)
    };

    let (stem, ext) = if rename {
        (location.base_name.clone(), location.extension.clone())
    } else {
        original_name_parts(input)
    };

    let mut dest = output_dir.join(file_name(&stem, &ext));
    let mut counter = 0u64;
    while dest.exists() {
        counter += 1;
        info!("Output file '{}' already exists", dest.display());
        dest = output_dir.join(file_name(&format!("{}_{}", stem, counter), &ext));
    }

    dest
}

fn original_name_parts(input: &Path) -> (String, String) {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    let ext = input
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    (stem, ext)
}

fn file_name(stem: &str, ext: &str) -> String {
    if ext.is_empty() {
        stem.to_string()
    } else {
        format!("{}.{}", stem, ext)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferMode {
    Copy,
    Move,
}

impl TransferMode {
    fn action_name(self) -> &'static str {
        match self {
            TransferMode::Copy => "Copying",
            TransferMode::Move => "Moving",
        }
    }
}

/// Build the per-file transfer operation for `mode`.
/// With `dry_run`, only the log line is produced.
pub fn transfer_fn(mode: TransferMode, dry_run: bool) -> impl FnMut(&Path, &Path) -> Result<()> {
    debug!("{} files", mode.action_name());
    let action = if dry_run {
        info!("*** DRY-RUN ***");
        format!("[DRY-RUN] {}", mode.action_name())
    } else {
        mode.action_name().to_string()
    };

    move |src: &Path, dest: &Path| -> Result<()> {
        info!("{} {} to {}", action, src.display(), dest.display());
        if dry_run {
            return Ok(());
        }

        if let Some(dir) = dest.parent() {
            create_dir_all_0755(dir)?;
        }

        match mode {
            TransferMode::Copy => copy_preserving_times(src, dest),
            TransferMode::Move => move_file(src, dest),
        }
    }
}

/// Create `dir` and its missing parents with mode 0755.
pub fn create_dir_all_0755(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)
}

fn copy_preserving_times(src: &Path, dest: &Path) -> Result<()> {
    fs::copy(src, dest)?;
    let meta = fs::metadata(src)?;
    filetime::set_file_times(
        dest,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )?;
    Ok(())
}

fn move_file(src: &Path, dest: &Path) -> Result<()> {
    if let Err(e) = fs::rename(src, dest) {
        // Typically a move across filesystems
        debug!("rename failed ({}), copying {} instead", e, src.display());
        copy_preserving_times(src, dest)?;
        fs::remove_file(src)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::Category;

    fn location() -> CanonicalLocation {
        CanonicalLocation {
            category: Category::Pictures,
            date_subpath: PathBuf::from("2020/05/01"),
            base_name: "2020-05-01_10-00-00".to_string(),
            extension: "jpg".to_string(),
        }
    }

    #[test]
    fn test_collisions_get_numbered() {
        let dir = tempfile::tempdir().unwrap();
        let input = Path::new("/camera/DSC_0042.JPG");

        let first = resolve_destination(&location(), dir.path(), false, true, input);
        assert_eq!(first, dir.path().join("2020/05/01/2020-05-01_10-00-00.jpg"));

        create_dir_all_0755(first.parent().unwrap()).unwrap();
        fs::write(&first, b"a").unwrap();
        let second = resolve_destination(&location(), dir.path(), false, true, input);
        assert_eq!(second, dir.path().join("2020/05/01/2020-05-01_10-00-00_1.jpg"));

        fs::write(&second, b"b").unwrap();
        let third = resolve_destination(&location(), dir.path(), false, true, input);
        assert_eq!(third, dir.path().join("2020/05/01/2020-05-01_10-00-00_2.jpg"));
    }

    #[test]
    fn test_separate_by_category() {
        let dir = tempfile::tempdir().unwrap();
        let dest = resolve_destination(&location(), dir.path(), true, true, Path::new("x.jpg"));
        assert_eq!(dest, dir.path().join("Pictures/2020/05/01/2020-05-01_10-00-00.jpg"));
    }

    #[test]
    fn test_keep_original_name() {
        let dir = tempfile::tempdir().unwrap();
        let input = Path::new("/camera/DSC_0042.JPG");
        let dest = resolve_destination(&location(), dir.path(), false, false, input);
        assert_eq!(dest, dir.path().join("2020/05/01/DSC_0042.JPG"));

        let dest = resolve_destination(&location(), dir.path(), true, false, Path::new("/camera/README"));
        assert_eq!(dest, dir.path().join("Pictures/2020/05/01/README"));
    }

    #[test]
    fn test_copy_preserves_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.jpg");
        fs::write(&src, b"pixels").unwrap();
        let mtime = FileTime::from_unix_time(1_400_000_000, 0);
        filetime::set_file_mtime(&src, mtime).unwrap();

        let dest = dir.path().join("out/2014/05/13/in.jpg");
        let mut transfer = transfer_fn(TransferMode::Copy, false);
        transfer(&src, &dest).unwrap();

        assert!(src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"pixels");
        let meta = fs::metadata(&dest).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta), mtime);
    }

    #[test]
    fn test_move() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.mp4");
        fs::write(&src, b"frames").unwrap();

        let dest = dir.path().join("out/in.mp4");
        let mut transfer = transfer_fn(TransferMode::Move, false);
        transfer(&src, &dest).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"frames");
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.mp4");
        fs::write(&src, b"frames").unwrap();

        let dest = dir.path().join("out/2020/in.mp4");
        let mut transfer = transfer_fn(TransferMode::Move, true);
        transfer(&src, &dest).unwrap();

        assert!(src.exists());
        assert!(!dir.path().join("out").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_dirs_are_0755() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        create_dir_all_0755(&nested).unwrap();
        create_dir_all_0755(&nested).unwrap();

        // umask can only clear bits
        let mode = fs::metadata(&nested).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode & !0o755, 0);
    }
}
