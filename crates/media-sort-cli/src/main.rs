use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use media_sort_core::{MediaInfoCli, ProcessOptions, TransferMode};

#[derive(Parser)]
#[command(
    name = "media-sort",
    version,
    about = "Sort pictures, music and videos into YYYY/MM/DD folders using their embedded dates"
)]
struct Cli {
    /// Glob pattern of the input files (`**` recurses into subdirectories)
    #[arg(long = "source-files")]
    source_files: String,

    /// Root of the sorted tree
    #[arg(long = "destination-dir")]
    dest_dir: PathBuf,

    /// Move files instead of copying them
    #[arg(long = "move")]
    move_files: bool,

    /// Put pictures, videos and audio under separate top-level folders
    #[arg(long)]
    separate: bool,

    /// Keep the original file names
    #[arg(long)]
    no_rename: bool,

    /// Only log what would be done
    #[arg(long)]
    dryrun: bool,

    /// MediaInfo executable used to read container metadata
    #[arg(long, env = "MEDIAINFO_BIN", default_value = "mediainfo")]
    mediainfo: PathBuf,

    /// Write a JSON summary of the run to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

/// `DEBUG` set to anything non-empty turns on debug output; otherwise
/// `RUST_LOG` applies, defaulting to `info`.
fn init_logging() {
    let debug = std::env::var_os("DEBUG").is_some_and(|v| !v.is_empty());
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stdout)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();
    let t_total = std::time::Instant::now();

    let options = ProcessOptions::new(cli.dest_dir)
        .with_separate(cli.separate)
        .with_rename(!cli.no_rename);
    let mode = if cli.move_files {
        TransferMode::Move
    } else {
        TransferMode::Copy
    };
    let backend = MediaInfoCli::new(cli.mediainfo);

    let report = media_sort_core::process_media_files(
        &cli.source_files,
        &options,
        &backend,
        media_sort_core::transfer_fn(mode, cli.dryrun),
    )?;

    if let Some(path) = &cli.report {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &report)?;
    }

    eprintln!(
        "Done! {} files sorted, {} directories skipped, {} failed ({:.2}s)",
        report.processed,
        report.skipped_dirs,
        report.failed_count(),
        t_total.elapsed().as_secs_f64()
    );

    Ok(())
}
