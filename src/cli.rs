//! Command-line interface for foldersort.
//!
//! Argument parsing, run orchestration, and exit-code mapping live here; the
//! sorting itself is `organizer`'s job and the terminal output is rendered
//! through `report`.

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::config::SortConfig;
use crate::file_category::CategoryTable;
use crate::organizer::Organizer;
use crate::report::ReportRenderer;

/// Exit code for invocation-level errors (bad root path, broken config).
pub const EXIT_INVOCATION_ERROR: i32 = 2;

/// Sort a directory's files into category subfolders.
///
/// Files are renamed to a transliterated ASCII form, archives are unpacked
/// into folders named after them, and directories left empty are removed.
#[derive(Debug, Parser)]
#[command(name = "foldersort", version, about)]
pub struct Cli {
    /// Directory to sort.
    pub directory: PathBuf,

    /// Show what would happen without touching any file.
    #[arg(long)]
    pub dry_run: bool,

    /// Path to a TOML file with skip rules.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Runs the CLI and returns the process exit code.
///
/// A completed run exits 0 even when individual archives failed to extract
/// or individual files could not be moved; those are reported, not fatal.
/// Only invocation errors (invalid directory, unusable configuration) exit
/// non-zero, and nothing is mutated in that case.
pub fn run(cli: &Cli) -> i32 {
    let organizer = match build_organizer(&cli.directory, cli.config.as_deref()) {
        Ok(organizer) => organizer,
        Err(message) => {
            ReportRenderer::error(&message);
            return EXIT_INVOCATION_ERROR;
        }
    };

    if cli.dry_run {
        ReportRenderer::info(&format!("Analyzing contents of: {}", cli.directory.display()));
        ReportRenderer::print_dry_run(&organizer.plan());
        return 0;
    }

    ReportRenderer::info(&format!("Sorting contents of: {}", cli.directory.display()));

    let total = organizer.count_files() as u64;
    let pb = ReportRenderer::create_progress_bar(total);
    let result = organizer.run_with_progress(|path| {
        pb.set_message(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        pb.inc(1);
    });
    pb.finish_and_clear();

    match result {
        Ok(report) => {
            ReportRenderer::print_report(&report);
            0
        }
        Err(e) => {
            ReportRenderer::error(&e.to_string());
            EXIT_INVOCATION_ERROR
        }
    }
}

fn build_organizer(directory: &Path, config_path: Option<&Path>) -> Result<Organizer, String> {
    if !directory.is_dir() {
        return Err(format!("Not a valid directory: {}", directory.display()));
    }

    let table = CategoryTable::standard().map_err(|e| format!("Bad category table: {}", e))?;

    let skips = SortConfig::load(config_path)
        .map_err(|e| format!("Error loading configuration: {}", e))?
        .compile()
        .map_err(|e| format!("Error compiling skip rules: {}", e))?;

    Organizer::new(directory, table, skips).map_err(|e| e.to_string())
}
