/// The walk-classify-move-extract-cleanup pipeline.
///
/// This module owns the directory-mutation algorithm: it snapshots the tree,
/// relocates every regular file into its category directory under the root,
/// unpacks supported archives, and prunes directories left empty. All
/// per-file failures are collected into the run report; only an unusable
/// root aborts the run.
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::archive;
use crate::config::CompiledSkips;
use crate::file_category::{Category, CategoryTable};
use crate::namer;
use crate::report::RunReport;

/// Errors that abort a sorting run before or during setup.
///
/// Anything that goes wrong with an individual file is deliberately not
/// represented here; those failures land in the [`RunReport`] instead.
#[derive(Debug)]
pub enum OrganizeError {
    /// The root path is missing or not a directory.
    InvalidRoot { path: PathBuf },
    /// A category directory could not be created under the root.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoot { path } => {
                write!(f, "Not a valid directory: {}", path.display())
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for organizer operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A regular file discovered during the walk, with its derived fields.
#[derive(Debug, Clone)]
struct FileEntry {
    /// Where the file currently lives.
    path: PathBuf,
    /// Lowercased extension without the leading dot; empty if none.
    extension: String,
    /// The category resolved from the extension.
    category: Category,
}

/// Sorts a directory tree into per-category subdirectories.
///
/// Construction validates the root; [`Organizer::run`] performs the
/// one-shot reorganization and returns the structured report.
pub struct Organizer {
    root: PathBuf,
    table: CategoryTable,
    skips: CompiledSkips,
}

impl Organizer {
    /// Creates an organizer for `root`.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::InvalidRoot` if `root` does not exist or is
    /// not a directory. Nothing is mutated in that case.
    pub fn new(root: &Path, table: CategoryTable, skips: CompiledSkips) -> OrganizeResult<Self> {
        if !root.is_dir() {
            return Err(OrganizeError::InvalidRoot {
                path: root.to_path_buf(),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
            table,
            skips,
        })
    }

    /// Classifies the tree without mutating anything.
    ///
    /// Returns the files that would be processed, grouped by the category
    /// they would move into. Used for dry runs.
    pub fn plan(&self) -> BTreeMap<Category, Vec<PathBuf>> {
        let mut planned: BTreeMap<Category, Vec<PathBuf>> = BTreeMap::new();
        for entry in self.discover(&mut RunReport::default()) {
            planned.entry(entry.category).or_default().push(entry.path);
        }
        planned
    }

    /// Runs the full reorganization.
    ///
    /// # Errors
    ///
    /// Only setup failures (category directory creation) abort the run.
    /// Every per-file problem is recorded in the returned report and the run
    /// continues past it.
    pub fn run(&self) -> OrganizeResult<RunReport> {
        self.run_with_progress(|_| {})
    }

    /// Same as [`Organizer::run`], invoking `progress` once per processed
    /// file so the caller can drive a progress bar.
    pub fn run_with_progress<F: FnMut(&Path)>(&self, mut progress: F) -> OrganizeResult<RunReport> {
        let mut report = RunReport::default();

        self.create_category_dirs()?;

        // Snapshot before mutating: files moved into category directories
        // during this run must not be seen a second time by the same run.
        let entries = self.discover(&mut report);

        for entry in &entries {
            progress(&entry.path);
            report.record_extension(&entry.extension, entry.category);
            self.process_file(entry, &mut report);
        }

        self.remove_empty_dirs(&mut report);

        Ok(report)
    }

    /// Number of files a run would process; used to size progress bars.
    pub fn count_files(&self) -> usize {
        self.discover(&mut RunReport::default()).len()
    }

    /// Idempotently creates one directory per category under the root.
    fn create_category_dirs(&self) -> OrganizeResult<()> {
        for category in Category::ALL {
            let dir = self.root.join(category.dir_name());
            fs::create_dir_all(&dir).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: dir.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Walks the tree bottom-up and snapshots every regular file that passes
    /// the skip rules. Symlinks, devices, and directories are left alone.
    fn discover(&self, report: &mut RunReport) -> Vec<FileEntry> {
        let mut entries = Vec::new();
        for result in WalkDir::new(&self.root).min_depth(1).contents_first(true) {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    report.move_failures.push((path, e.to_string()));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            let relative = path.strip_prefix(&self.root).unwrap_or(&path);
            if !self.skips.should_process(relative) {
                continue;
            }
            let extension = path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            let category = self.table.classify(&extension);
            entries.push(FileEntry {
                path,
                extension,
                category,
            });
        }
        entries
    }

    /// Relocates one file, extracting it afterwards if it is an archive.
    fn process_file(&self, entry: &FileEntry, report: &mut RunReport) {
        let stem = entry
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let normalized = namer::normalize(&stem);
        let file_name = if entry.extension.is_empty() {
            normalized
        } else {
            format!("{}.{}", normalized, entry.extension)
        };

        let candidate = self.root.join(entry.category.dir_name()).join(file_name);

        // Re-run safety: a file already at its computed destination is done.
        if candidate == entry.path {
            return;
        }

        let destination = match namer::unique_destination(&candidate) {
            Ok(destination) => destination,
            Err(e) => {
                report
                    .move_failures
                    .push((entry.path.clone(), e.to_string()));
                return;
            }
        };

        if let Err(reason) = move_file(&entry.path, &destination) {
            report.move_failures.push((entry.path.clone(), reason));
            return;
        }
        report.add_relocation(entry.category, destination.clone());

        if entry.category == Category::Archive {
            self.unpack_archive(&destination, report);
        }
    }

    /// Extracts a relocated archive into a directory named after it, then
    /// deletes the container. On failure the container stays where it is.
    fn unpack_archive(&self, archive_path: &Path, report: &mut RunReport) {
        let stem = archive_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let target_dir = self.root.join(Category::Archive.dir_name()).join(stem);

        if let Err(e) = fs::create_dir_all(&target_dir) {
            report
                .extraction_failures
                .push((archive_path.to_path_buf(), e.to_string()));
            return;
        }

        match archive::extract(archive_path, &target_dir) {
            Ok(()) => {
                if let Err(e) = fs::remove_file(archive_path) {
                    report
                        .extraction_failures
                        .push((archive_path.to_path_buf(), e.to_string()));
                }
            }
            Err(err) => {
                // Unsupported or corrupt container: leave it in the archives
                // directory and say so.
                report
                    .extraction_failures
                    .push((archive_path.to_path_buf(), err.to_string()));
            }
        }
    }

    /// Removes every directory under the root that ended up empty.
    ///
    /// The walk is bottom-up, so a parent emptied by its child's removal is
    /// itself removed in the same pass. The root is never removed.
    fn remove_empty_dirs(&self, report: &mut RunReport) {
        for result in WalkDir::new(&self.root).min_depth(1).contents_first(true) {
            let entry = match result {
                Ok(entry) => entry,
                Err(_) => continue,
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            let path = entry.into_path();
            let is_empty = match fs::read_dir(&path) {
                Ok(mut listing) => listing.next().is_none(),
                Err(_) => false,
            };
            // A directory that fails to delete is simply left in place.
            if is_empty && fs::remove_dir(&path).is_ok() {
                report.removed_dirs.push(path);
            }
        }
    }
}

/// Moves a file, preferring an atomic rename.
///
/// When rename fails (most commonly a cross-device move), fall back to
/// copy-then-delete; the source is only removed after the copy succeeded, so
/// the file exists at one reachable path at every point in time.
fn move_file(source: &Path, destination: &Path) -> Result<(), String> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(rename_err) => match fs::copy(source, destination) {
            Ok(_) => fs::remove_file(source)
                .map_err(|e| format!("copied but could not remove source: {}", e)),
            Err(_) => {
                // Drop any partial copy so we never leave two versions.
                let _ = fs::remove_file(destination);
                Err(rename_err.to_string())
            }
        },
    }
}
