//! Run reporting: the structured result of a sorting run and its rendering.
//!
//! The organizer core fills in a [`RunReport`] value and never prints
//! anything itself; this module turns the report into colored terminal
//! output. Keeping the two apart means the report can be asserted on in
//! tests without capturing stdout.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::file_category::Category;

/// The structured outcome of one sorting run.
///
/// Collects what was relocated per category, which extensions were
/// recognized, and every non-fatal failure encountered along the way.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Final destination paths of relocated files, keyed by category.
    pub relocated: BTreeMap<Category, Vec<PathBuf>>,
    /// Extensions that matched a category during this run.
    pub known_extensions: BTreeSet<String>,
    /// Extensions that fell through to `Other`, including the empty string
    /// for files with no extension at all.
    pub unknown_extensions: BTreeSet<String>,
    /// Archives that could not be extracted, with the reason. These files
    /// remain in the archive directory.
    pub extraction_failures: Vec<(PathBuf, String)>,
    /// Files whose move failed, with the reason. These files remain at their
    /// original location.
    pub move_failures: Vec<(PathBuf, String)>,
    /// Empty directories removed by the cleanup pass.
    pub removed_dirs: Vec<PathBuf>,
}

impl RunReport {
    /// Records a successful relocation.
    pub fn add_relocation(&mut self, category: Category, final_path: PathBuf) {
        self.relocated.entry(category).or_default().push(final_path);
    }

    /// Records the extension of a processed file into the known or unknown
    /// set based on its category.
    pub fn record_extension(&mut self, extension: &str, category: Category) {
        if category == Category::Other {
            self.unknown_extensions.insert(extension.to_string());
        } else {
            self.known_extensions.insert(extension.to_string());
        }
    }

    /// Total number of files relocated.
    pub fn relocated_count(&self) -> usize {
        self.relocated.values().map(Vec::len).sum()
    }

    /// True when nothing failed during the run.
    pub fn is_clean(&self) -> bool {
        self.extraction_failures.is_empty() && self.move_failures.is_empty()
    }
}

/// Renders a [`RunReport`] and progress output with consistent styling.
pub struct ReportRenderer;

impl ReportRenderer {
    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Creates a progress bar for the move pass.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints the full report for a completed run.
    pub fn print_report(report: &RunReport) {
        println!("\n{}", "Sorting completed. Results:".bold());

        for category in Category::ALL {
            let files = match report.relocated.get(&category) {
                Some(files) if !files.is_empty() => files,
                _ => continue,
            };
            println!("{}:", category.dir_name().bold());
            for file in files {
                println!("  - {}", file.display());
            }
        }

        if report.relocated_count() == 0 {
            println!("  (no files relocated)");
        }

        Self::print_extension_set("Known extensions", &report.known_extensions);
        Self::print_extension_set("Unknown extensions", &report.unknown_extensions);

        if !report.extraction_failures.is_empty() {
            println!("\n{}", "Failed extractions:".yellow().bold());
            for (path, reason) in &report.extraction_failures {
                println!("  {} {}: {}", "⚠".yellow(), path.display(), reason);
            }
        }

        if !report.move_failures.is_empty() {
            println!("\n{}", "Files left in place:".yellow().bold());
            for (path, reason) in &report.move_failures {
                println!("  {} {}: {}", "⚠".yellow(), path.display(), reason);
            }
        }

        if !report.removed_dirs.is_empty() {
            println!("\n{}", "Removed empty directories:".bold());
            for dir in &report.removed_dirs {
                println!("  - {}", dir.display());
            }
        }

        let summary = format!("{} file(s) relocated", report.relocated_count());
        if report.is_clean() {
            println!("\n{} {}", "✓".green(), summary);
        } else {
            println!(
                "\n{} {} ({} issue(s) reported above)",
                "⚠".yellow(),
                summary,
                report.extraction_failures.len() + report.move_failures.len()
            );
        }
    }

    /// Prints a dry-run summary: what would move where, nothing mutated.
    pub fn print_dry_run(planned: &BTreeMap<Category, Vec<PathBuf>>) {
        println!("{}", "[DRY RUN] No files were modified.".yellow());

        let total: usize = planned.values().map(Vec::len).sum();
        if total == 0 {
            println!("No files found to organize.");
            return;
        }

        println!("\nFiles would be organized as follows:");
        for category in Category::ALL {
            let files = match planned.get(&category) {
                Some(files) if !files.is_empty() => files,
                _ => continue,
            };
            println!("{} ({} file(s)):", category.dir_name().bold(), files.len());
            for file in files {
                println!("  - {}", file.display());
            }
        }
        println!("\nTotal: {} file(s)", total);
    }

    fn print_extension_set(label: &str, extensions: &BTreeSet<String>) {
        println!("\n{}:", label.bold());
        if extensions.is_empty() {
            println!("  (none)");
            return;
        }
        for ext in extensions {
            if ext.is_empty() {
                println!("  - (no extension)");
            } else {
                println!("  - {}", ext);
            }
        }
    }
}
