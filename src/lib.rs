//! foldersort - a one-shot directory sorting utility
//!
//! This library classifies files by extension into a fixed category
//! taxonomy, renames them to a filesystem-safe transliterated form, moves
//! them into per-category subdirectories, unpacks supported archives, and
//! prunes directories left empty along the way.

pub mod archive;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod namer;
pub mod organizer;
pub mod report;

pub use config::{CompiledSkips, ConfigError, SortConfig};
pub use file_category::{Category, CategoryTable};
pub use organizer::{OrganizeError, Organizer};
pub use report::RunReport;
