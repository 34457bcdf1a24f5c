//! Skip-rule configuration.
//!
//! An optional TOML file controls which files the sorter leaves alone.
//! Hidden files are skipped by default; beyond that, files can be excluded
//! by exact name, glob pattern, extension, or regex, with a keep-list of
//! globs that overrides every exclusion.
//!
//! ```toml
//! [skip]
//! include_hidden = false
//! filenames = ["Thumbs.db"]
//! patterns = ["*.part"]
//! extensions = ["tmp"]
//! regex = []
//! keep = []
//! ```

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading or compiling skip rules.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    NotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    Invalid(String),
    /// Invalid glob pattern.
    BadGlob(String),
    /// Invalid regex pattern, with the compile error.
    BadRegex { pattern: String, reason: String },
    /// IO error while reading the configuration file.
    Io(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::BadGlob(pattern) => write!(f, "Invalid glob pattern '{}'", pattern),
            ConfigError::BadRegex { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::Io(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortConfig {
    #[serde(default)]
    pub skip: SkipRules,
}

/// Rules deciding which files the sorter must not touch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkipRules {
    /// Whether to process hidden files (names starting with "."). Off by
    /// default so dotfiles stay put.
    #[serde(default)]
    pub include_hidden: bool,

    /// Exact filenames to skip (e.g., "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to skip (e.g., "*.part").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to skip (e.g., "tmp").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,

    /// Glob patterns that override every skip rule above.
    #[serde(default)]
    pub keep: Vec<String>,
}

impl SortConfig {
    /// Loads configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. An explicitly provided path
    /// 2. `.foldersortrc.toml` in the current directory
    /// 3. `~/.config/foldersort/config.toml`
    /// 4. Built-in defaults
    ///
    /// # Errors
    ///
    /// Returns an error only when a configuration file exists (or was
    /// explicitly named) but cannot be read or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".foldersortrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("foldersort")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Compiles the rules into matchers, validating every pattern.
    pub fn compile(self) -> Result<CompiledSkips, ConfigError> {
        CompiledSkips::new(self.skip)
    }
}

/// Pre-compiled skip rules for per-file matching.
pub struct CompiledSkips {
    include_hidden: bool,
    skip_filenames: HashSet<String>,
    skip_extensions: HashSet<String>,
    skip_patterns: Vec<Pattern>,
    skip_regexes: Vec<Regex>,
    keep_patterns: Vec<Pattern>,
}

impl CompiledSkips {
    fn new(rules: SkipRules) -> Result<Self, ConfigError> {
        let skip_patterns = compile_globs(&rules.patterns)?;
        let keep_patterns = compile_globs(&rules.keep)?;

        let skip_regexes = rules
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::BadRegex {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            include_hidden: rules.include_hidden,
            skip_filenames: rules.filenames.into_iter().collect(),
            skip_extensions: rules
                .extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            skip_patterns,
            skip_regexes,
            keep_patterns,
        })
    }

    /// Decides whether the sorter should process this file.
    ///
    /// `file_path` is the path relative to the directory being sorted.
    /// Keep-list globs win over everything; then hidden path components,
    /// exact names, extensions, globs, and regexes are checked in that
    /// order. Anything unmatched is processed.
    pub fn should_process(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self
            .keep_patterns
            .iter()
            .any(|pattern| pattern.matches_path(file_path))
        {
            return true;
        }

        // A dot anywhere in the path hides the file: dotfiles themselves and
        // everything inside hidden directories.
        if !self.include_hidden
            && file_path
                .components()
                .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
        {
            return false;
        }

        if self.skip_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.skip_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self
            .skip_patterns
            .iter()
            .any(|pattern| pattern.matches_path(file_path))
        {
            return false;
        }

        if self.skip_regexes.iter().any(|re| re.is_match(&file_name)) {
            return false;
        }

        true
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| Pattern::new(pattern).map_err(|_| ConfigError::BadGlob(pattern.clone())))
        .collect()
}
