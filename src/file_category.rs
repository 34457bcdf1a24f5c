/// File categorization by extension.
///
/// This module maps file extensions to broad categories (e.g., "text",
/// "images", "archives") through an immutable lookup table that is built and
/// validated once at startup.
///
/// # Examples
///
/// ```
/// use foldersort::file_category::{Category, CategoryTable};
///
/// let table = CategoryTable::standard().unwrap();
/// assert_eq!(table.classify("png"), Category::Image);
/// assert_eq!(table.classify("DOCX"), Category::Text);
/// assert_eq!(table.classify(""), Category::Other);
/// ```
use std::collections::HashMap;

/// Represents a broad file category.
///
/// Categories are used to organize files into meaningful groups
/// for directory-based organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Text and document files (TXT, DOCX, PDF, etc.)
    Text,
    /// Image files (PNG, JPG, GIF, etc.)
    Image,
    /// Audio files (MP3, WAV, FLAC, etc.)
    Audio,
    /// Video files (MP4, MKV, AVI, etc.)
    Video,
    /// Archive files (ZIP, TAR, GZ, etc.)
    Archive,
    /// Database files (SQL, SQLITE, MDB, etc.)
    Database,
    /// Installers and executables (EXE, MSI, DEB, etc.)
    Software,
    /// Source code and scripts (PY, JS, SH, etc.)
    Script,
    /// System files (DLL, INI, LOG, etc.)
    System,
    /// Unknown or uncategorized files
    Other,
}

impl Category {
    /// All categories, in report order.
    pub const ALL: [Category; 10] = [
        Category::Text,
        Category::Image,
        Category::Audio,
        Category::Video,
        Category::Archive,
        Category::Database,
        Category::Software,
        Category::Script,
        Category::System,
        Category::Other,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use foldersort::file_category::Category;
    ///
    /// assert_eq!(Category::Image.dir_name(), "images");
    /// assert_eq!(Category::Archive.dir_name(), "archives");
    /// assert_eq!(Category::Other.dir_name(), "other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Text => "text",
            Category::Image => "images",
            Category::Audio => "audio",
            Category::Video => "video",
            Category::Archive => "archives",
            Category::Database => "databases",
            Category::Software => "software",
            Category::Script => "scripts",
            Category::System => "system",
            Category::Other => "other",
        }
    }

    /// Returns a human-readable description of this category.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Text => "Text and document files",
            Category::Image => "Image files",
            Category::Audio => "Audio files",
            Category::Video => "Video files",
            Category::Archive => "Archive files",
            Category::Database => "Database files",
            Category::Software => "Installers and executables",
            Category::Script => "Source code and scripts",
            Category::System => "System files",
            Category::Other => "Other files",
        }
    }
}

/// The built-in extension table.
///
/// `iso` is listed only under `Archive`; disc images are containers first,
/// even though the extractor cannot open them.
const STANDARD_MAPPINGS: &[(Category, &[&str])] = &[
    (
        Category::Text,
        &["txt", "doc", "docx", "pdf", "odt", "rtf", "md", "tex", "wps"],
    ),
    (
        Category::Image,
        &[
            "jpg", "jpeg", "png", "gif", "bmp", "svg", "tiff", "psd", "ai", "ico",
        ],
    ),
    (
        Category::Audio,
        &["mp3", "wav", "flac", "aac", "ogg", "wma", "m4a", "aiff"],
    ),
    (
        Category::Video,
        &["mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "vob"],
    ),
    (
        Category::Archive,
        &["zip", "rar", "7z", "tar", "gz", "bz2", "xz", "iso"],
    ),
    (
        Category::Database,
        &["sql", "mdb", "accdb", "sqlite", "db", "dbf", "myd", "frm"],
    ),
    (
        Category::Software,
        &["exe", "msi", "apk", "dmg", "bin", "jar", "deb", "rpm"],
    ),
    (
        Category::Script,
        &[
            "py", "js", "html", "css", "php", "java", "cpp", "cs", "rb", "sh", "pl",
        ],
    ),
    (
        Category::System,
        &["dll", "sys", "ini", "log", "bat", "cfg", "reg", "efi"],
    ),
];

/// Error raised when the extension table is not well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousExtension {
    /// The extension that was mapped twice.
    pub extension: String,
    /// The category that already claimed the extension.
    pub existing: Category,
    /// The category that tried to claim it again.
    pub duplicate: Category,
}

impl std::fmt::Display for AmbiguousExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "extension '{}' is mapped to both {:?} and {:?}",
            self.extension, self.existing, self.duplicate
        )
    }
}

impl std::error::Error for AmbiguousExtension {}

/// Maps file extensions to categories.
///
/// The table is immutable after construction. Construction validates that no
/// extension belongs to two categories, so lookups are unambiguous exact
/// matches rather than first-wins scans.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    extension_map: HashMap<String, Category>,
}

impl CategoryTable {
    /// Builds the standard table.
    ///
    /// # Errors
    ///
    /// Returns `AmbiguousExtension` if the built-in mappings ever assign one
    /// extension to two categories.
    pub fn standard() -> Result<Self, AmbiguousExtension> {
        Self::with_mappings(STANDARD_MAPPINGS)
    }

    /// Builds a table from explicit category/extension mappings.
    ///
    /// Extensions are stored lowercased and without a leading dot.
    ///
    /// # Errors
    ///
    /// Returns `AmbiguousExtension` on the first extension that appears in
    /// more than one category.
    pub fn with_mappings(mappings: &[(Category, &[&str])]) -> Result<Self, AmbiguousExtension> {
        let mut extension_map = HashMap::new();
        for (category, extensions) in mappings {
            for ext in *extensions {
                let key = ext.to_lowercase();
                if let Some(existing) = extension_map.insert(key.clone(), *category) {
                    return Err(AmbiguousExtension {
                        extension: key,
                        existing,
                        duplicate: *category,
                    });
                }
            }
        }
        Ok(Self { extension_map })
    }

    /// Maps an extension (without leading dot) to its category.
    ///
    /// The lookup is case-insensitive and total: anything not in the table,
    /// including the empty string, falls into `Category::Other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use foldersort::file_category::{Category, CategoryTable};
    ///
    /// let table = CategoryTable::standard().unwrap();
    /// assert_eq!(table.classify("pdf"), Category::Text);
    /// assert_eq!(table.classify("Mp3"), Category::Audio);
    /// assert_eq!(table.classify("xyz"), Category::Other);
    /// ```
    pub fn classify(&self, ext: &str) -> Category {
        self.extension_map
            .get(&ext.to_lowercase())
            .copied()
            .unwrap_or(Category::Other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Text.dir_name(), "text");
        assert_eq!(Category::Image.dir_name(), "images");
        assert_eq!(Category::Audio.dir_name(), "audio");
        assert_eq!(Category::Video.dir_name(), "video");
        assert_eq!(Category::Archive.dir_name(), "archives");
        assert_eq!(Category::Database.dir_name(), "databases");
        assert_eq!(Category::Software.dir_name(), "software");
        assert_eq!(Category::Script.dir_name(), "scripts");
        assert_eq!(Category::System.dir_name(), "system");
        assert_eq!(Category::Other.dir_name(), "other");
    }

    #[test]
    fn test_standard_table_is_disjoint() {
        assert!(CategoryTable::standard().is_ok());
    }

    #[test]
    fn test_classify_known_extensions() {
        let table = CategoryTable::standard().unwrap();
        assert_eq!(table.classify("txt"), Category::Text);
        assert_eq!(table.classify("jpeg"), Category::Image);
        assert_eq!(table.classify("flac"), Category::Audio);
        assert_eq!(table.classify("mkv"), Category::Video);
        assert_eq!(table.classify("zip"), Category::Archive);
        assert_eq!(table.classify("sqlite"), Category::Database);
        assert_eq!(table.classify("deb"), Category::Software);
        assert_eq!(table.classify("py"), Category::Script);
        assert_eq!(table.classify("dll"), Category::System);
    }

    #[test]
    fn test_classify_case_insensitive() {
        let table = CategoryTable::standard().unwrap();
        assert_eq!(table.classify("PDF"), Category::Text);
        assert_eq!(table.classify("Png"), Category::Image);
        assert_eq!(table.classify("ZIP"), Category::Archive);
    }

    #[test]
    fn test_classify_is_idempotent_under_lowercasing() {
        let table = CategoryTable::standard().unwrap();
        for ext in ["TXT", "Jpg", "mP3", "tar", "unknown"] {
            assert_eq!(table.classify(ext), table.classify(&ext.to_lowercase()));
            assert_eq!(table.classify(ext), table.classify(ext));
        }
    }

    #[test]
    fn test_classify_unknown_falls_to_other() {
        let table = CategoryTable::standard().unwrap();
        assert_eq!(table.classify("xyz"), Category::Other);
        assert_eq!(table.classify(""), Category::Other);
    }

    #[test]
    fn test_duplicate_extension_rejected() {
        let result = CategoryTable::with_mappings(&[
            (Category::Archive, &["zip", "iso"]),
            (Category::Software, &["iso"]),
        ]);
        let err = result.unwrap_err();
        assert_eq!(err.extension, "iso");
        assert_eq!(err.existing, Category::Archive);
        assert_eq!(err.duplicate, Category::Software);
    }
}
