//! Archive extraction for the container formats the organizer understands.
//!
//! The organizer treats this module as a black box: given an archive path
//! and a destination directory, extraction either completes fully or returns
//! an error describing why the container could not be opened. Formats that
//! are categorized as archives but have no extractor here (rar, 7z, iso)
//! report `ArchiveError::Unsupported`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use xz2::read::XzDecoder;

/// Container formats the extractor can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// Zip container.
    Zip,
    /// Uncompressed tar.
    Tar,
    /// Gzip-compressed tar.
    TarGz,
    /// Bzip2-compressed tar.
    TarBz2,
    /// Xz-compressed tar.
    TarXz,
}

impl ArchiveKind {
    /// Detects the archive kind from a lowercase extension (no leading dot).
    ///
    /// Returns `None` for extensions without an extractor, including archive
    /// extensions the category table knows about but this module does not.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "zip" => Some(ArchiveKind::Zip),
            "tar" => Some(ArchiveKind::Tar),
            "gz" => Some(ArchiveKind::TarGz),
            "bz2" => Some(ArchiveKind::TarBz2),
            "xz" => Some(ArchiveKind::TarXz),
            _ => None,
        }
    }
}

/// Errors that can occur while extracting an archive.
#[derive(Debug)]
pub enum ArchiveError {
    /// The extension names a container format with no extractor.
    Unsupported { path: PathBuf, extension: String },
    /// The container could not be read or is corrupt.
    Corrupt { path: PathBuf, reason: String },
    /// Plain I/O failure while reading the container or writing entries.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported { path, extension } => {
                write!(
                    f,
                    "no extractor for '{}' archives: {}",
                    extension,
                    path.display()
                )
            }
            Self::Corrupt { path, reason } => {
                write!(f, "cannot unpack {}: {}", path.display(), reason)
            }
            Self::Io { path, source } => {
                write!(f, "I/O error unpacking {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ArchiveError {}

/// Extracts an archive into `dest_dir`.
///
/// The kind is detected from the archive's extension. Zip entries go through
/// `zip`'s own extraction, tar entries through `tar::Archive::unpack`; both
/// refuse entries that would escape `dest_dir`.
///
/// # Errors
///
/// `ArchiveError::Unsupported` when the extension has no extractor,
/// `ArchiveError::Corrupt` when the container cannot be parsed, and
/// `ArchiveError::Io` for plain read/write failures. On error the archive
/// file itself is left untouched; `dest_dir` may hold a partial extraction.
pub fn extract(archive_path: &Path, dest_dir: &Path) -> Result<(), ArchiveError> {
    let extension = archive_path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let kind =
        ArchiveKind::from_extension(&extension).ok_or_else(|| ArchiveError::Unsupported {
            path: archive_path.to_path_buf(),
            extension: extension.clone(),
        })?;

    let file = File::open(archive_path).map_err(|e| ArchiveError::Io {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    match kind {
        ArchiveKind::Zip => {
            let mut zip = zip::ZipArchive::new(file).map_err(|e| ArchiveError::Corrupt {
                path: archive_path.to_path_buf(),
                reason: e.to_string(),
            })?;
            zip.extract(dest_dir).map_err(|e| ArchiveError::Corrupt {
                path: archive_path.to_path_buf(),
                reason: e.to_string(),
            })
        }
        ArchiveKind::Tar => unpack_tar(archive_path, BufReader::new(file), dest_dir),
        ArchiveKind::TarGz => {
            unpack_tar(archive_path, GzDecoder::new(BufReader::new(file)), dest_dir)
        }
        ArchiveKind::TarBz2 => {
            unpack_tar(archive_path, BzDecoder::new(BufReader::new(file)), dest_dir)
        }
        ArchiveKind::TarXz => {
            unpack_tar(archive_path, XzDecoder::new(BufReader::new(file)), dest_dir)
        }
    }
}

fn unpack_tar<R: std::io::Read>(
    archive_path: &Path,
    reader: R,
    dest_dir: &Path,
) -> Result<(), ArchiveError> {
    let mut archive = tar::Archive::new(reader);
    archive.unpack(dest_dir).map_err(|e| ArchiveError::Corrupt {
        path: archive_path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    fn write_tar_gz(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, content) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_kind_detection() {
        assert_eq!(ArchiveKind::from_extension("zip"), Some(ArchiveKind::Zip));
        assert_eq!(ArchiveKind::from_extension("TAR"), Some(ArchiveKind::Tar));
        assert_eq!(ArchiveKind::from_extension("gz"), Some(ArchiveKind::TarGz));
        assert_eq!(
            ArchiveKind::from_extension("bz2"),
            Some(ArchiveKind::TarBz2)
        );
        assert_eq!(ArchiveKind::from_extension("xz"), Some(ArchiveKind::TarXz));
        assert_eq!(ArchiveKind::from_extension("rar"), None);
        assert_eq!(ArchiveKind::from_extension("7z"), None);
        assert_eq!(ArchiveKind::from_extension("iso"), None);
    }

    #[test]
    fn test_extract_zip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("notes.zip");
        write_zip(&archive, &[("notes.txt", "remember the milk")]);

        let dest = temp.path().join("notes");
        fs::create_dir(&dest).unwrap();
        extract(&archive, &dest).unwrap();

        let extracted = dest.join("notes.txt");
        assert_eq!(fs::read_to_string(extracted).unwrap(), "remember the milk");
    }

    #[test]
    fn test_extract_tar_gz() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("bundle.gz");
        write_tar_gz(&archive, &[("a.txt", "alpha"), ("sub/b.txt", "beta")]);

        let dest = temp.path().join("bundle");
        fs::create_dir(&dest).unwrap();
        extract(&archive, &dest).unwrap();

        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "alpha");
        assert_eq!(fs::read_to_string(dest.join("sub/b.txt")).unwrap(), "beta");
    }

    #[test]
    fn test_extract_corrupt_zip_fails_cleanly() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("broken.zip");
        fs::write(&archive, b"this is not a zip file").unwrap();

        let dest = temp.path().join("broken");
        fs::create_dir(&dest).unwrap();
        let err = extract(&archive, &dest).unwrap_err();
        assert!(matches!(err, ArchiveError::Corrupt { .. }));
        // The bogus archive itself is untouched.
        assert!(archive.exists());
    }

    #[test]
    fn test_extract_unsupported_kind() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("disc.iso");
        fs::write(&archive, b"iso bytes").unwrap();

        let err = extract(&archive, temp.path()).unwrap_err();
        assert!(matches!(err, ArchiveError::Unsupported { .. }));
    }
}
