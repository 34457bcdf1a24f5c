//! Filesystem-safe naming for relocated files.
//!
//! Two concerns live here: turning an arbitrary file stem into an ASCII-only,
//! separator-free name (transliterating Ukrainian Cyrillic along the way),
//! and finding a destination path that is guaranteed not to clobber an
//! existing entry.

use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Name used when normalization leaves nothing behind (e.g. an empty stem).
const PLACEHOLDER_NAME: &str = "unnamed";

/// How many random suffixes to try before giving up on a destination.
///
/// With 32 hex characters of randomness per attempt this is unreachable in
/// practice; the cap only bounds the loop.
const MAX_SUFFIX_ATTEMPTS: u32 = 64;

/// Transliterates a single Ukrainian Cyrillic letter to its Latin rendering.
///
/// Lookup is performed on the lowercased character, so capitals map to the
/// same output as their lowercase forms; letters outside the table yield
/// `None`.
fn transliterate_char(ch: char) -> Option<&'static str> {
    let mapped = match ch.to_lowercase().next().unwrap_or(ch) {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'є' => "ie",
        'ж' => "zh",
        'з' => "z",
        'и' => "y",
        'і' => "i",
        'ї' => "i",
        'й' => "i",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ю' => "iu",
        'я' => "ia",
        _ => return None,
    };
    Some(mapped)
}

/// Normalizes a file stem into a filesystem-safe ASCII name.
///
/// ASCII alphanumerics pass through unchanged, Cyrillic letters from the
/// transliteration table are replaced by their Latin renderings, and every
/// other character (spaces, punctuation, path separators, unmapped Unicode)
/// becomes an underscore. The result is never empty.
///
/// # Examples
///
/// ```
/// use foldersort::namer::normalize;
///
/// assert_eq!(normalize("звіт 2024"), "zvit_2024");
/// assert_eq!(normalize("Résumé"), "R_sum_");
/// assert_eq!(normalize("report-final"), "report_final");
/// assert_eq!(normalize(""), "unnamed");
/// ```
pub fn normalize(stem: &str) -> String {
    let mut result = String::with_capacity(stem.len());
    for ch in stem.chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch);
        } else if let Some(mapped) = transliterate_char(ch) {
            result.push_str(mapped);
        } else {
            result.push('_');
        }
    }
    if result.is_empty() {
        result.push_str(PLACEHOLDER_NAME);
    }
    result
}

/// Resolves `candidate` to a path that does not exist yet.
///
/// If nothing exists at `candidate` it is returned unchanged. Otherwise a
/// random hex suffix is inserted between the stem and the extension and the
/// check is repeated, in a bounded loop, until a free path is found. The
/// extension is always preserved.
///
/// The existence check is not atomic with the caller's subsequent create; a
/// concurrent writer can still race us. Single-run use only.
///
/// # Errors
///
/// Returns an error if the suffix attempts are exhausted, which indicates
/// something is feeding us colliding paths faster than randomness can fix.
pub fn unique_destination(candidate: &Path) -> io::Result<PathBuf> {
    if !candidate.exists() {
        return Ok(candidate.to_path_buf());
    }

    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());
    let extension = candidate
        .extension()
        .map(|e| e.to_string_lossy().into_owned());
    let parent = candidate.parent().unwrap_or_else(|| Path::new(""));

    for _ in 0..MAX_SUFFIX_ATTEMPTS {
        let suffix = Uuid::new_v4().simple().to_string();
        let file_name = match &extension {
            Some(ext) => format!("{}_{}.{}", stem, suffix, ext),
            None => format!("{}_{}", stem, suffix),
        };
        let attempt = parent.join(file_name);
        if !attempt.exists() {
            return Ok(attempt);
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!(
            "could not find a free name for {} after {} attempts",
            candidate.display(),
            MAX_SUFFIX_ATTEMPTS
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_passes_ascii_alphanumerics() {
        assert_eq!(normalize("report2024"), "report2024");
        assert_eq!(normalize("MixedCase"), "MixedCase");
    }

    #[test]
    fn test_normalize_transliterates_cyrillic() {
        assert_eq!(normalize("привіт"), "pryvit");
        assert_eq!(normalize("щастя"), "shchastia");
        assert_eq!(normalize("їжак"), "izhak");
    }

    #[test]
    fn test_normalize_uppercase_cyrillic_maps_lowercase() {
        // The table is keyed on the lowercased character, so capitals lose
        // their case.
        assert_eq!(normalize("Файл"), "fail");
        assert_eq!(normalize("фАйл"), "fail");
    }

    #[test]
    fn test_normalize_replaces_everything_else() {
        assert_eq!(normalize("my file (1)"), "my_file__1_");
        assert_eq!(normalize("a/b\\c"), "a_b_c");
        assert_eq!(normalize("Résumé"), "R_sum_");
    }

    #[test]
    fn test_normalize_never_empty() {
        assert_eq!(normalize(""), "unnamed");
        assert_ne!(normalize("..."), "");
    }

    #[test]
    fn test_normalize_output_is_safe() {
        for input in ["звіт:2024?", "a*b|c", "näme<>"] {
            let out = normalize(input);
            assert!(out.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        }
    }

    #[test]
    fn test_unique_destination_free_path_unchanged() {
        let temp = TempDir::new().unwrap();
        let candidate = temp.path().join("report.txt");
        let resolved = unique_destination(&candidate).unwrap();
        assert_eq!(resolved, candidate);
    }

    #[test]
    fn test_unique_destination_avoids_existing() {
        let temp = TempDir::new().unwrap();
        let candidate = temp.path().join("report.txt");
        fs::write(&candidate, "taken").unwrap();

        let resolved = unique_destination(&candidate).unwrap();
        assert_ne!(resolved, candidate);
        assert!(!resolved.exists());
        assert_eq!(resolved.extension().unwrap(), "txt");

        let name = resolved.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("report_"));
        // 32 hex characters of suffix between stem and extension.
        let suffix = name
            .trim_start_matches("report_")
            .trim_end_matches(".txt")
            .to_string();
        assert!(suffix.len() >= 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_unique_destination_without_extension() {
        let temp = TempDir::new().unwrap();
        let candidate = temp.path().join("photo");
        fs::write(&candidate, "taken").unwrap();

        let resolved = unique_destination(&candidate).unwrap();
        assert!(!resolved.exists());
        assert!(
            resolved
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("photo_")
        );
    }
}
