//! File naming and image saving.

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

use base64::Engine;
use chrono::Local;
use log::debug;

use crate::error::SaveError;

/// Random starting point for the per-process suffix sequence.
static SUFFIX_OFFSET: LazyLock<u32> = LazyLock::new(|| fastrand::u32(0..1000));
static SUFFIX_SEQ: AtomicU32 = AtomicU32::new(0);

/// Generate a file name of the form `icon_YYYYMMDDHHMMSSNNN.<format>`.
///
/// `NNN` starts at a random value and advances with every call, so names
/// produced within the same second by this process do not collide until
/// the thousandth call.
#[must_use]
pub fn generate_file_name(format: &str) -> String {
    let timestamp = Local::now().format("%Y%m%d%H%M%S");
    let seq = SUFFIX_SEQ.fetch_add(1, Ordering::Relaxed);
    let suffix = SUFFIX_OFFSET.wrapping_add(seq) % 1000;
    format!("icon_{timestamp}{suffix:03}.{format}")
}

/// Decode base64 image data and write it to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`SaveError::DecodeFailed`] for invalid base64 and
/// [`SaveError::WriteFailed`] if the file cannot be written.
pub fn save_image(b64: &str, path: &Path) -> Result<(), SaveError> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(b64.trim())?;

    let write_failed = |source| SaveError::WriteFailed { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_failed)?;
    }
    std::fs::write(path, &bytes).map_err(write_failed)?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn matches_pattern(name: &str, format: &str) -> bool {
        let Some(rest) = name.strip_prefix("icon_") else { return false };
        let Some(digits) = rest.strip_suffix(&format!(".{format}")) else { return false };
        digits.len() == 17 && digits.chars().all(|c| c.is_ascii_digit())
    }

    #[test]
    fn file_name_shape() {
        for format in ["png", "jpeg", "webp"] {
            let name = generate_file_name(format);
            assert!(matches_pattern(&name, format), "unexpected name {name}");
            assert_eq!(name.len(), 5 + 14 + 3 + 1 + format.len());
        }
    }

    #[test]
    fn successive_names_are_distinct() {
        let names: HashSet<String> = (0..10).map(|_| generate_file_name("png")).collect();
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn save_decodes_and_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/icon.png");
        save_image("aGVsbG8=", &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn save_rejects_bad_base64() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        assert!(matches!(save_image("not base64!!", &path), Err(SaveError::DecodeFailed(_))));
        assert!(!path.exists());
    }

    #[test]
    fn save_reports_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        // the target path is an existing directory
        let err = save_image("aGVsbG8=", dir.path()).unwrap_err();
        assert!(matches!(err, SaveError::WriteFailed { .. }));
    }
}
