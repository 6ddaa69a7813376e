//! Path normalization utilities.
//!
//! Document paths are the identity of a preview session, so every path that
//! enters the pipeline goes through [`normalize_path`] first.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve a path that may be relative to a base directory.
///
/// Always returns an absolute path:
/// 1. If absolute, normalize as-is
/// 2. Otherwise, resolve relative to `base_dir`
#[inline]
pub fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize_path(path);
    }
    normalize_path(&base_dir.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_existing_relative_segments() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("chapters")).unwrap();
        std::fs::write(dir.path().join("main.tex"), "").unwrap();

        let dotted = dir.path().join("chapters").join("..").join("main.tex");
        assert_eq!(
            normalize_path(&dotted),
            dir.path().canonicalize().unwrap().join("main.tex")
        );
    }

    #[test]
    fn test_normalize_missing_absolute_kept() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.tex");
        assert_eq!(normalize_path(&missing), missing);
    }

    #[test]
    fn test_resolve_relative_to_base() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("paper.tex"), "").unwrap();
        assert_eq!(
            resolve_path(Path::new("paper.tex"), dir.path()),
            dir.path().canonicalize().unwrap().join("paper.tex")
        );
    }
}
