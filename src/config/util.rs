//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
/// Returns the absolute path to the config file if found.
///
/// # Example
/// ```text
/// /home/user/thesis/chapters/  ← start
/// /home/user/thesis/texmex.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_parent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("chapters/intro");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("texmex.toml"), "").unwrap();

        let found = find_config_file(Path::new("texmex.toml"), &nested).unwrap();
        assert_eq!(found, dir.path().join("texmex.toml"));
    }

    #[test]
    fn test_find_config_prefers_nearest() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("sub");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("texmex.toml"), "").unwrap();
        fs::write(nested.join("texmex.toml"), "").unwrap();

        let found = find_config_file(Path::new("texmex.toml"), &nested).unwrap();
        assert_eq!(found, nested.join("texmex.toml"));
    }

    #[test]
    fn test_find_config_absolute_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(find_config_file(&missing, dir.path()).is_none());
    }

    #[test]
    fn test_find_config_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(find_config_file(Path::new("texmex-unlikely-name.toml"), dir.path()).is_none());
    }
}
