//! Filesystem helpers shared by the publisher

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Remove a directory tree if it exists. Absence is not an error.
pub fn remove_recursively(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_removes_a_populated_tree() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("nested/file"), "content").unwrap();

        remove_recursively(&root).unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn test_tolerates_a_missing_path() {
        let dir = TempDir::new().unwrap();
        assert!(remove_recursively(&dir.path().join("absent")).is_ok());
    }
}
