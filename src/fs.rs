//! Filesystem helpers shared by rule setup and mcp.json generation

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::RuledeckResult;

/// Write content to a file atomically
///
/// The content goes to a temp file in the same directory which is then
/// renamed over `path`, so readers never see a half-written file.
/// Parent directories are created as needed.
pub fn write_atomic(path: &Path, content: &str) -> RuledeckResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)?;

    let mut tmp = NamedTempFile::new_in(&parent)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn write_atomic_new_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.mdc");

        write_atomic(&path, "Hello, World!").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "Hello, World!");
    }

    #[test]
    fn write_atomic_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.mdc");

        fs::write(&path, "Original").unwrap();
        write_atomic(&path, "Replaced").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "Replaced");
    }

    #[test]
    fn write_atomic_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".cursor").join("mcp.json");

        write_atomic(&path, "{}").unwrap();

        assert!(path.exists());
        // No stray temp files left next to the target
        assert_eq!(fs::read_dir(dir.path().join(".cursor")).unwrap().count(), 1);
    }

    #[test]
    fn expand_home_leaves_plain_paths_alone() {
        assert_eq!(
            expand_home(Path::new("/opt/templates")),
            PathBuf::from("/opt/templates")
        );
    }

    #[test]
    fn expand_home_replaces_tilde() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(
            expand_home(Path::new("~/rules")),
            home.join("rules")
        );
    }
}
