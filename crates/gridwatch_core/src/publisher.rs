//! File publisher
//!
//! Replaces the output artifact with the freshly rendered lines. Always a
//! full-file overwrite, never an append or patch: the file must reflect
//! exactly the latest accepted projection with no stale tail from a longer
//! previous render.

use crate::error::{CoreError, Result};
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Write the concatenated lines to `path`, replacing any prior content.
///
/// The content lands in a sibling temp file first and is renamed into place,
/// so readers of the artifact never observe a torn write. No separator is
/// inserted between lines; templates carry their own terminators.
pub fn publish(lines: &[String], path: &Path) -> Result<()> {
    let content = lines.concat();
    let tmp_path = path.with_file_name(tmp_name(path));

    fs::write(&tmp_path, &content).map_err(|source| CoreError::Publish {
        path: path.to_path_buf(),
        source,
    })?;
    fs::rename(&tmp_path, path).map_err(|source| CoreError::Publish {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), bytes = content.len(), "Published artifact");
    Ok(())
}

fn tmp_name(path: &Path) -> OsString {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_creates_file_with_concatenated_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        publish(&lines(&["Alice - Lead\n", "Bob - Eng\n"]), &path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Alice - Lead\nBob - Eng\n"
        );
    }

    #[test]
    fn test_overwrite_leaves_no_stale_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        publish(&lines(&["a much longer first version\n"]), &path).unwrap();
        publish(&lines(&["short\n"]), &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "short\n");
    }

    #[test]
    fn test_publish_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let rendered = lines(&["Alice - Lead\n", "Bob - Eng\n"]);
        publish(&rendered, &path).unwrap();
        let first = fs::read(&path).unwrap();
        publish(&rendered, &path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), first);
    }

    #[test]
    fn test_missing_parent_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.txt");
        let err = publish(&lines(&["x\n"]), &path).unwrap_err();
        assert!(matches!(err, CoreError::Publish { .. }));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        publish(&lines(&["x\n"]), &path).unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![OsString::from("out.txt")]);
    }
}
