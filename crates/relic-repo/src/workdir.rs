//! Working-directory file helpers.
//!
//! Paths handed to the repository are flat names relative to the working
//! directory, matching what [`working_paths`] enumerates.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::RepoResult;
use crate::repository::META_DIR_NAME;

/// Enumerate the regular files at the top level of the working directory,
/// sorted. The repository metadata directory is skipped.
pub fn working_paths(workdir: &Path) -> RepoResult<Vec<String>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(workdir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == META_DIR_NAME {
            continue;
        }
        paths.push(name);
    }
    Ok(paths)
}

/// Read a working-directory file's content.
pub fn read_file(workdir: &Path, path: &str) -> RepoResult<Vec<u8>> {
    Ok(fs::read(workdir.join(path))?)
}

/// Write (create or overwrite) a working-directory file.
pub fn write_file(workdir: &Path, path: &str, data: &[u8]) -> RepoResult<()> {
    let full = workdir.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(full, data)?;
    Ok(())
}

/// Delete a working-directory file if it exists.
pub fn delete_file(workdir: &Path, path: &str) -> RepoResult<()> {
    let full = workdir.join(path);
    match fs::remove_file(full) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Returns `true` if the working-directory file exists.
pub fn file_exists(workdir: &Path, path: &str) -> bool {
    workdir.join(path).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn working_paths_lists_top_level_files_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();
        fs::write(dir.path().join("subdir/nested.txt"), "n").unwrap();

        let paths = working_paths(dir.path()).unwrap();
        assert_eq!(paths, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn working_paths_skips_the_metadata_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(META_DIR_NAME)).unwrap();
        fs::write(dir.path().join(META_DIR_NAME).join("HEAD"), "x").unwrap();
        fs::write(dir.path().join("real.txt"), "r").unwrap();

        let paths = working_paths(dir.path()).unwrap();
        assert_eq!(paths, vec!["real.txt"]);
    }

    #[test]
    fn file_roundtrip_and_delete() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "f.txt", b"content").unwrap();
        assert!(file_exists(dir.path(), "f.txt"));
        assert_eq!(read_file(dir.path(), "f.txt").unwrap(), b"content");

        delete_file(dir.path(), "f.txt").unwrap();
        assert!(!file_exists(dir.path(), "f.txt"));
        // Deleting again is a quiet no-op.
        delete_file(dir.path(), "f.txt").unwrap();
    }
}
