//! File discovery inside flight folders
//!
//! Recursive lookups collect every match and return them sorted, so callers
//! that want "the" JSON or MRK file get the lexicographically smallest path
//! instead of whatever the filesystem happened to enumerate first.

use crate::error::Result;
use log::warn;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum directory depth below a flight folder
const MAX_RECURSION_DEPTH: usize = 32;

/// True when `path` has the extension `ext` (ASCII case-insensitive, no dot)
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// All files with extension `ext` directly inside `dir`, sorted by name
pub fn files_in_dir(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, ext) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// All files with extension `ext` anywhere under `dir`, sorted by path
pub fn files_recursive(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut visited = HashSet::new();
    let mut found = Vec::new();
    walk(dir, ext, &mut visited, &mut found, 0)?;
    found.sort();
    Ok(found)
}

/// First match of [`files_recursive`] in path order, warning when there are several
pub fn first_recursive(dir: &Path, ext: &str) -> Result<Option<PathBuf>> {
    let mut found = files_recursive(dir, ext)?;
    if found.len() > 1 {
        warn!(
            "{} .{} files under {}, using {}",
            found.len(),
            ext,
            dir.display(),
            found[0].display()
        );
    }
    Ok(if found.is_empty() {
        None
    } else {
        Some(found.swap_remove(0))
    })
}

/// Subdirectories of `dir`, sorted by path
pub fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn walk(
    dir: &Path,
    ext: &str,
    visited: &mut HashSet<PathBuf>,
    found: &mut Vec<PathBuf>,
    depth: usize,
) -> Result<()> {
    // A bad branch below the flight folder is skipped, the folder itself must be readable
    if depth > MAX_RECURSION_DEPTH {
        warn!(
            "Skipping '{}': nested deeper than {} levels",
            dir.display(),
            MAX_RECURSION_DEPTH
        );
        return Ok(());
    }

    // Symlinked directories can loop back on themselves
    let canonical = match dir.canonicalize() {
        Ok(canonical) => canonical,
        Err(e) if depth > 0 => {
            warn!("Skipping '{}': {}", dir.display(), e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    if !visited.insert(canonical) {
        return Ok(());
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if depth > 0 => {
            warn!("Skipping unreadable directory '{}': {}", dir.display(), e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cannot read entry in '{}': {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            walk(&path, ext, visited, found, depth + 1)?;
        } else if path.is_file() && has_extension(&path, ext) {
            found.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extension_match_is_case_insensitive() {
        assert!(has_extension(Path::new("a/DJI_0001.JPG"), "jpg"));
        assert!(has_extension(Path::new("flight.Mrk"), "mrk"));
        assert!(!has_extension(Path::new("flight.mrk.bak"), "mrk"));
        assert!(!has_extension(Path::new("README"), "json"));
    }

    #[test]
    fn test_recursive_results_are_sorted() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::create_dir_all(root.join("a/deep")).unwrap();
        fs::write(root.join("b/one.json"), "{}").unwrap();
        fs::write(root.join("a/deep/two.JSON"), "{}").unwrap();
        fs::write(root.join("a/notes.txt"), "").unwrap();

        let found = files_recursive(root, "json").unwrap();
        assert_eq!(
            found,
            vec![root.join("a/deep/two.JSON"), root.join("b/one.json")]
        );
        assert_eq!(
            first_recursive(root, "json").unwrap(),
            Some(root.join("a/deep/two.JSON"))
        );
        assert_eq!(first_recursive(root, "mrk").unwrap(), None);
    }

    #[test]
    fn test_files_in_dir_is_not_recursive() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("sub/scan.LDR"), "").unwrap();
        assert!(files_in_dir(root, "ldr").unwrap().is_empty());

        fs::write(root.join("top.ldr"), "").unwrap();
        assert_eq!(files_in_dir(root, "ldr").unwrap(), vec![root.join("top.ldr")]);
    }

    #[test]
    fn test_too_deep_branch_is_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("flight.mrk"), "").unwrap();
        let mut deep = root.to_path_buf();
        for _ in 0..MAX_RECURSION_DEPTH + 2 {
            deep.push("d");
        }
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("buried.mrk"), "").unwrap();

        let found = files_recursive(root, "mrk").unwrap();
        assert_eq!(found, vec![root.join("flight.mrk")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("open")).unwrap();
        fs::write(root.join("open/flight.json"), "{}").unwrap();
        let locked = root.join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("hidden.json"), "{}").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let found = files_recursive(root, "json");
        // Restore so TempDir can clean up
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let found = found.expect("unreadable branch must not fail the search");
        assert!(found.contains(&root.join("open/flight.json")));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(files_recursive(&temp.path().join("gone"), "json").is_err());
    }
}
