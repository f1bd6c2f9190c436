//! Idempotent filesystem primitives used by the sync workflow.
//!
//! Every operation is a no-op when its precondition is already satisfied,
//! so cleanup code can call them unconditionally.

use std::io;
use std::path::{Path, PathBuf};

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    std::fs::create_dir_all(path)
}

/// Delete `path` if it is a regular file.
pub fn remove_file(path: &Path) -> io::Result<()> {
    if path.is_file() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

/// Rename `source` to `destination` if `source` is a regular file.
///
/// Both paths must live on the same filesystem for the rename to be atomic.
pub fn rename_file(source: &Path, destination: &Path) -> io::Result<()> {
    if source.is_file() {
        std::fs::rename(source, destination)?;
    }
    Ok(())
}

/// Remove a directory and everything beneath it, depth-first.
pub fn remove_dir_recursive(path: &Path) -> io::Result<()> {
    if !path.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let child = entry.path();
        if entry.file_type()?.is_dir() {
            remove_dir_recursive(&child)?;
        } else {
            std::fs::remove_file(&child)?;
        }
    }
    std::fs::remove_dir(path)
}

/// Look for a regular file called `name` exactly one directory level below
/// `dir`.
///
/// Archives unpack into a single top-level folder (`<dir>/<folder>/<name>`),
/// so only immediate subdirectories are searched. Candidates are visited in
/// sorted order to keep the result deterministic; entries with the right name
/// that are not regular files are skipped.
pub fn find_by_name(name: &str, dir: &Path) -> Option<PathBuf> {
    let mut subdirs: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    subdirs.sort();

    subdirs
        .into_iter()
        .map(|subdir| subdir.join(name))
        .find(|candidate| candidate.is_file())
}
