//! Path helpers

use std::path::{Path, PathBuf};

/// Directory component of `path`
///
/// Returns `"."` for a bare file name so that relative joins keep pointing at
/// the current directory.
pub fn directory_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
