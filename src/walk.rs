//! Recursive file enumeration under a scan root.
//!
//! The convert pass feeds every regular file below each configured root to
//! the transcoder. Enumeration is lazy (files are visited as the iterator is
//! consumed) and deterministic (entries sorted by file name at every level).
//! Directories are never yielded, and directory symlinks are not followed,
//! so a symlink cycle cannot trap the traversal.
//!
//! A missing root produces an empty sequence; the driver decides whether
//! that deserves a warning.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// All regular files transitively under `root`, in sorted order.
///
/// Unreadable entries are silently dropped; the convert pass treats the
/// directory listing itself as best-effort.
pub fn walk_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
}
