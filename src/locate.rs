//! HTML document discovery for the rewrite pass.
//!
//! Finds every `*.html` file under the project root, skipping infrastructure
//! directories (dependency caches, version control metadata, build output)
//! at any depth. The excluded names come from config so tests can substitute
//! their own.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extension of the documents the rewrite pass operates on.
const DOCUMENT_EXT: &str = "html";

fn is_excluded_dir(entry: &DirEntry, exclude_dirs: &[String]) -> bool {
    // depth 0 is the project root itself, which is never excluded even if
    // it happens to be named like an excluded directory
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| exclude_dirs.iter().any(|d| d == name))
}

fn is_document(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXT))
}

/// All HTML documents under `root`, in sorted order, minus excluded trees.
pub fn locate_documents(root: &Path, exclude_dirs: &[String]) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry, exclude_dirs))
        .filter_map(|entry| entry.ok())
        .filter(is_document)
        .map(|entry| entry.into_path())
        .collect()
}
