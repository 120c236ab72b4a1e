//! The shared filename rule: which files are transcodable, and where their
//! WebP counterpart lives.
//!
//! Both passes use the same extension substitution (the convert pass on
//! filesystem paths, the rewrite pass on `src` attribute strings), so the
//! rule lives in one place. The substitution keeps the directory and stem
//! and swaps the extension for `.webp`:
//!
//! - `assets/photo.jpg` → `assets/photo.webp`
//! - `../img/Shot.PNG` → `../img/Shot.webp`
//! - `styles.css` → not eligible

use std::path::{Path, PathBuf};

/// Extension of the artifacts the convert pass produces.
pub const TARGET_EXT: &str = "webp";

/// Whether an extension (without dot) is in the allow-list, case-insensitively.
pub fn eligible_extension(ext: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|a| a.eq_ignore_ascii_case(ext))
}

/// Derive the WebP sibling path for a source file.
///
/// Returns `None` when the file's extension is not in the allow-list; the
/// file is then not a transcoding candidate at all.
pub fn webp_sibling(path: &Path, allowed: &[String]) -> Option<PathBuf> {
    let ext = path.extension()?.to_str()?;
    if !eligible_extension(ext, allowed) {
        return None;
    }
    Some(path.with_extension(TARGET_EXT))
}

/// Derive the WebP counterpart of an `src` attribute value.
///
/// String-based variant of [`webp_sibling`] for markup references: the
/// original string is preserved up to the final dot, so relative segments,
/// leading slashes, and URL-ish prefixes pass through untouched.
/// Returns `None` when there is no recognizable eligible extension.
pub fn webp_src(src: &str, allowed: &[String]) -> Option<String> {
    let name_start = src.rfind('/').map(|i| i + 1).unwrap_or(0);
    let dot = src[name_start..].rfind('.')? + name_start;
    let ext = &src[dot + 1..];
    if ext.is_empty() || !eligible_extension(ext, allowed) {
        return None;
    }
    Some(format!("{}.{}", &src[..dot], TARGET_EXT))
}
