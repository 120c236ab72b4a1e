//! CLI output formatting for both passes.
//!
//! Each pass has `format_*` functions (pure, return `String`) and a
//! `print_*` wrapper that writes to stdout. Format functions never touch the
//! filesystem, so tests can assert on exact console text.
//!
//! ```text
//! OK  assets/gallery/dawn.jpg -> assets/gallery/dawn.webp
//! ERR assets/gallery/broken.jpg: Failed to decode ...
//! Skip (missing): screenshots
//! Updated: blog/post.html (2 images)
//! No changes: index.html
//! ```
//!
//! Paths are shown relative to the project root where possible; events
//! carry full paths and relativization happens here, at the display edge.

use crate::convert::{ConvertEvent, ConvertSummary};
use crate::rewrite::{RewriteEvent, RewriteSummary};
use std::path::Path;

/// Render a path relative to the project root for display.
fn rel(path: &Path, project_root: &Path) -> String {
    path.strip_prefix(project_root)
        .unwrap_or(path)
        .display()
        .to_string()
}

pub fn format_convert_event(event: &ConvertEvent, project_root: &Path) -> String {
    match event {
        ConvertEvent::MissingRoot { root } => {
            format!("Skip (missing): {}", rel(root, project_root))
        }
        ConvertEvent::Converted { source, output } => {
            format!(
                "OK  {} -> {}",
                rel(source, project_root),
                rel(output, project_root)
            )
        }
        ConvertEvent::Failed { source, reason } => {
            format!("ERR {}: {}", rel(source, project_root), reason)
        }
    }
}

pub fn format_convert_summary(summary: &ConvertSummary) -> String {
    format!("Done. {}.", summary)
}

pub fn format_rewrite_event(event: &RewriteEvent, project_root: &Path) -> String {
    match event {
        RewriteEvent::Updated { document, images } => {
            format!(
                "Updated: {} ({} image{})",
                rel(document, project_root),
                images,
                if *images == 1 { "" } else { "s" }
            )
        }
        RewriteEvent::Unchanged { document } => {
            format!("No changes: {}", rel(document, project_root))
        }
        RewriteEvent::Failed { document, reason } => {
            format!("ERR {}: {}", rel(document, project_root), reason)
        }
    }
}

/// Summary line for the rewrite pass; `None` documents is the distinct
/// nothing-to-do outcome.
pub fn format_rewrite_summary(summary: &RewriteSummary) -> String {
    if summary.documents == 0 {
        "No HTML files found.".to_string()
    } else {
        format!("{}.", summary)
    }
}

pub fn print_convert_event(event: &ConvertEvent, project_root: &Path) {
    println!("{}", format_convert_event(event, project_root));
}

pub fn print_rewrite_event(event: &RewriteEvent, project_root: &Path) {
    println!("{}", format_rewrite_event(event, project_root));
}
