//! The rewrite pass: upgrade `<img>` references to `<picture>` groups.
//!
//! Documents are parsed with `tl`, which neither decodes entities nor
//! normalizes markup. Each `<img>` outside an existing `<picture>` is
//! classified, and eligible ones are replaced by splicing
//!
//! ```html
//! <picture><source type="image/webp" srcset="photo.webp"><img ...></picture>
//! ```
//!
//! into the original text at the tag's byte span. The `<img>` itself is kept
//! verbatim (attribute order, quoting, and entities included) except for
//! one possible `loading` adjustment:
//!
//! - ordinary images gain `loading="lazy"` unless they already declare a
//!   loading behavior;
//! - eager (hero/header/logo) images lose an existing `loading="lazy"` and
//!   never gain one.
//!
//! Images already nested in a `<picture>` are skipped, which makes the pass
//! idempotent: a second run over a migrated document reports zero updates.
//! Documents are only written back when at least one reference changed.

use crate::classify::{self, ImageRef};
use crate::config::PipelineConfig;
use crate::locate::locate_documents;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTML parse error: {0}")]
    Parse(String),
}

/// Progress events emitted while the pass runs, one line each on the CLI.
#[derive(Debug, Clone, PartialEq)]
pub enum RewriteEvent {
    Updated { document: PathBuf, images: usize },
    Unchanged { document: PathBuf },
    Failed { document: PathBuf, reason: String },
}

/// Tallies for the end-of-pass summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    /// Documents discovered (zero means the pass had nothing to do).
    pub documents: usize,
    /// Documents rewritten on disk.
    pub updated: usize,
    /// Documents that failed to read, parse, or write.
    pub failed: usize,
    /// Total `<img>` references upgraded across all documents.
    pub images: usize,
}

impl fmt::Display for RewriteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.updated == 0 {
            write!(
                f,
                "No HTML files required updates (either already converted, or no matching .webp found)"
            )
        } else {
            write!(f, "Done. Updated {} HTML file(s)", self.updated)
        }
    }
}

static LAZY_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\s+loading\s*=\s*(?:"lazy"|'lazy'|lazy\b)"#).unwrap());

/// One planned replacement: the byte span of the original `<img>` tag and
/// the `<picture>` group text that takes its place.
struct Splice {
    start: usize,
    end: usize,
    replacement: String,
}

/// Byte span of a tag in the source text, derived from the parser's
/// zero-copy view: `raw()` borrows directly out of the input.
fn tag_span(tag: &tl::HTMLTag, parser: &tl::Parser) -> (usize, usize) {
    let (start, _) = tag.boundaries(parser);
    (start, start + tag.raw().as_bytes().len())
}

fn attr(tag: &tl::HTMLTag, name: &str) -> Option<String> {
    tag.attributes()
        .get(name)
        .flatten()
        .map(|bytes| bytes.as_utf8_str().into_owned())
}

fn has_attr(tag: &tl::HTMLTag, name: &str) -> bool {
    tag.attributes().get(name).is_some()
}

/// Spans of every tag matching `selector`, for containment checks.
fn selector_spans(dom: &tl::VDom, selector: &str) -> Vec<(usize, usize)> {
    let parser = dom.parser();
    dom.query_selector(selector)
        .into_iter()
        .flatten()
        .filter_map(|handle| handle.get(parser)?.as_tag().map(|t| tag_span(t, parser)))
        .collect()
}

/// Apply the loading policy to the raw `<img>` text.
fn adjust_loading(img: &str, eager: bool, has_loading: bool) -> String {
    if eager {
        // Hero/header imagery must never be deferred; strip a lazy attribute
        // but leave any other explicit loading value alone.
        return LAZY_ATTR.replace(img, "").into_owned();
    }
    if has_loading {
        return img.to_string();
    }
    if let Some(stripped) = img.strip_suffix("/>") {
        format!("{} loading=\"lazy\"/>", stripped.trim_end())
    } else if let Some(stripped) = img.strip_suffix('>') {
        format!("{} loading=\"lazy\">", stripped.trim_end())
    } else {
        img.to_string()
    }
}

/// Rewrite the markup of one document held in memory.
///
/// Returns the (possibly identical) output text and the number of
/// references upgraded. `doc_dir` anchors relative `src` resolution.
pub fn rewrite_markup(
    html: &str,
    doc_dir: &Path,
    config: &PipelineConfig,
) -> Result<(String, usize), RewriteError> {
    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|e| RewriteError::Parse(e.to_string()))?;
    let parser = dom.parser();

    let picture_spans = selector_spans(&dom, "picture");
    let already_wrapped =
        |start: usize, end: usize| picture_spans.iter().any(|&(s, e)| s <= start && end <= e);

    let mut splices: Vec<Splice> = Vec::new();

    for handle in dom.query_selector("img").into_iter().flatten() {
        let Some(tag) = handle.get(parser).and_then(|node| node.as_tag()) else {
            continue;
        };
        let (start, end) = tag_span(tag, parser);
        if already_wrapped(start, end) {
            continue;
        }

        let src = attr(tag, "src");
        let class = attr(tag, "class");
        let id = attr(tag, "id");
        let image = ImageRef {
            src: src.as_deref(),
            class: class.as_deref(),
            id: id.as_deref(),
        };
        let verdict = classify::classify(&image, doc_dir, config);
        let Some(webp) = verdict.webp_src else {
            continue;
        };

        let raw = tag.raw().as_utf8_str();
        let img_out = adjust_loading(&raw, verdict.eager, has_attr(tag, "loading"));
        splices.push(Splice {
            start,
            end,
            replacement: format!(
                r#"<picture><source type="image/webp" srcset="{webp}">{img_out}</picture>"#
            ),
        });
    }

    if splices.is_empty() {
        return Ok((html.to_string(), 0));
    }

    splices.sort_by_key(|s| s.start);
    let mut out = String::with_capacity(html.len() + splices.len() * 64);
    let mut cursor = 0;
    let mut count = 0;
    for splice in splices {
        // Spans come from distinct top-level <img> tags; overlap would mean
        // the parse went sideways, in which case the later span is dropped.
        if splice.start < cursor {
            continue;
        }
        out.push_str(&html[cursor..splice.start]);
        out.push_str(&splice.replacement);
        cursor = splice.end;
        count += 1;
    }
    out.push_str(&html[cursor..]);

    Ok((out, count))
}

/// Rewrite one document in place; returns how many references changed.
///
/// The file is only written when at least one reference was upgraded, so an
/// untouched document keeps its bytes and its timestamps.
pub fn rewrite_document(path: &Path, config: &PipelineConfig) -> Result<usize, RewriteError> {
    let original = fs::read_to_string(path)?;
    let doc_dir = path.parent().unwrap_or(Path::new(""));
    let (rewritten, count) = rewrite_markup(&original, doc_dir, config)?;
    if count > 0 {
        fs::write(path, rewritten)?;
    }
    Ok(count)
}

/// Run the rewrite pass over every document under `project_root`.
///
/// Documents are processed sequentially in discovery order; per-document
/// failures are reported and the run continues.
pub fn rewrite_all(
    project_root: &Path,
    config: &PipelineConfig,
    on_event: &mut dyn FnMut(RewriteEvent),
) -> RewriteSummary {
    let documents = locate_documents(project_root, &config.rewrite.exclude_dirs);
    let mut summary = RewriteSummary {
        documents: documents.len(),
        ..RewriteSummary::default()
    };

    for document in documents {
        match rewrite_document(&document, config) {
            Ok(0) => on_event(RewriteEvent::Unchanged { document }),
            Ok(images) => {
                summary.updated += 1;
                summary.images += images;
                on_event(RewriteEvent::Updated { document, images });
            }
            Err(e) => {
                summary.failed += 1;
                on_event(RewriteEvent::Failed {
                    document,
                    reason: e.to_string(),
                });
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::test_helpers::write_file;
    use tempfile::TempDir;

    fn rewrite_in(dir: &Path, html: &str) -> (String, usize) {
        rewrite_markup(html, dir, &PipelineConfig::default()).unwrap()
    }

    #[test]
    fn wraps_img_with_existing_artifact() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("a.webp"), b"x");

        let (out, count) = rewrite_in(tmp.path(), r#"<p><img src="a.jpg" alt="A"></p>"#);
        assert_eq!(count, 1);
        assert_eq!(
            out,
            r#"<p><picture><source type="image/webp" srcset="a.webp"><img src="a.jpg" alt="A" loading="lazy"></picture></p>"#
        );
    }

    #[test]
    fn missing_artifact_leaves_document_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let html = r#"<body><img src="c.jpg"> &amp; more</body>"#;

        let (out, count) = rewrite_in(tmp.path(), html);
        assert_eq!(count, 0);
        assert_eq!(out, html);
    }

    #[test]
    fn remote_reference_is_untouched() {
        let tmp = TempDir::new().unwrap();
        let html = r#"<img src="https://cdn.example.com/a.jpg">"#;

        let (out, count) = rewrite_in(tmp.path(), html);
        assert_eq!(count, 0);
        assert_eq!(out, html);
    }

    #[test]
    fn eager_image_never_gains_lazy() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("b.webp"), b"x");

        let (out, count) = rewrite_in(tmp.path(), r#"<img src="b.png" class="hero-banner">"#);
        assert_eq!(count, 1);
        assert!(!out.contains("loading"));
        assert!(out.contains(r#"srcset="b.webp""#));
    }

    #[test]
    fn eager_image_loses_existing_lazy() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("b.webp"), b"x");

        let (out, _) = rewrite_in(
            tmp.path(),
            r#"<img src="b.png" loading="lazy" id="site-logo">"#,
        );
        assert!(!out.contains("loading"));
        assert!(out.contains(r#"<img src="b.png" id="site-logo">"#));
    }

    #[test]
    fn explicit_loading_value_is_preserved() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("a.webp"), b"x");

        let (out, count) = rewrite_in(tmp.path(), r#"<img src="a.jpg" loading="eager">"#);
        assert_eq!(count, 1);
        assert!(out.contains(r#"<img src="a.jpg" loading="eager">"#));
        assert!(!out.contains("lazy"));
    }

    #[test]
    fn eager_image_keeps_non_lazy_loading_value() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("a.webp"), b"x");

        let (out, _) = rewrite_in(
            tmp.path(),
            r#"<img src="a.jpg" class="header" loading="eager">"#,
        );
        assert!(out.contains(r#"loading="eager""#));
    }

    #[test]
    fn attributes_survive_verbatim_in_order() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("a.webp"), b"x");

        let html = r#"<img width="640" src="a.jpg" data-x='1 > 0' alt="a &amp; b">"#;
        let (out, _) = rewrite_in(tmp.path(), html);
        assert!(out.contains(r#"<img width="640" src="a.jpg" data-x='1 > 0' alt="a &amp; b""#));
    }

    #[test]
    fn self_closing_img_keeps_its_slash() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("a.webp"), b"x");

        let (out, _) = rewrite_in(tmp.path(), r#"<img src="a.jpg" />"#);
        assert!(out.contains(r#"<img src="a.jpg" loading="lazy"/>"#));
    }

    #[test]
    fn untouched_regions_keep_raw_entities() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("a.webp"), b"x");

        let html = "<p>Tom &amp; Jerry&nbsp;again</p>\n<img src=\"a.jpg\">\n<p>&copy; 2026</p>";
        let (out, count) = rewrite_in(tmp.path(), html);
        assert_eq!(count, 1);
        assert!(out.starts_with("<p>Tom &amp; Jerry&nbsp;again</p>\n"));
        assert!(out.ends_with("\n<p>&copy; 2026</p>"));
    }

    #[test]
    fn second_pass_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("a.webp"), b"x");

        let (first, count) = rewrite_in(tmp.path(), r#"<div><img src="a.jpg"></div>"#);
        assert_eq!(count, 1);

        let (second, count) = rewrite_in(tmp.path(), &first);
        assert_eq!(count, 0, "migrated document must not be double-wrapped");
        assert_eq!(second, first);
    }

    #[test]
    fn handwritten_picture_groups_are_respected() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("a.webp"), b"x");

        let html = r#"<picture><source srcset="a.avif"><img src="a.jpg"></picture>"#;
        let (out, count) = rewrite_in(tmp.path(), html);
        assert_eq!(count, 0);
        assert_eq!(out, html);
    }

    #[test]
    fn mixed_document_rewrites_only_eligible_references() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join("yes.webp"), b"x");

        let html = concat!(
            r#"<img src="yes.jpg">"#,
            r#"<img src="no.jpg">"#,
            r#"<img src="https://x.test/yes.jpg">"#,
            r#"<img src="vector.svg">"#,
        );
        let (out, count) = rewrite_in(tmp.path(), html);
        assert_eq!(count, 1);
        assert!(out.contains(r#"<picture><source type="image/webp" srcset="yes.webp">"#));
        assert!(out.contains(r#"<img src="no.jpg">"#));
        assert!(out.contains(r#"<img src="https://x.test/yes.jpg">"#));
    }

    #[test]
    fn document_written_only_when_changed() {
        let tmp = TempDir::new().unwrap();
        let config = PipelineConfig::default();

        let doc = tmp.path().join("page.html");
        let html = r#"<img src="missing.jpg">"#;
        write_file(&doc, html.as_bytes());
        let before = std::fs::metadata(&doc).unwrap().modified().unwrap();

        let count = rewrite_document(&doc, &config).unwrap();
        assert_eq!(count, 0);
        assert_eq!(std::fs::read_to_string(&doc).unwrap(), html);
        let after = std::fs::metadata(&doc).unwrap().modified().unwrap();
        assert_eq!(before, after, "unchanged document must not be rewritten");
    }

    #[test]
    fn rewrite_all_reports_each_document() {
        let tmp = TempDir::new().unwrap();
        let config = PipelineConfig::default();
        write_file(&tmp.path().join("a.webp"), b"x");
        write_file(&tmp.path().join("index.html"), br#"<img src="a.jpg">"#);
        write_file(&tmp.path().join("about.html"), br#"<img src="b.jpg">"#);

        let mut events = Vec::new();
        let summary = rewrite_all(tmp.path(), &config, &mut |e| events.push(e));

        assert_eq!(summary.documents, 2);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.images, 1);
        assert_eq!(summary.failed, 0);
        assert!(events.iter().any(|e| matches!(
            e,
            RewriteEvent::Updated { document, images: 1 } if document.ends_with("index.html")
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            RewriteEvent::Unchanged { document } if document.ends_with("about.html")
        )));
    }

    #[test]
    fn rewrite_all_with_no_documents_is_distinct() {
        let tmp = TempDir::new().unwrap();
        let summary = rewrite_all(tmp.path(), &PipelineConfig::default(), &mut |_| {});
        assert_eq!(summary.documents, 0);
        assert_eq!(summary.updated, 0);
    }

    #[test]
    fn excluded_directories_are_not_rewritten() {
        let tmp = TempDir::new().unwrap();
        let config = PipelineConfig::default();
        write_file(&tmp.path().join("node_modules/a.webp"), b"x");
        let vendored = tmp.path().join("node_modules/page.html");
        let html = r#"<img src="a.jpg">"#;
        write_file(&vendored, html.as_bytes());

        let summary = rewrite_all(tmp.path(), &config, &mut |_| {});
        assert_eq!(summary.documents, 0);
        assert_eq!(std::fs::read_to_string(&vendored).unwrap(), html);
    }

    #[test]
    fn summary_display_distinguishes_updates() {
        let none = RewriteSummary {
            documents: 3,
            ..RewriteSummary::default()
        };
        assert!(none.to_string().starts_with("No HTML files required updates"));

        let some = RewriteSummary {
            documents: 3,
            updated: 2,
            failed: 0,
            images: 5,
        };
        assert_eq!(some.to_string(), "Done. Updated 2 HTML file(s)");
    }
}
