//! Per-reference classification for the rewrite pass.
//!
//! For every `<img>` the rewriter finds, two independent questions are
//! answered here:
//!
//! 1. **Eligibility**: should this reference be upgraded to a `<picture>`
//!    group? Yes iff the `src` is a local path with a transcodable extension
//!    whose WebP counterpart exists on disk right now. Remote URLs are never
//!    probed; a missing artifact is the expected "not yet converted" state.
//! 2. **Eagerness**: must this image keep loading eagerly? Yes iff its
//!    class or id contains one of the configured hints. Deliberately a crude
//!    substring check: `class="hero-banner"` and `id="siteLogo"` both count.
//!
//! Classification never fails. Anything malformed (missing src, odd path,
//! unreadable attribute) degrades to "not eligible" and the reference is
//! left alone.

use crate::config::PipelineConfig;
use crate::formats;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static ABSOLUTE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").unwrap());

/// One `<img>` reference as seen by the rewriter, attribute values raw.
#[derive(Debug, Clone, Default)]
pub struct ImageRef<'a> {
    pub src: Option<&'a str>,
    pub class: Option<&'a str>,
    pub id: Option<&'a str>,
}

/// Classification result for one reference.
#[derive(Debug, Clone, PartialEq)]
pub struct RefClass {
    /// `Some(srcset value)` when the reference should be rewritten, i.e.
    /// the WebP counterpart was found next to the referenced file.
    pub webp_src: Option<String>,
    /// True when the image must keep loading eagerly.
    pub eager: bool,
}

impl RefClass {
    pub fn eligible(&self) -> bool {
        self.webp_src.is_some()
    }
}

/// Classify one reference hosted by a document in `doc_dir`.
pub fn classify(image: &ImageRef<'_>, doc_dir: &Path, config: &PipelineConfig) -> RefClass {
    let eager = has_eager_hint(image, &config.rewrite.eager_hints);
    RefClass {
        webp_src: candidate_webp(image, doc_dir, config),
        eager,
    }
}

fn candidate_webp(image: &ImageRef<'_>, doc_dir: &Path, config: &PipelineConfig) -> Option<String> {
    let src = image.src?;
    let webp = formats::webp_src(src, &config.convert.extensions)?;

    // Remote references are never rewritten; existence is only ever
    // checked for locally resolvable paths.
    if ABSOLUTE_URL.is_match(src) {
        return None;
    }

    // Resolve against the hosting document; an absolute path wins the join.
    let candidate = doc_dir.join(&webp);
    candidate.is_file().then_some(webp)
}

fn has_eager_hint(image: &ImageRef<'_>, hints: &[String]) -> bool {
    let class = image.class.unwrap_or("").to_lowercase();
    let id = image.id.unwrap_or("").to_lowercase();
    hints
        .iter()
        .any(|hint| class.contains(hint.as_str()) || id.contains(hint.as_str()))
}
