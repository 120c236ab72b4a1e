//! # webpify
//!
//! A build-time WebP pipeline for static websites. Point it at a site tree
//! and it prepares the tree for deployment in two passes:
//!
//! ```text
//! 1. Convert   scan roots  →  sibling .webp artifacts  (JPEG/PNG → WebP)
//! 2. Rewrite   *.html      →  <picture> fallback groups (in place)
//! ```
//!
//! The convert pass walks every configured root directory and transcodes each
//! eligible raster image to a lossy WebP file next to the original. The
//! rewrite pass then upgrades `<img>` references whose WebP counterpart
//! exists on disk to a format-negotiating group:
//!
//! ```html
//! <picture><source type="image/webp" srcset="photo.webp"><img src="photo.jpg" loading="lazy"></picture>
//! ```
//!
//! Both passes are best-effort batch jobs: a bad file is reported and the run
//! continues. Both are idempotent: re-running convert regenerates the same
//! artifacts, and re-running rewrite leaves already-wrapped images alone.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`convert`] | Pass 1: walks scan roots and drives transcoding, one file at a time |
//! | [`rewrite`] | Pass 2: rewrites `<img>` references in discovered HTML documents |
//! | [`walk`] | Recursive file enumeration under a single root |
//! | [`locate`] | HTML document discovery with infrastructure directories excluded |
//! | [`classify`] | Per-reference eligibility and eager-loading classification |
//! | [`formats`] | The shared extension rule: eligibility + `.webp` sibling derivation |
//! | [`imaging`] | Image transcoding backend: `image` decode, `webp` encode |
//! | [`config`] | Optional `webpify.toml` loading, validation, stock config |
//! | [`output`] | CLI output formatting, pure `format_*` functions per event |
//!
//! # Design Decisions
//!
//! ## Splice, Don't Re-serialize
//!
//! The rewriter never round-trips documents through a DOM serializer. It
//! parses with [`tl`](https://docs.rs/tl) (zero-copy, no entity decoding),
//! computes the byte span of each `<img>` tag, and splices replacement groups
//! into the original text. Untouched markup (entities, whitespace, attribute
//! order, authorial quirks) survives byte-for-byte, and a document with no
//! eligible references is never written at all.
//!
//! ## Filesystem as the Source of Truth
//!
//! The rewrite pass decides eligibility by probing for the `.webp` artifact
//! next to the referenced image, freshly for every reference. There is no
//! manifest linking the passes and no cache between runs: an image that was
//! never converted simply keeps its plain `<img>` tag until a later run
//! converts it. "Not yet migrated" is a steady state, not an error.
//!
//! ## Eager Images Stay Eager
//!
//! Lazy-loading above-the-fold imagery hurts paint times, so the rewriter
//! keeps a hint list (`hero`, `header`, `banner`, `logo`, `site-logo`). An
//! image whose class or id contains a hint never gains `loading="lazy"`, and
//! an existing `loading="lazy"` on such an image is removed. This is a
//! deliberate string-containment heuristic, not a layout computation.

pub mod classify;
pub mod config;
pub mod convert;
pub mod formats;
pub mod imaging;
pub mod locate;
pub mod output;
pub mod rewrite;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;
