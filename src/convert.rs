//! The convert pass: scan roots → sibling WebP artifacts.
//!
//! Walks every configured root in order and feeds each file to the
//! transcoder, strictly sequentially. A missing root is a warning, an
//! ineligible file is silently skipped, and a failed transcode is reported.
//! None of them stop the batch. The pass always runs to completion.
//!
//! Per-file results are typed ([`TranscodeOutcome`]) rather than bare log
//! lines, so tests can assert on failure accounting; the driver turns them
//! into [`ConvertEvent`]s for the CLI printer and tallies a
//! [`ConvertSummary`].

use crate::config::ConvertConfig;
use crate::formats;
use crate::imaging::{ImageBackend, Quality, TranscodeParams};
use crate::walk::walk_files;
use std::fmt;
use std::path::{Path, PathBuf};

/// Result of offering one file to the transcoder.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscodeOutcome {
    /// Extension not in the allow-list; no side effects.
    Skipped,
    /// WebP artifact written next to the source.
    Converted { output: PathBuf },
    /// Decode/encode/IO failure; source left untouched.
    Failed { reason: String },
}

/// Progress events emitted while the pass runs, one line each on the CLI.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertEvent {
    /// A configured root does not exist and was skipped.
    MissingRoot { root: PathBuf },
    Converted { source: PathBuf, output: PathBuf },
    Failed { source: PathBuf, reason: String },
}

/// Tallies for the end-of-pass summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub missing_roots: usize,
}

impl fmt::Display for ConvertSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Converted {} image(s), {} failure(s), {} skipped",
            self.converted, self.failed, self.skipped
        )
    }
}

/// Transcode a single file, if it is eligible.
///
/// Eligibility is decided by extension alone; the output path is the WebP
/// sibling in the same directory. All failures are captured in the outcome;
/// this function never returns an error.
pub fn transcode_file(
    backend: &impl ImageBackend,
    path: &Path,
    config: &ConvertConfig,
) -> TranscodeOutcome {
    let Some(output) = formats::webp_sibling(path, &config.extensions) else {
        return TranscodeOutcome::Skipped;
    };

    let params = TranscodeParams {
        source: path.to_path_buf(),
        output: output.clone(),
        quality: Quality::new(config.quality),
    };

    match backend.transcode(&params) {
        Ok(()) => TranscodeOutcome::Converted { output },
        Err(e) => TranscodeOutcome::Failed {
            reason: e.to_string(),
        },
    }
}

/// Run the convert pass over every configured root.
///
/// Roots are resolved relative to `project_root` and processed in config
/// order; files within a root are visited in walk order, one at a time.
/// Events stream through `on_event` as they happen.
pub fn convert(
    project_root: &Path,
    config: &ConvertConfig,
    backend: &impl ImageBackend,
    on_event: &mut dyn FnMut(ConvertEvent),
) -> ConvertSummary {
    let mut summary = ConvertSummary::default();

    for root in &config.roots {
        let root = project_root.join(root);
        if !root.exists() {
            summary.missing_roots += 1;
            on_event(ConvertEvent::MissingRoot { root });
            continue;
        }

        for path in walk_files(&root) {
            match transcode_file(backend, &path, config) {
                TranscodeOutcome::Skipped => summary.skipped += 1,
                TranscodeOutcome::Converted { output } => {
                    summary.converted += 1;
                    on_event(ConvertEvent::Converted {
                        source: path,
                        output,
                    });
                }
                TranscodeOutcome::Failed { reason } => {
                    summary.failed += 1;
                    on_event(ConvertEvent::Failed {
                        source: path,
                        reason,
                    });
                }
            }
        }
    }

    summary
}
