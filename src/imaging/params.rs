//! Parameter types for transcode operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the convert driver (which decides what to transcode)
//! and the [`backend`](super::backend) (which does the actual pixel work),
//! so backends can be swapped (e.g. for a mock in tests) without changing
//! driver logic.

use std::path::PathBuf;

/// Quality setting for lossy WebP encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Full specification of one transcode: source, output path, quality.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub quality: Quality,
}
