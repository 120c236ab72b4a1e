//! Transcoding backend trait and shared error type.
//!
//! The [`ImageBackend`] trait is the seam between the convert driver and the
//! pixel work. The production implementation is
//! [`WebpBackend`](super::webp_backend::WebpBackend); tests substitute the
//! recording [`tests::MockBackend`] so driver behavior can be exercised
//! without encoding a single image.

use super::params::TranscodeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for transcoding backends.
pub trait ImageBackend {
    /// Read `params.source`, transcode it, and write `params.output`.
    ///
    /// The source file must never be modified; the output is created or
    /// overwritten as a whole (no partial writes).
    fn transcode(&self, params: &TranscodeParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Mock backend that records operations without executing them.
    ///
    /// Paths listed in `fail_sources` produce a [`BackendError`] instead,
    /// which is how driver tests script per-file failures.
    #[derive(Default)]
    pub struct MockBackend {
        pub operations: RefCell<Vec<TranscodeParams>>,
        pub fail_sources: Vec<std::path::PathBuf>,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(sources: Vec<std::path::PathBuf>) -> Self {
            Self {
                operations: RefCell::new(Vec::new()),
                fail_sources: sources,
            }
        }

        pub fn recorded(&self) -> Vec<TranscodeParams> {
            self.operations.borrow().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn transcode(&self, params: &TranscodeParams) -> Result<(), BackendError> {
            self.operations.borrow_mut().push(params.clone());
            if self.fail_sources.contains(&params.source) {
                return Err(BackendError::ProcessingFailed(format!(
                    "mock failure for {}",
                    params.source.display()
                )));
            }
            Ok(())
        }
    }

    #[test]
    fn mock_records_transcodes() {
        let backend = MockBackend::new();
        let params = TranscodeParams {
            source: "/in/a.jpg".into(),
            output: "/in/a.webp".into(),
            quality: crate::imaging::Quality::new(80),
        };
        backend.transcode(&params).unwrap();

        assert_eq!(backend.recorded(), vec![params]);
    }

    #[test]
    fn mock_fails_on_scripted_sources() {
        let backend = MockBackend::failing_on(vec!["/in/bad.jpg".into()]);
        let result = backend.transcode(&TranscodeParams {
            source: "/in/bad.jpg".into(),
            output: "/in/bad.webp".into(),
            quality: crate::imaging::Quality::default(),
        });

        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
        assert_eq!(backend.recorded().len(), 1);
    }
}
