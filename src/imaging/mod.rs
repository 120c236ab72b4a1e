//! Image transcoding: pure Rust, statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode JPEG/PNG** | `image` crate (pure Rust decoders) |
//! | **Encode WebP (lossy)** | `webp::Encoder` at a configured quality |
//!
//! The module is split into:
//! - **Parameters**: data structures describing a transcode ([`TranscodeParams`], [`Quality`])
//! - **Backend**: the [`ImageBackend`] trait + the production [`WebpBackend`]

pub mod backend;
mod params;
pub mod webp_backend;

pub use backend::{BackendError, ImageBackend};
pub use params::{Quality, TranscodeParams};
pub use webp_backend::WebpBackend;
