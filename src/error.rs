//! Error types for the site-assets crate.

use std::path::PathBuf;

/// Errors that can occur while preparing image assets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source file for an asset does not exist.
    #[error("source not found: {}", path.display())]
    MissingSource {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The image has a zero dimension and cannot be transformed.
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The output format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image processing (decode, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
