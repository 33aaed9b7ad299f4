//! Codec and file errors.

use std::io;
use thiserror::Error;

/// Failure while reading or writing an atlas or image.
#[derive(Debug, Error)]
pub enum IoError {
    /// File could not be opened, read or written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Neither the header nor the extension names a known codec.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The codec rejected the data.
    #[error("failed to decode image: {0}")]
    DecodeError(String),

    /// The codec could not encode the pixels.
    #[error("failed to encode image: {0}")]
    EncodeError(String),

    /// Sample count disagrees with `width × height × channels`.
    #[error("pixel buffer mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// What the geometry calls for.
        expected: String,
        /// What the buffer holds.
        actual: String,
    },

    /// Decoded bit depth or color type cannot be normalized.
    #[error("unsupported sample layout: {0}")]
    UnsupportedBitDepth(String),
}

/// Shorthand for results of this crate.
pub type IoResult<T> = Result<T, IoError>;
