//! Error types for itemrec.

use thiserror::Error;

/// Result alias for itemrec operations.
pub type ItemRecResult<T> = std::result::Result<T, ItemRecError>;

/// Errors that can occur while indexing templates or recognizing regions.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ItemRecError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// An image or buffer has an unusable shape.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Two buffers that must agree in length do not.
    #[error("buffer length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },
    /// An index lookup fell outside a collection.
    #[error("index {index} out of bounds for {context} (len {len})")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        context: &'static str,
    },
    /// Decoding an image through the `image` crate failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
    /// A filesystem operation failed.
    #[error("io error at {path}: {reason}")]
    Io { path: String, reason: String },
}

impl ItemRecError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}
