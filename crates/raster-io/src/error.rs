//! I/O error types
//!
//! Provides a unified error type for all image I/O operations.
//! Each format-specific module maps its underlying library errors
//! into `IoError` variants so that callers only need to handle
//! one error type.

use thiserror::Error;

/// Error type for image I/O operations.
///
/// Wraps format-specific decoding/encoding errors as well as
/// standard I/O and core-library errors.
#[derive(Error, Debug)]
pub enum IoError {
    /// Standard I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported or not enabled via features
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The image data is structurally invalid
    #[error("invalid image data: {0}")]
    InvalidData(String),

    /// A format-specific decoder returned an error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// A format-specific encoder returned an error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// An error from the core library (e.g. buffer size mismatch)
    #[error("core error: {0}")]
    Core(#[from] raster_core::Error),
}

impl IoError {
    /// Fold into the core error type for a failed decode.
    pub(crate) fn into_decode_error(self) -> raster_core::Error {
        match self {
            IoError::Core(e) => e,
            IoError::UnsupportedFormat(msg) => raster_core::Error::UnsupportedFormat(msg),
            other => raster_core::Error::DecodeError(other.to_string()),
        }
    }

    /// Fold into the core error type for a failed encode.
    pub(crate) fn into_encode_error(self) -> raster_core::Error {
        match self {
            IoError::Core(e) => e,
            IoError::UnsupportedFormat(msg) => raster_core::Error::UnsupportedFormat(msg),
            other => raster_core::Error::EncodeError(other.to_string()),
        }
    }
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
