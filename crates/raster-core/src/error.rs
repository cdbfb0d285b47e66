//! Error types for raster-core
//!
//! Provides a unified error type for construction, codec and I/O failures.
//! The pixel transforms themselves never return these: on an image without
//! color they log a warning and leave it untouched. The same condition is
//! available as [`Error::UnsupportedChannelCount`] through
//! [`RasterImage::ensure_color`](crate::RasterImage::ensure_color).

use thiserror::Error;

/// Raster core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Channel count outside 1..=4
    #[error("invalid channel count: {0}")]
    InvalidChannelCount(u32),

    /// Operation needs at least three color channels
    #[error("operation requires at least 3 channels, image has {0}")]
    UnsupportedChannelCount(u32),

    /// Pixel buffer length does not match width * height * channels
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Memory allocation failed
    #[error("memory allocation failed")]
    AllocationFailed,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported image format
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Image decode error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Image encode error
    #[error("encode error: {0}")]
    EncodeError(String),
}

/// Result type alias for raster operations
pub type Result<T> = std::result::Result<T, Error>;
