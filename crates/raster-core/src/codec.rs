//! Codec seam
//!
//! `RasterImage` never parses file bytes itself. Decoding and encoding go
//! through a [`CodecProvider`]; `raster-io` ships the standard one.

use crate::error::Result;
use crate::format::ImageFileFormat;

/// Interleaved pixels as produced by a decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Row-major pixel bytes, `width * height * channels` long
    pub pixels: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Samples per pixel (1..=4)
    pub channels: u32,
}

/// Byte-level image decode/encode capability.
pub trait CodecProvider {
    /// Decode an in-memory image file. The format is taken from the content.
    fn decode(&self, data: &[u8]) -> Result<DecodedImage>;

    /// Encode interleaved pixels as `format`.
    fn encode(
        &self,
        format: ImageFileFormat,
        pixels: &[u8],
        width: u32,
        height: u32,
        channels: u32,
    ) -> Result<Vec<u8>>;
}
