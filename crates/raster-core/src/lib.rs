//! Raster Core - In-memory raster image container
//!
//! This crate provides the data structures and pixel operations used
//! throughout rasterkit:
//!
//! - [`RasterImage`] - Owned, interleaved 8-bit pixel buffer
//! - [`ImageFileFormat`] / [`resolve_format`] - Extension based codec dispatch
//! - [`CodecProvider`] - Seam to the byte-level image codecs
//! - Grayscale, color mask and channel swap transforms on [`RasterImage`]
//!
//! # Pixel layout
//!
//! Pixels are stored row-major with no row padding. Each pixel occupies
//! `channels` consecutive bytes (the pixel stride); the first three bytes of
//! a color pixel are red, green and blue, a fourth byte is alpha.

pub mod codec;
pub mod error;
pub mod format;
pub mod image;

pub use codec::{CodecProvider, DecodedImage};
pub use error::{Error, Result};
pub use format::{ImageFileFormat, resolve_format};
pub use image::{
    DEFAULT_CHANNELS, DEFAULT_PARTITIONS, ParallelConfig, RasterImage, partition_ranges,
};

/// Channel indices and luminance helpers for interleaved 8-bit pixels.
pub mod channel {
    /// Red channel (byte 0 of a pixel)
    pub const RED: usize = 0;
    /// Green channel (byte 1)
    pub const GREEN: usize = 1;
    /// Blue channel (byte 2)
    pub const BLUE: usize = 2;
    /// Alpha channel (byte 3)
    pub const ALPHA: usize = 3;

    /// Smallest channel count carrying red, green and blue.
    pub const MIN_COLOR_CHANNELS: u32 = 3;
    /// Largest supported channel count (RGBA).
    pub const MAX_CHANNELS: u32 = 4;

    /// Truncated mean of the three color bytes: `(r + g + b) / 3`.
    #[inline]
    pub fn average(r: u8, g: u8, b: u8) -> u8 {
        ((r as u16 + g as u16 + b as u16) / 3) as u8
    }

    /// Perceptual luminosity `floor(0.3 r + 0.59 g + 0.11 b)`.
    ///
    /// Evaluated in integer hundredths so the floor is exact; a gray input
    /// (`r == g == b`) maps to itself.
    #[inline]
    pub fn luminosity(r: u8, g: u8, b: u8) -> u8 {
        ((30 * r as u32 + 59 * g as u32 + 11 * b as u32) / 100) as u8
    }

    /// Luma used when a decoded color image is collapsed to gray:
    /// `(77 r + 150 g + 29 b) >> 8`.
    #[inline]
    pub fn luma(r: u8, g: u8, b: u8) -> u8 {
        ((77 * r as u32 + 150 * g as u32 + 29 * b as u32) >> 8) as u8
    }

}
