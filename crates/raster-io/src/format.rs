//! Image format detection
//!
//! Detects image formats by examining magic numbers in the file header.
//! TGA has no signature, so it is recognized last by a plausible header.

use crate::{IoError, IoResult};
use raster_core::ImageFileFormat;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Magic numbers for image format detection
mod magic {
    /// BMP: "BM"
    pub const BMP: &[u8] = b"BM";

    /// PNG: 89 50 4E 47 0D 0A 1A 0A
    pub const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    /// JPEG: FF D8 FF
    pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];
}

/// TGA header length in bytes
pub(crate) const TGA_HEADER_SIZE: usize = 18;

/// Detect image format from a file path
pub fn detect_format<P: AsRef<Path>>(path: P) -> IoResult<ImageFileFormat> {
    let mut file = File::open(path).map_err(IoError::Io)?;
    let mut header = [0u8; TGA_HEADER_SIZE];
    let bytes_read = file.read(&mut header).map_err(IoError::Io)?;
    detect_format_from_bytes(&header[..bytes_read])
}

/// Detect image format from bytes
pub fn detect_format_from_bytes(data: &[u8]) -> IoResult<ImageFileFormat> {
    if data.len() < 2 {
        return Err(IoError::InvalidData(
            "not enough data to detect format".to_string(),
        ));
    }

    // Check PNG (needs 8 bytes)
    if data.starts_with(magic::PNG) {
        return Ok(ImageFileFormat::Png);
    }

    // Check JPEG
    if data.starts_with(magic::JPEG) {
        return Ok(ImageFileFormat::Jpg);
    }

    // Check BMP
    if data.starts_with(magic::BMP) {
        return Ok(ImageFileFormat::Bmp);
    }

    if looks_like_tga(data) {
        return Ok(ImageFileFormat::Tga);
    }

    Err(IoError::UnsupportedFormat("unknown image format".to_string()))
}

/// Check whether the first bytes form a believable TGA header.
fn looks_like_tga(data: &[u8]) -> bool {
    if data.len() < TGA_HEADER_SIZE {
        return false;
    }
    let colormap_type = data[1];
    let image_type = data[2];
    let width = u16::from_le_bytes([data[12], data[13]]);
    let height = u16::from_le_bytes([data[14], data[15]]);
    let bits_per_pixel = data[16];

    colormap_type <= 1
        && matches!(image_type, 1 | 2 | 3 | 9 | 10 | 11)
        && width > 0
        && height > 0
        && matches!(bits_per_pixel, 8 | 15 | 16 | 24 | 32)
}
