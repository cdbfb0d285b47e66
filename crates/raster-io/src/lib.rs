//! raster-io - Image codecs for rasterkit
//!
//! Provides [`StdCodec`], the standard [`CodecProvider`] implementation,
//! plus helpers that read and write [`RasterImage`]s directly.
//!
//! | Format | Decode | Encode | Feature |
//! |--------|--------|--------|---------|
//! | PNG    | yes    | yes    | `png-format` |
//! | JPEG   | yes    | yes (quality 100) | `jpeg` |
//! | BMP    | yes    | yes    | `bmp` |
//! | TGA    | yes    | yes    | `tga` |
//!
//! Decoding detects the format from the file content. Encoding picks it
//! from the output file name via [`resolve_format`].
//!
//! [`CodecProvider`]: raster_core::CodecProvider

#[cfg(feature = "bmp")]
pub mod bmp;
mod codec;
mod error;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "tga")]
pub mod tga;

pub use codec::StdCodec;
pub use error::{IoError, IoResult};
pub use format::{detect_format, detect_format_from_bytes};
pub use raster_core::{DecodedImage, ImageFileFormat, RasterImage, resolve_format};

use std::io::{self, Read};
use std::path::Path;

/// Read an image file with [`StdCodec`].
///
/// `channel_force` of 0 keeps the decoded channel count; 1..=4 converts.
pub fn read_image<P: AsRef<Path>>(path: P, channel_force: u32) -> IoResult<RasterImage> {
    Ok(RasterImage::open(path, channel_force, &StdCodec)?)
}

/// Decode an in-memory image file.
pub fn read_image_mem(data: &[u8]) -> IoResult<DecodedImage> {
    StdCodec.decode_bytes(data)
}

/// Write an image with [`StdCodec`], choosing the format from `path`.
pub fn write_image<P: AsRef<Path>>(image: &RasterImage, path: P) -> IoResult<()> {
    Ok(image.try_write(path, &StdCodec)?)
}

/// Encode an image to memory in the given format.
pub fn write_image_mem(image: &RasterImage, format: ImageFileFormat) -> IoResult<Vec<u8>> {
    StdCodec.encode_bytes(
        format,
        image.data(),
        image.width(),
        image.height(),
        image.channels(),
    )
}

/// Largest pixel buffer a decoder will allocate from header fields (1 GiB).
pub const MAX_DECODED_BYTES: usize = 1 << 30;

/// Size of a `width x height` buffer at `bytes_per_pixel`, bounded by
/// [`MAX_DECODED_BYTES`].
pub(crate) fn decoded_len(width: u32, height: u32, bytes_per_pixel: usize) -> IoResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(bytes_per_pixel))
        .filter(|&len| len <= MAX_DECODED_BYTES)
        .ok_or_else(|| {
            IoError::InvalidData(format!(
                "image of {}x{} at {} bytes per pixel exceeds the {} byte limit",
                width, height, bytes_per_pixel, MAX_DECODED_BYTES
            ))
        })
}

/// Allocate a zeroed buffer, reporting failure instead of aborting.
pub(crate) fn alloc_zeroed(len: usize) -> IoResult<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| {
        IoError::InvalidData(format!("cannot allocate {} bytes for pixel data", len))
    })?;
    buf.resize(len, 0);
    Ok(buf)
}

/// Discard exactly `count` bytes from `reader` without buffering them.
pub(crate) fn skip_bytes<R: Read>(reader: &mut R, count: u64) -> IoResult<()> {
    let skipped = io::copy(&mut reader.by_ref().take(count), &mut io::sink())?;
    if skipped < count {
        return Err(IoError::InvalidData(format!(
            "unexpected end of data: skipped {} of {} bytes",
            skipped, count
        )));
    }
    Ok(())
}

/// Check that `pixels` holds exactly `width * height * channels` bytes.
pub(crate) fn check_layout(pixels: &[u8], width: u32, height: u32, channels: u32) -> IoResult<()> {
    let expected = width as usize * height as usize * channels as usize;
    if width == 0 || height == 0 {
        return Err(IoError::Core(raster_core::Error::InvalidDimension {
            width,
            height,
        }));
    }
    if pixels.len() != expected {
        return Err(IoError::Core(raster_core::Error::BufferSizeMismatch {
            expected,
            actual: pixels.len(),
        }));
    }
    Ok(())
}
