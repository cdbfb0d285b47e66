//! RasterImage - The owned pixel buffer
//!
//! A `RasterImage` exclusively owns one contiguous byte buffer of
//! `width * height * channels` bytes. The buffer is never shared: cloning
//! deep-copies it and dropping the image frees it exactly once.
//!
//! # Validity
//!
//! [`RasterImage::from_file`] keeps the lenient contract of returning an
//! image even when decoding fails. Such an image is *invalid*: it has zero
//! dimensions and an empty buffer, every transform is a no-op on it and
//! [`RasterImage::is_valid`] reports `false`. Callers that prefer an error
//! use [`RasterImage::open`].

mod convert;
mod gray;
mod mask;
mod parallel;

pub use parallel::{DEFAULT_PARTITIONS, ParallelConfig, partition_ranges};

use crate::channel::{MAX_CHANNELS, MIN_COLOR_CHANNELS};
use crate::codec::{CodecProvider, DecodedImage};
use crate::error::{Error, Result};
use crate::format::resolve_format;
use log::{error, info, warn};
use std::fs;
use std::path::Path;

/// Channel count used by [`RasterImage::new`].
pub const DEFAULT_CHANNELS: u32 = 3;

/// In-memory raster image.
///
/// # Examples
///
/// ```
/// use raster_core::RasterImage;
///
/// let mut img = RasterImage::create_blank(4, 2, 3).unwrap();
/// assert_eq!(img.byte_size(), 4 * 2 * 3);
/// img.grayscale_average().swap_green_blue();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Samples per pixel (pixel stride in bytes)
    channels: u32,
    /// Interleaved pixel bytes
    data: Vec<u8>,
}

impl RasterImage {
    /// Create a blank RGB image.
    ///
    /// Equivalent to `create_blank(width, height, 3)`.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::create_blank(width, height, DEFAULT_CHANNELS)
    }

    /// Allocate an image of the given geometry.
    ///
    /// The buffer content is unspecified as far as callers are concerned;
    /// it currently happens to be zero-filled.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimension`] if width or height is 0
    /// - [`Error::InvalidChannelCount`] if `channels` is not 1..=4
    /// - [`Error::AllocationFailed`] if the buffer cannot be allocated
    pub fn create_blank(width: u32, height: u32, channels: u32) -> Result<Self> {
        let len = byte_len(width, height, channels)?;
        let data = alloc_buffer(len)?;
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Wrap an existing interleaved buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] when `data.len()` differs from
    /// `width * height * channels`.
    pub fn from_pixels(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height, channels)?;
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Build an image from decoder output.
    ///
    /// A nonzero `channel_force` converts the samples to that many channels
    /// (see [`RasterImage::open`]); zero keeps the decoded channel count.
    pub fn from_decoded(decoded: DecodedImage, channel_force: u32) -> Result<Self> {
        let DecodedImage {
            pixels,
            width,
            height,
            channels,
        } = decoded;
        let image = Self::from_pixels(width, height, channels, pixels)?;
        if channel_force == 0 || channel_force == channels {
            return Ok(image);
        }
        if !(1..=MAX_CHANNELS).contains(&channel_force) {
            return Err(Error::InvalidChannelCount(channel_force));
        }
        let data = convert::convert_channels(&image.data, channels, channel_force)?;
        Self::from_pixels(width, height, channel_force, data)
    }

    /// Read and decode an image file.
    ///
    /// `channel_force` of 0 keeps the channel count reported by the codec.
    /// Any other value in 1..=4 converts the decoded samples: gray is
    /// replicated into color, color collapses to luma, alpha is dropped or
    /// filled with 255. The buffer always matches the reported channel count.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, otherwise whatever the codec
    /// or [`RasterImage::from_decoded`] returns.
    pub fn open<P, C>(path: P, channel_force: u32, codec: &C) -> Result<Self>
    where
        P: AsRef<Path>,
        C: CodecProvider + ?Sized,
    {
        let path = path.as_ref();
        if channel_force > MAX_CHANNELS {
            return Err(Error::InvalidChannelCount(channel_force));
        }
        let bytes = fs::read(path)?;
        let decoded = codec.decode(&bytes)?;
        let image = Self::from_decoded(decoded, channel_force)?;
        info!(
            "Read {}, {}, {}, {}, {}",
            path.display(),
            image.width,
            image.height,
            image.channels,
            image.byte_size()
        );
        Ok(image)
    }

    /// Read and decode an image file, returning an invalid image on failure.
    ///
    /// The failure is logged; check [`RasterImage::is_valid`] before use.
    pub fn from_file<P, C>(path: P, channel_force: u32, codec: &C) -> Self
    where
        P: AsRef<Path>,
        C: CodecProvider + ?Sized,
    {
        let path = path.as_ref();
        match Self::open(path, channel_force, codec) {
            Ok(image) => image,
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Deep copy with fallible allocation.
    ///
    /// `Clone` performs the same copy but aborts on allocation failure.
    pub fn try_clone(&self) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(self.data.len())
            .map_err(|_| Error::AllocationFailed)?;
        data.extend_from_slice(&self.data);
        Ok(Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data,
        })
    }

    /// Free the pixel buffer now, leaving an invalid image behind.
    ///
    /// Calling this on an invalid image does nothing.
    pub fn release(&mut self) {
        *self = Self::default();
    }

    /// Encode and write the image, choosing the format from `path`.
    ///
    /// # Errors
    ///
    /// [`Error::EncodeError`] for an invalid image or a codec failure,
    /// [`Error::Io`] if the file cannot be written.
    pub fn try_write<P, C>(&self, path: P, codec: &C) -> Result<()>
    where
        P: AsRef<Path>,
        C: CodecProvider + ?Sized,
    {
        if !self.is_valid() {
            return Err(Error::EncodeError("image has no pixel data".to_string()));
        }
        let format = resolve_format(path.as_ref());
        let bytes = codec.encode(format, &self.data, self.width, self.height, self.channels)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Encode and write the image, reporting the outcome.
    ///
    /// Returns `true` on success. Failures are logged and leave the image
    /// untouched.
    pub fn write<P, C>(&self, path: P, codec: &C) -> bool
    where
        P: AsRef<Path>,
        C: CodecProvider + ?Sized,
    {
        let path = path.as_ref();
        match self.try_write(path, codec) {
            Ok(()) => {
                info!(
                    "Wrote {}, {}, {}, {}, {}",
                    path.display(),
                    self.width,
                    self.height,
                    self.channels,
                    self.byte_size()
                );
                true
            }
            Err(e) => {
                error!(
                    "Failed to write {}, {}, {}, {}, {}: {}",
                    path.display(),
                    self.width,
                    self.height,
                    self.channels,
                    self.byte_size(),
                    e
                );
                false
            }
        }
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of channels (the pixel stride in bytes).
    #[inline]
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Get the buffer length, always `width * height * channels`.
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// Get the raw pixel bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the raw pixel bytes mutably. The length cannot change.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Check whether the image holds pixels.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.channels > 0 && !self.data.is_empty()
    }

    /// Check whether pixels carry red, green and blue.
    pub fn has_color(&self) -> bool {
        self.channels >= MIN_COLOR_CHANNELS
    }

    /// Get the pixel at `(x, y)` as a byte slice of `channels` length.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let stride = self.channels as usize;
        let start = (y as usize * self.width as usize + x as usize) * stride;
        self.data.get(start..start + stride)
    }

    /// Check that the color transforms will act on this image.
    ///
    /// The transforms themselves never fail: on an image without color
    /// they log a warning and return it unchanged. Callers that want the
    /// condition as an error check it up front.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedChannelCount`] if the image has fewer than three
    /// channels (this includes an invalid image).
    pub fn ensure_color(&self) -> Result<()> {
        if self.has_color() {
            Ok(())
        } else {
            Err(Error::UnsupportedChannelCount(self.channels))
        }
    }

    /// Stride for color transforms, or `None` after logging why not.
    fn color_stride(&self, op: &str) -> Option<usize> {
        match self.ensure_color() {
            Ok(()) => Some(self.channels as usize),
            Err(e) => {
                warn!("{}: {}; left unchanged", op, e);
                None
            }
        }
    }
}

/// Compute `width * height * channels`, validating each factor.
fn byte_len(width: u32, height: u32, channels: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimension { width, height });
    }
    if !(1..=MAX_CHANNELS).contains(&channels) {
        return Err(Error::InvalidChannelCount(channels));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels as usize))
        .ok_or(Error::AllocationFailed)
}

/// Allocate a zeroed buffer without aborting on allocation failure.
fn alloc_buffer(len: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailed)?;
    data.resize(len, 0);
    Ok(data)
}
