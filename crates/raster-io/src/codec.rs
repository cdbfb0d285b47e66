//! Standard codec provider
//!
//! Dispatches decode by file content and encode by the requested
//! [`ImageFileFormat`]. A format whose cargo feature is disabled reports
//! [`IoError::UnsupportedFormat`].

use crate::format::detect_format_from_bytes;
use crate::{IoError, IoResult};
use log::debug;
use raster_core::{CodecProvider, DecodedImage, ImageFileFormat};
#[cfg(any(feature = "png-format", feature = "bmp", feature = "tga", feature = "jpeg"))]
use std::io::Cursor;

/// The codec set built into `raster-io`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdCodec;

fn disabled(format: ImageFileFormat) -> IoError {
    IoError::UnsupportedFormat(format!("{} support not enabled", format.name()))
}

impl StdCodec {
    /// Decode an in-memory image, detecting its format from the content.
    pub fn decode_bytes(&self, data: &[u8]) -> IoResult<DecodedImage> {
        let format = detect_format_from_bytes(data)?;
        debug!("decoding {} bytes as {}", data.len(), format.name());
        match format {
            #[cfg(feature = "png-format")]
            ImageFileFormat::Png => crate::png::read_png(Cursor::new(data)),
            #[cfg(feature = "jpeg")]
            ImageFileFormat::Jpg => crate::jpeg::read_jpeg(Cursor::new(data)),
            #[cfg(feature = "bmp")]
            ImageFileFormat::Bmp => crate::bmp::read_bmp(Cursor::new(data)),
            #[cfg(feature = "tga")]
            ImageFileFormat::Tga => crate::tga::read_tga(Cursor::new(data)),
            #[allow(unreachable_patterns)]
            other => Err(disabled(other)),
        }
    }

    /// Encode interleaved pixels as `format`.
    pub fn encode_bytes(
        &self,
        format: ImageFileFormat,
        pixels: &[u8],
        width: u32,
        height: u32,
        channels: u32,
    ) -> IoResult<Vec<u8>> {
        debug!("encoding {}x{}x{} as {}", width, height, channels, format.name());
        let mut out = Vec::new();
        match format {
            #[cfg(feature = "png-format")]
            ImageFileFormat::Png => {
                crate::png::write_png(pixels, width, height, channels, &mut out)?
            }
            #[cfg(feature = "jpeg")]
            ImageFileFormat::Jpg => {
                crate::jpeg::write_jpeg(pixels, width, height, channels, &mut out)?
            }
            #[cfg(feature = "bmp")]
            ImageFileFormat::Bmp => {
                crate::bmp::write_bmp(pixels, width, height, channels, &mut out)?
            }
            #[cfg(feature = "tga")]
            ImageFileFormat::Tga => {
                crate::tga::write_tga(pixels, width, height, channels, &mut out)?
            }
            #[allow(unreachable_patterns)]
            other => return Err(disabled(other)),
        }
        Ok(out)
    }
}

impl CodecProvider for StdCodec {
    fn decode(&self, data: &[u8]) -> raster_core::Result<DecodedImage> {
        self.decode_bytes(data).map_err(IoError::into_decode_error)
    }

    fn encode(
        &self,
        format: ImageFileFormat,
        pixels: &[u8],
        width: u32,
        height: u32,
        channels: u32,
    ) -> raster_core::Result<Vec<u8>> {
        self.encode_bytes(format, pixels, width, height, channels)
            .map_err(IoError::into_encode_error)
    }
}

#[cfg(all(test, feature = "png-format", feature = "bmp", feature = "tga"))]
mod tests {
    use super::*;

    #[test]
    fn test_lossless_formats_roundtrip() {
        let pixels: Vec<u8> = (0..6 * 4 * 3u32).map(|i| (i * 13) as u8).collect();
        for format in [ImageFileFormat::Png, ImageFileFormat::Bmp, ImageFileFormat::Tga] {
            let bytes = StdCodec.encode_bytes(format, &pixels, 6, 4, 3).unwrap();
            let decoded = StdCodec.decode_bytes(&bytes).unwrap();
            assert_eq!((decoded.width, decoded.height, decoded.channels), (6, 4, 3));
            assert_eq!(decoded.pixels, pixels, "{:?}", format);
        }
    }

    #[test]
    fn test_decode_garbage_maps_to_core_error() {
        let err = StdCodec.decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, raster_core::Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_encode_size_mismatch_maps_to_core_error() {
        let err = StdCodec
            .encode(ImageFileFormat::Png, &[0; 4], 2, 2, 3)
            .unwrap_err();
        assert!(matches!(
            err,
            raster_core::Error::BufferSizeMismatch {
                expected: 12,
                actual: 4
            }
        ));
    }
}
