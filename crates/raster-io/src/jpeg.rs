//! JPEG image format support
//!
//! Reads JPEG images with the `jpeg-decoder` crate and writes them with
//! `jpeg-encoder`. Output quality is fixed at [`JPEG_QUALITY`].
//! JPEG carries no alpha: a gray+alpha or RGBA image is written without it.

use crate::{IoError, IoResult, check_layout};
use jpeg_decoder::PixelFormat;
use jpeg_encoder::{ColorType, Encoder};
use raster_core::DecodedImage;
use std::io::{Read, Write};

/// Encoder quality used for every JPEG write.
pub const JPEG_QUALITY: u8 = 100;

/// Read a JPEG image from a reader.
///
/// Returns 1 channel for grayscale and 3 channels for color input.
/// 16-bit grayscale keeps the high byte; CMYK input is rejected.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<DecodedImage> {
    let mut decoder = jpeg_decoder::Decoder::new(reader);
    let data = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;

    let width = info.width as u32;
    let height = info.height as u32;

    let (pixels, channels) = match info.pixel_format {
        PixelFormat::L8 => (data, 1),
        PixelFormat::L16 => (data.chunks_exact(2).map(|s| s[0]).collect(), 1),
        PixelFormat::RGB24 => (data, 3),
        PixelFormat::CMYK32 => {
            return Err(IoError::UnsupportedFormat(
                "CMYK JPEG images are not supported".to_string(),
            ));
        }
    };

    Ok(DecodedImage {
        pixels,
        width,
        height,
        channels,
    })
}

/// Write a JPEG image at [`JPEG_QUALITY`].
pub fn write_jpeg<W: Write>(
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: u32,
    writer: W,
) -> IoResult<()> {
    check_layout(pixels, width, height, channels)?;

    let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(IoError::EncodeError(format!(
                "JPEG dimensions limited to 65535, got {}x{}",
                width, height
            )));
        }
    };

    // The encoder has no gray+alpha input, so drop alpha up front
    let stripped;
    let (data, color_type) = match channels {
        1 => (pixels, ColorType::Luma),
        2 => {
            stripped = pixels.chunks_exact(2).map(|px| px[0]).collect::<Vec<u8>>();
            (stripped.as_slice(), ColorType::Luma)
        }
        3 => (pixels, ColorType::Rgb),
        4 => (pixels, ColorType::Rgba),
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "cannot write {} channels as JPEG",
                channels
            )));
        }
    };

    Encoder::new(writer, JPEG_QUALITY)
        .encode(data, w, h, color_type)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_jpeg_roundtrip_flat_rgb() {
        // A flat color survives quality-100 encoding within a small error
        let pixels: Vec<u8> = [120u8, 60, 200].repeat(16 * 16);

        let mut buffer = Vec::new();
        write_jpeg(&pixels, 16, 16, 3, &mut buffer).unwrap();

        let decoded = read_jpeg(Cursor::new(buffer)).unwrap();
        assert_eq!((decoded.width, decoded.height), (16, 16));
        assert_eq!(decoded.channels, 3);
        for (a, b) in decoded.pixels.iter().zip(&pixels) {
            assert!((*a as i32 - *b as i32).abs() <= 4, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_jpeg_gray_alpha_written_as_gray() {
        let pixels: Vec<u8> = [90u8, 10].repeat(8 * 8);

        let mut buffer = Vec::new();
        write_jpeg(&pixels, 8, 8, 2, &mut buffer).unwrap();

        let decoded = read_jpeg(Cursor::new(buffer)).unwrap();
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.pixels.len(), 64);
    }

    #[test]
    fn test_jpeg_rejects_oversized() {
        let mut buffer = Vec::new();
        let result = write_jpeg(&[0; 70000], 70000, 1, 1, &mut buffer);
        assert!(matches!(result, Err(IoError::EncodeError(_))));
    }
}
