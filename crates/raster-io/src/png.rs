//! PNG image format support
//!
//! Decoding normalizes every PNG to 8 bits per sample: palettes are
//! expanded to RGB(A), low bit depths are widened and 16-bit samples are
//! stripped to their high byte.

use crate::{IoError, IoResult, check_layout};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use raster_core::DecodedImage;
use std::io::{BufRead, Seek, Write};

/// Channel count for an 8-bit PNG color type.
fn channels_for(color_type: ColorType) -> IoResult<u32> {
    match color_type {
        ColorType::Grayscale => Ok(1),
        ColorType::GrayscaleAlpha => Ok(2),
        ColorType::Rgb => Ok(3),
        ColorType::Rgba => Ok(4),
        ColorType::Indexed => Err(IoError::UnsupportedFormat(
            "indexed PNG output after expansion".to_string(),
        )),
    }
}

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<DecodedImage> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNG output depth: {:?}",
            bit_depth
        )));
    }
    let channels = channels_for(color_type)?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let width = output_info.width;
    let height = output_info.height;
    let row_len = width as usize * channels as usize;
    let line_size = output_info.line_size;

    // Drop any per-row padding the decoder left in its output
    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in buf.chunks(line_size).take(height as usize) {
        pixels.extend_from_slice(&row[..row_len]);
    }

    Ok(DecodedImage {
        pixels,
        width,
        height,
        channels,
    })
}

/// Write a PNG image
pub fn write_png<W: Write>(
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: u32,
    writer: W,
) -> IoResult<()> {
    check_layout(pixels, width, height, channels)?;

    let color_type = match channels {
        1 => ColorType::Grayscale,
        2 => ColorType::GrayscaleAlpha,
        3 => ColorType::Rgb,
        4 => ColorType::Rgba,
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "cannot write {} channels as PNG",
                channels
            )));
        }
    };

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    writer
        .write_image_data(pixels)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}
