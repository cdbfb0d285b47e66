//! BMP image format support
//!
//! Reads and writes uncompressed Windows Bitmap (BMP) files.
//!
//! Paletted images (1, 4, 8 bpp) decode to one channel when every palette
//! entry is gray and to RGB otherwise. 24 bpp decodes to RGB and 32 bpp to
//! RGBA. BMP has no gray+alpha layout, so 2-channel images are written as
//! 32 bpp and read back with four channels.

use crate::{IoError, IoResult, alloc_zeroed, check_layout, decoded_len, skip_bytes};
use raster_core::DecodedImage;
use raster_core::channel::ALPHA;
use std::io::{Read, Write};

/// BMP file header size
const BMP_FILE_HEADER_SIZE: usize = 14;

/// BMP info header size (BITMAPINFOHEADER)
const BMP_INFO_HEADER_SIZE: u32 = 40;

/// Row stride in bytes; BMP rows are 4-byte aligned.
fn row_stride(width: u32, bits_per_pixel: u16) -> usize {
    (width as usize * bits_per_pixel as usize).div_ceil(32) * 4
}

fn le_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

fn le_i32(b: &[u8]) -> i32 {
    i32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

fn le_u16(b: &[u8]) -> u16 {
    u16::from_le_bytes([b[0], b[1]])
}

/// Read a BMP image
pub fn read_bmp<R: Read>(mut reader: R) -> IoResult<DecodedImage> {
    // Read file header (14 bytes)
    let mut file_header = [0u8; BMP_FILE_HEADER_SIZE];
    reader.read_exact(&mut file_header).map_err(IoError::Io)?;

    // Verify magic number
    if &file_header[0..2] != b"BM" {
        return Err(IoError::InvalidData("not a BMP file".to_string()));
    }

    let pixel_offset = u64::from(le_u32(&file_header[10..14]));

    // Read info header (minimum 40 bytes)
    let mut info_header = [0u8; 40];
    reader.read_exact(&mut info_header).map_err(IoError::Io)?;

    let header_size = le_u32(&info_header[0..4]);
    if header_size < BMP_INFO_HEADER_SIZE {
        return Err(IoError::InvalidData(format!(
            "unsupported BMP header size: {}",
            header_size
        )));
    }

    let width = le_i32(&info_header[4..8]);
    let height = le_i32(&info_header[8..12]);

    let planes = le_u16(&info_header[12..14]);
    if planes != 1 {
        return Err(IoError::InvalidData(format!(
            "unsupported number of planes: {}",
            planes
        )));
    }

    let bits_per_pixel = le_u16(&info_header[14..16]);
    let compression = le_u32(&info_header[16..20]);
    let colors_used = le_u32(&info_header[32..36]) as usize;

    // Only uncompressed data (BI_RGB, or BI_BITFIELDS with default masks)
    if compression != 0 && compression != 3 {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP compression: {}",
            compression
        )));
    }

    if width <= 0 || height == 0 {
        return Err(IoError::InvalidData(format!(
            "invalid BMP dimensions: {}x{}",
            width, height
        )));
    }
    let width = width.unsigned_abs();
    let top_down = height < 0;
    let height = height.unsigned_abs();

    if !matches!(bits_per_pixel, 1 | 4 | 8 | 24 | 32) {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP bit depth: {}",
            bits_per_pixel
        )));
    }

    // Skip the rest of a larger info header
    skip_bytes(&mut reader, u64::from(header_size - BMP_INFO_HEADER_SIZE))?;

    // Read palette if present (for 1, 4, 8 bit images)
    let palette: Vec<[u8; 3]> = if bits_per_pixel <= 8 {
        let max_colors = 1usize << bits_per_pixel;
        let num_colors = if colors_used == 0 || colors_used > max_colors {
            max_colors
        } else {
            colors_used
        };
        let mut raw = vec![0u8; num_colors * 4];
        reader.read_exact(&mut raw).map_err(IoError::Io)?;
        raw.chunks_exact(4).map(|c| [c[2], c[1], c[0]]).collect()
    } else {
        Vec::new()
    };

    // Skip to pixel data
    let current_pos = (BMP_FILE_HEADER_SIZE + palette.len() * 4) as u64 + u64::from(header_size);
    if pixel_offset > current_pos {
        skip_bytes(&mut reader, pixel_offset - current_pos)?;
    }

    let gray_palette = palette.iter().all(|&[r, g, b]| r == g && g == b);
    let channels: u32 = match bits_per_pixel {
        1 | 4 | 8 if gray_palette => 1,
        1 | 4 | 8 | 24 => 3,
        _ => 4,
    };

    // The output bound also caps the padded input row
    let mut pixels = alloc_zeroed(decoded_len(width, height, channels as usize)?)?;
    let out_row = width as usize * channels as usize;
    let stride = row_stride(width, bits_per_pixel);
    let mut row_buffer = alloc_zeroed(stride)?;

    for row in 0..height {
        reader.read_exact(&mut row_buffer).map_err(IoError::Io)?;

        let y = if top_down { row } else { height - 1 - row };
        let out = &mut pixels[y as usize * out_row..(y as usize + 1) * out_row];

        match bits_per_pixel {
            1 | 4 | 8 => {
                for x in 0..width as usize {
                    let index = match bits_per_pixel {
                        1 => (row_buffer[x / 8] >> (7 - (x % 8))) & 1,
                        4 if x % 2 == 0 => row_buffer[x / 2] >> 4,
                        4 => row_buffer[x / 2] & 0xF,
                        _ => row_buffer[x],
                    } as usize;
                    let [r, g, b] = palette.get(index).copied().unwrap_or([0, 0, 0]);
                    if channels == 1 {
                        out[x] = r;
                    } else {
                        out[x * 3..x * 3 + 3].copy_from_slice(&[r, g, b]);
                    }
                }
            }
            24 => {
                for (src, dst) in row_buffer.chunks_exact(3).zip(out.chunks_exact_mut(3)) {
                    dst.copy_from_slice(&[src[2], src[1], src[0]]);
                }
            }
            _ => {
                for (src, dst) in row_buffer.chunks_exact(4).zip(out.chunks_exact_mut(4)) {
                    dst.copy_from_slice(&[src[2], src[1], src[0], src[3]]);
                }
            }
        }
    }

    // Many writers leave the 32 bpp alpha byte at zero; treat that as opaque
    if channels == 4 && pixels.chunks_exact(4).all(|px| px[ALPHA] == 0) {
        for px in pixels.chunks_exact_mut(4) {
            px[ALPHA] = 255;
        }
    }

    Ok(DecodedImage {
        pixels,
        width,
        height,
        channels,
    })
}

/// Write a BMP image
///
/// 1 channel is written as 8 bpp with a gray palette, 3 channels as 24 bpp
/// and 2 or 4 channels as 32 bpp BGRA.
pub fn write_bmp<W: Write>(
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: u32,
    mut writer: W,
) -> IoResult<()> {
    check_layout(pixels, width, height, channels)?;

    let bits_per_pixel: u16 = match channels {
        1 => 8,
        3 => 24,
        2 | 4 => 32,
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "cannot write {} channels as BMP",
                channels
            )));
        }
    };
    let has_palette = bits_per_pixel == 8;

    // Calculate sizes
    let stride = row_stride(width, bits_per_pixel);
    let pixel_data_size = stride * height as usize;
    let palette_size = if has_palette { 256 * 4 } else { 0 };

    let pixel_offset = BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE as usize + palette_size;
    let file_size = pixel_offset + pixel_data_size;

    let mut header = Vec::with_capacity(pixel_offset);

    // File header
    header.extend_from_slice(b"BM");
    header.extend_from_slice(&(file_size as u32).to_le_bytes());
    header.extend_from_slice(&[0u8; 4]); // Reserved
    header.extend_from_slice(&(pixel_offset as u32).to_le_bytes());

    // Info header
    header.extend_from_slice(&BMP_INFO_HEADER_SIZE.to_le_bytes());
    header.extend_from_slice(&(width as i32).to_le_bytes());
    header.extend_from_slice(&(height as i32).to_le_bytes()); // Bottom-up
    header.extend_from_slice(&1u16.to_le_bytes()); // Planes
    header.extend_from_slice(&bits_per_pixel.to_le_bytes());
    header.extend_from_slice(&0u32.to_le_bytes()); // Compression
    header.extend_from_slice(&(pixel_data_size as u32).to_le_bytes());
    header.extend_from_slice(&0i32.to_le_bytes()); // X pixels per meter
    header.extend_from_slice(&0i32.to_le_bytes()); // Y pixels per meter
    header.extend_from_slice(&0u32.to_le_bytes()); // Colors used
    header.extend_from_slice(&0u32.to_le_bytes()); // Important colors

    // Grayscale palette
    if has_palette {
        for i in 0..=255u8 {
            header.extend_from_slice(&[i, i, i, 0]);
        }
    }

    writer.write_all(&header).map_err(IoError::Io)?;

    // Write pixel data (bottom-up)
    let src_row = width as usize * channels as usize;
    let mut row_buffer = vec![0u8; stride];

    for y in (0..height as usize).rev() {
        let src = &pixels[y * src_row..(y + 1) * src_row];

        match channels {
            1 => row_buffer[..src_row].copy_from_slice(src),
            2 => {
                for (px, dst) in src.chunks_exact(2).zip(row_buffer.chunks_exact_mut(4)) {
                    dst.copy_from_slice(&[px[0], px[0], px[0], px[1]]);
                }
            }
            3 => {
                for (px, dst) in src.chunks_exact(3).zip(row_buffer.chunks_exact_mut(3)) {
                    dst.copy_from_slice(&[px[2], px[1], px[0]]);
                }
            }
            _ => {
                for (px, dst) in src.chunks_exact(4).zip(row_buffer.chunks_exact_mut(4)) {
                    dst.copy_from_slice(&[px[2], px[1], px[0], px[3]]);
                }
            }
        }

        writer.write_all(&row_buffer).map_err(IoError::Io)?;
    }

    Ok(())
}
