//! TGA image format support
//!
//! Reads uncompressed and run-length encoded truecolor (types 2, 10) and
//! grayscale (types 3, 11) Truevision TGA files. Color-mapped files are
//! rejected. Writing always produces uncompressed, top-left origin files:
//! 8 bpp grayscale for one channel, 24 bpp for RGB and 32 bpp for RGBA.
//! Gray+alpha is written as 32 bpp and reads back with four channels.

use crate::format::TGA_HEADER_SIZE;
use crate::{IoError, IoResult, alloc_zeroed, check_layout, decoded_len, skip_bytes};
use raster_core::DecodedImage;
use std::io::{Read, Write};

/// Image type codes from the header
mod image_type {
    pub const TRUECOLOR: u8 = 2;
    pub const GRAYSCALE: u8 = 3;
    pub const RLE_TRUECOLOR: u8 = 10;
    pub const RLE_GRAYSCALE: u8 = 11;
}

/// Descriptor bit for rows stored top to bottom
const TOP_LEFT_ORIGIN: u8 = 0x20;

/// Read a TGA image
pub fn read_tga<R: Read>(mut reader: R) -> IoResult<DecodedImage> {
    let mut header = [0u8; TGA_HEADER_SIZE];
    reader.read_exact(&mut header).map_err(IoError::Io)?;

    let id_length = header[0] as usize;
    let colormap_type = header[1];
    let kind = header[2];
    let colormap_length = u16::from_le_bytes([header[5], header[6]]) as usize;
    let colormap_entry_bits = header[7] as usize;
    let width = u16::from_le_bytes([header[12], header[13]]) as u32;
    let height = u16::from_le_bytes([header[14], header[15]]) as u32;
    let bits_per_pixel = header[16];
    let descriptor = header[17];

    let rle = match kind {
        image_type::TRUECOLOR | image_type::GRAYSCALE => false,
        image_type::RLE_TRUECOLOR | image_type::RLE_GRAYSCALE => true,
        1 | 9 => {
            return Err(IoError::UnsupportedFormat(
                "color-mapped TGA images are not supported".to_string(),
            ));
        }
        _ => {
            return Err(IoError::InvalidData(format!("unknown TGA image type: {}", kind)));
        }
    };
    let gray = matches!(kind, image_type::GRAYSCALE | image_type::RLE_GRAYSCALE);

    if width == 0 || height == 0 {
        return Err(IoError::InvalidData(format!(
            "invalid TGA dimensions: {}x{}",
            width, height
        )));
    }

    let (in_bytes, channels): (usize, u32) = match (gray, bits_per_pixel) {
        (true, 8) => (1, 1),
        (true, 16) => (2, 2),
        (false, 15 | 16) => (2, 3),
        (false, 24) => (3, 3),
        (false, 32) => (4, 4),
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported TGA depth: {} bpp (type {})",
                bits_per_pixel, kind
            )));
        }
    };

    // Skip image id and any (unused) color map
    let colormap_bytes = if colormap_type == 1 {
        colormap_length * colormap_entry_bits.div_ceil(8)
    } else {
        0
    };
    skip_bytes(&mut reader, (id_length + colormap_bytes) as u64)?;

    let out_bytes = channels as usize;
    let raw_len = decoded_len(width, height, in_bytes)?;
    let out_len = decoded_len(width, height, out_bytes)?;

    let raw = if rle {
        read_rle(&mut reader, raw_len, in_bytes)?
    } else {
        let mut raw = alloc_zeroed(raw_len)?;
        reader.read_exact(&mut raw).map_err(IoError::Io)?;
        raw
    };

    // File order is BGR(A) or little-endian 5-5-5; convert to RGB(A)
    let mut pixels = alloc_zeroed(out_len)?;
    for (src, dst) in raw.chunks_exact(in_bytes).zip(pixels.chunks_exact_mut(out_bytes)) {
        match (gray, in_bytes) {
            (true, _) => dst.copy_from_slice(src),
            (false, 2) => {
                let v = u16::from_le_bytes([src[0], src[1]]);
                let expand = |c: u16| ((c & 0x1F) * 255 / 31) as u8;
                dst.copy_from_slice(&[expand(v >> 10), expand(v >> 5), expand(v)]);
            }
            (false, 3) => dst.copy_from_slice(&[src[2], src[1], src[0]]),
            _ => dst.copy_from_slice(&[src[2], src[1], src[0], src[3]]),
        }
    }

    // Bottom-left origin stores the last row first
    if descriptor & TOP_LEFT_ORIGIN == 0 {
        let row = width as usize * out_bytes;
        let rows = height as usize;
        for y in 0..rows / 2 {
            let (top, bottom) = pixels.split_at_mut((rows - 1 - y) * row);
            top[y * row..(y + 1) * row].swap_with_slice(&mut bottom[..row]);
        }
    }

    Ok(DecodedImage {
        pixels,
        width,
        height,
        channels,
    })
}

/// Expand run-length packets into `len` bytes of raw pixels.
///
/// The output grows with the packets actually read, so a truncated
/// stream fails before the whole buffer is committed.
fn read_rle<R: Read>(reader: &mut R, len: usize, bytes_per_pixel: usize) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    let mut pixel = vec![0u8; bytes_per_pixel];
    let mut packet = [0u8; 1];

    while out.len() < len {
        reader.read_exact(&mut packet).map_err(IoError::Io)?;
        let count = (packet[0] & 0x7F) as usize + 1;
        let remaining = (len - out.len()) / bytes_per_pixel;
        if count > remaining {
            return Err(IoError::InvalidData(
                "TGA run-length packet overruns the image".to_string(),
            ));
        }
        if packet[0] & 0x80 != 0 {
            reader.read_exact(&mut pixel).map_err(IoError::Io)?;
            for _ in 0..count {
                out.extend_from_slice(&pixel);
            }
        } else {
            let start = out.len();
            out.resize(start + count * bytes_per_pixel, 0);
            reader.read_exact(&mut out[start..]).map_err(IoError::Io)?;
        }
    }

    Ok(out)
}

/// Write a TGA image
pub fn write_tga<W: Write>(
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: u32,
    mut writer: W,
) -> IoResult<()> {
    check_layout(pixels, width, height, channels)?;

    let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(IoError::EncodeError(format!(
                "TGA dimensions limited to 65535, got {}x{}",
                width, height
            )));
        }
    };

    let (kind, bits_per_pixel, alpha_bits) = match channels {
        1 => (image_type::GRAYSCALE, 8u8, 0u8),
        3 => (image_type::TRUECOLOR, 24, 0),
        2 | 4 => (image_type::TRUECOLOR, 32, 8),
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "cannot write {} channels as TGA",
                channels
            )));
        }
    };

    let mut header = [0u8; TGA_HEADER_SIZE];
    header[2] = kind;
    header[12..14].copy_from_slice(&w.to_le_bytes());
    header[14..16].copy_from_slice(&h.to_le_bytes());
    header[16] = bits_per_pixel;
    header[17] = TOP_LEFT_ORIGIN | alpha_bits;
    writer.write_all(&header).map_err(IoError::Io)?;

    let out_bytes = bits_per_pixel as usize / 8;
    let mut body = vec![0u8; width as usize * height as usize * out_bytes];
    let stride = channels as usize;
    for (px, dst) in pixels.chunks_exact(stride).zip(body.chunks_exact_mut(out_bytes)) {
        match channels {
            1 => dst[0] = px[0],
            2 => dst.copy_from_slice(&[px[0], px[0], px[0], px[1]]),
            3 => dst.copy_from_slice(&[px[2], px[1], px[0]]),
            _ => dst.copy_from_slice(&[px[2], px[1], px[0], px[3]]),
        }
    }
    writer.write_all(&body).map_err(IoError::Io)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_tga_roundtrip_rgb() {
        let pixels: Vec<u8> = (0..4 * 3 * 3u32).map(|i| (i * 11) as u8).collect();

        let mut buffer = Vec::new();
        write_tga(&pixels, 4, 3, 3, &mut buffer).unwrap();
        assert_eq!(buffer.len(), TGA_HEADER_SIZE + 36);

        let decoded = read_tga(Cursor::new(buffer)).unwrap();
        assert_eq!((decoded.width, decoded.height, decoded.channels), (4, 3, 3));
        assert_eq!(decoded.pixels, pixels);
    }

    #[test]
    fn test_tga_roundtrip_gray_and_rgba() {
        let gray = vec![0u8, 64, 128, 255];
        let mut buffer = Vec::new();
        write_tga(&gray, 2, 2, 1, &mut buffer).unwrap();
        let decoded = read_tga(Cursor::new(buffer)).unwrap();
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.pixels, gray);

        let rgba = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let mut buffer = Vec::new();
        write_tga(&rgba, 1, 2, 4, &mut buffer).unwrap();
        let decoded = read_tga(Cursor::new(buffer)).unwrap();
        assert_eq!(decoded.channels, 4);
        assert_eq!(decoded.pixels, rgba);
    }

    #[test]
    fn test_tga_bottom_up_rle() {
        // 2x2 RLE truecolor, bottom-left origin:
        // bottom row: run of 2 blue pixels; top row: 2 raw pixels (red, green)
        let mut data = vec![0u8; TGA_HEADER_SIZE];
        data[2] = image_type::RLE_TRUECOLOR;
        data[12] = 2;
        data[14] = 2;
        data[16] = 24;
        data.extend_from_slice(&[0x81, 255, 0, 0]);
        data.extend_from_slice(&[0x01, 0, 0, 255, 0, 255, 0]);

        let decoded = read_tga(Cursor::new(data)).unwrap();
        assert_eq!(decoded.channels, 3);
        assert_eq!(
            decoded.pixels,
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 255]
        );
    }

    #[test]
    fn test_tga_rle_overrun_is_error() {
        let mut data = vec![0u8; TGA_HEADER_SIZE];
        data[2] = image_type::RLE_GRAYSCALE;
        data[12] = 1;
        data[14] = 1;
        data[16] = 8;
        data.extend_from_slice(&[0x85, 7]);
        assert!(matches!(
            read_tga(Cursor::new(data)),
            Err(IoError::InvalidData(_))
        ));
    }

    #[test]
    fn test_tga_oversized_header_rejected() {
        for kind in [image_type::TRUECOLOR, image_type::RLE_TRUECOLOR] {
            let mut data = vec![0u8; TGA_HEADER_SIZE];
            data[2] = kind;
            data[12..14].copy_from_slice(&u16::MAX.to_le_bytes());
            data[14..16].copy_from_slice(&u16::MAX.to_le_bytes());
            data[16] = 32;
            assert!(matches!(
                read_tga(Cursor::new(data)),
                Err(IoError::InvalidData(_))
            ));
        }
    }

    #[test]
    fn test_tga_truncated_rle_is_error() {
        // 64x64 gray promised, one run of 10 pixels delivered
        let mut data = vec![0u8; TGA_HEADER_SIZE];
        data[2] = image_type::RLE_GRAYSCALE;
        data[12] = 64;
        data[14] = 64;
        data[16] = 8;
        data.extend_from_slice(&[0x89, 42]);
        assert!(matches!(read_tga(Cursor::new(data)), Err(IoError::Io(_))));
    }

    #[test]
    fn test_tga_rejects_colormapped() {
        let mut data = vec![0u8; TGA_HEADER_SIZE];
        data[1] = 1;
        data[2] = 1;
        data[12] = 1;
        data[14] = 1;
        data[16] = 8;
        assert!(matches!(
            read_tga(Cursor::new(data)),
            Err(IoError::UnsupportedFormat(_))
        ));
    }
}
