//! raster-test - Regression test framework for rasterkit
//!
//! Provides [`RegParams`] to collect numbered checks inside one regression
//! test, synthetic image builders, and the output directory used for
//! written artifacts.
//!
//! # Usage
//!
//! ```ignore
//! use raster_test::{RegParams, gradient_image};
//!
//! let mut rp = RegParams::new("grayscale");
//! let img = gradient_image(16, 16, 3).unwrap();
//! rp.compare_values(768.0, img.byte_size() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: "compare" (default) only checks; "display" also writes
//!   every image passed to [`RegParams::write_image_and_check`] under
//!   [`regout_dir`] for visual inspection.

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use raster_core::RasterImage;

/// Build an image whose bytes vary smoothly with position and channel.
///
/// Channel `c` of pixel `(x, y)` is `(x * 255 / width + y * 7 + c * 40) % 256`,
/// so neighbouring channels differ and grayscale has visible effect.
pub fn gradient_image(width: u32, height: u32, channels: u32) -> TestResult<RasterImage> {
    let mut img = RasterImage::create_blank(width, height, channels)?;
    let stride = channels as usize;
    let w = width as usize;
    for (i, px) in img.data_mut().chunks_exact_mut(stride).enumerate() {
        let (x, y) = (i % w, i / w);
        for (c, v) in px.iter_mut().enumerate() {
            *v = ((x * 255 / w + y * 7 + c * 40) % 256) as u8;
        }
    }
    Ok(img)
}

/// Build an image filled with one pixel value.
pub fn solid_image(width: u32, height: u32, pixel: &[u8]) -> TestResult<RasterImage> {
    let channels = pixel.len() as u32;
    let mut img = RasterImage::create_blank(width, height, channels)?;
    for px in img.data_mut().chunks_exact_mut(pixel.len()) {
        px.copy_from_slice(pixel);
    }
    Ok(img)
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // raster-test is at crates/raster-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_image_geometry() {
        let img = gradient_image(8, 4, 3).unwrap();
        assert_eq!(img.byte_size(), 8 * 4 * 3);
        assert_eq!(img.pixel(0, 0), Some(&[0u8, 40, 80][..]));
        assert_eq!(img.pixel(0, 1), Some(&[7u8, 47, 87][..]));
    }

    #[test]
    fn test_solid_image() {
        let img = solid_image(3, 2, &[1, 2, 3, 4]).unwrap();
        assert_eq!(img.channels(), 4);
        assert!(img.data().chunks_exact(4).all(|px| px == [1, 2, 3, 4]));
    }
}
