//! rasterkit - In-memory raster images for Rust
//!
//! # Overview
//!
//! rasterkit decodes PNG, JPEG, BMP and TGA files into an owned pixel
//! buffer, applies per-pixel transforms and writes the result back out:
//!
//! - Grayscale by channel average or by perceptual luminosity
//! - A partitioned, multi-threaded average grayscale
//! - Per-channel color masks and a green/blue swap
//!
//! # Example
//!
//! ```
//! use rasterkit::RasterImage;
//!
//! let mut img = RasterImage::create_blank(64, 48, 3).unwrap();
//! img.grayscale_luminosity().swap_green_blue();
//! assert_eq!(img.byte_size(), 64 * 48 * 3);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use raster_core::*;

// Re-export the codec crate as a module to avoid name conflicts
pub use raster_io as io;
pub use raster_io::StdCodec;
