//! Per-pixel channel operations
//!
//! Both operations need at least three channels and mutate in place,
//! returning the same image for chaining.

use super::RasterImage;
use crate::channel::{BLUE, GREEN, RED};

/// Scale a channel byte, saturating to 0..=255.
///
/// Products above 255 clamp to 255; negative or NaN factors give 0.
#[inline]
fn scale(value: u8, factor: f32) -> u8 {
    (value as f32 * factor) as u8
}

impl RasterImage {
    /// Multiply red, green and blue by the given factors.
    ///
    /// Results are truncated toward zero and clamped to the byte range.
    pub fn apply_color_mask(&mut self, r: f32, g: f32, b: f32) -> &mut Self {
        let Some(stride) = self.color_stride("apply_color_mask") else {
            return self;
        };
        for px in self.data.chunks_exact_mut(stride) {
            px[RED] = scale(px[RED], r);
            px[GREEN] = scale(px[GREEN], g);
            px[BLUE] = scale(px[BLUE], b);
        }
        self
    }

    /// Exchange the green and blue bytes of every pixel.
    #[doc(alias = "to_green")]
    pub fn swap_green_blue(&mut self) -> &mut Self {
        let Some(stride) = self.color_stride("swap_green_blue") else {
            return self;
        };
        for px in self.data.chunks_exact_mut(stride) {
            px.swap(GREEN, BLUE);
        }
        self
    }
}
