//! Grayscale conversion
//!
//! Both methods rewrite the first three bytes of every pixel with one gray
//! value and leave any further channel (alpha) alone:
//!
//! - average: `(r + g + b) / 3`, truncated
//! - luminosity: `floor(0.3 r + 0.59 g + 0.11 b)`
//!
//! Images with fewer than three channels are assumed to be gray already and
//! are returned unchanged.

use super::RasterImage;
use super::parallel::{ParallelConfig, for_each_partition};
use crate::channel::{average, luminosity};
use log::debug;
use std::time::Instant;

/// Apply `to_gray` to every pixel of an interleaved run.
fn gray_run(data: &mut [u8], stride: usize, to_gray: fn(u8, u8, u8) -> u8) {
    for px in data.chunks_exact_mut(stride) {
        let gray = to_gray(px[0], px[1], px[2]);
        px[..3].fill(gray);
    }
}

impl RasterImage {
    /// Convert to gray using the truncated channel average.
    ///
    /// # See also
    ///
    /// [`RasterImage::grayscale_average_parallel`] for the partitioned variant.
    pub fn grayscale_average(&mut self) -> &mut Self {
        let Some(stride) = self.color_stride("grayscale_average") else {
            return self;
        };
        let start = Instant::now();
        gray_run(&mut self.data, stride, average);
        debug!(
            "grayscale_average: {} bytes in {} ms",
            self.data.len(),
            start.elapsed().as_millis()
        );
        self
    }

    /// Convert to gray using perceptual weights 0.3 / 0.59 / 0.11.
    pub fn grayscale_luminosity(&mut self) -> &mut Self {
        let Some(stride) = self.color_stride("grayscale_luminosity") else {
            return self;
        };
        gray_run(&mut self.data, stride, luminosity);
        self
    }

    /// Same result as [`RasterImage::grayscale_average`], computed over
    /// [`DEFAULT_PARTITIONS`](super::DEFAULT_PARTITIONS) concurrent partitions.
    pub fn grayscale_average_parallel(&mut self) -> &mut Self {
        self.grayscale_average_parallel_with(ParallelConfig::default())
    }

    /// Partitioned average grayscale with an explicit partition count.
    ///
    /// Returns once every partition has been processed. The output is
    /// byte-for-byte identical to the sequential method for any geometry.
    pub fn grayscale_average_parallel_with(&mut self, config: ParallelConfig) -> &mut Self {
        let Some(stride) = self.color_stride("grayscale_average_parallel") else {
            return self;
        };
        let start = Instant::now();
        for_each_partition(&mut self.data, stride, config.partitions, |part| {
            gray_run(part, stride, average)
        });
        debug!(
            "grayscale_average_parallel: {} bytes, {} partitions in {} ms",
            self.data.len(),
            config.partitions,
            start.elapsed().as_millis()
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RasterImage {
        RasterImage::from_pixels(
            2,
            2,
            3,
            vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120],
        )
        .unwrap()
    }

    #[test]
    fn test_average_2x2() {
        let mut img = sample();
        img.grayscale_average();
        assert_eq!(
            img.data(),
            &[20, 20, 20, 50, 50, 50, 80, 80, 80, 110, 110, 110]
        );
    }

    #[test]
    fn test_luminosity_2x2() {
        let mut img = sample();
        img.grayscale_luminosity();
        // 0.3*10 + 0.59*20 + 0.11*30 = 18.1 etc.
        assert_eq!(
            img.data(),
            &[18, 18, 18, 48, 48, 48, 78, 78, 78, 108, 108, 108]
        );
    }

    #[test]
    fn test_alpha_untouched() {
        let mut img = RasterImage::from_pixels(1, 1, 4, vec![30, 60, 90, 7]).unwrap();
        img.grayscale_average();
        assert_eq!(img.data(), &[60, 60, 60, 7]);
    }

    #[test]
    fn test_single_channel_is_noop() {
        let mut img = RasterImage::from_pixels(3, 1, 1, vec![1, 2, 3]).unwrap();
        img.grayscale_average()
            .grayscale_luminosity()
            .grayscale_average_parallel();
        assert_eq!(img.data(), &[1, 2, 3]);
    }

    #[test]
    fn test_parallel_matches_sequential_on_odd_geometry() {
        // 7x5x3 = 105 bytes: not divisible by 3 partitions * 3 channels
        let data: Vec<u8> = (0..105u32).map(|i| (i * 37 % 256) as u8).collect();
        let mut seq = RasterImage::from_pixels(7, 5, 3, data.clone()).unwrap();
        let mut par = RasterImage::from_pixels(7, 5, 3, data).unwrap();
        seq.grayscale_average();
        for n in 1..=8 {
            let mut img = par.clone();
            img.grayscale_average_parallel_with(ParallelConfig::new(n));
            assert_eq!(img, seq, "partitions = {n}");
        }
        par.grayscale_average_parallel();
        assert_eq!(par, seq);
    }

    #[test]
    fn test_invalid_image_is_noop() {
        let mut img = RasterImage::default();
        img.grayscale_average().grayscale_average_parallel();
        assert_eq!(img.byte_size(), 0);
    }
}
