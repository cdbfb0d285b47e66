//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use raster_core::RasterImage;
use std::fs;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Check only (default)
    #[default]
    Compare,
    /// Check and write artifacts for visual inspection
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, mode, and success status.
pub struct RegParams {
    /// Name of the test (e.g., "grayscale")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode comes from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if `|expected - actual| <= delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            self.fail(format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            ));
            false
        } else {
            true
        }
    }

    /// Compare two images for exact equality of geometry and bytes
    pub fn compare_images(&mut self, img1: &RasterImage, img2: &RasterImage) -> bool {
        self.index += 1;

        if img1.width() != img2.width()
            || img1.height() != img2.height()
            || img1.channels() != img2.channels()
        {
            self.fail(format!(
                "Failure in {}_reg: image comparison for index {} - geometry mismatch \
                 ({}x{}x{} vs {}x{}x{})",
                self.test_name,
                self.index,
                img1.width(),
                img1.height(),
                img1.channels(),
                img2.width(),
                img2.height(),
                img2.channels()
            ));
            return false;
        }

        if let Some(pos) = img1
            .data()
            .iter()
            .zip(img2.data())
            .position(|(a, b)| a != b)
        {
            let stride = img1.channels().max(1) as usize;
            let pixel = pos / stride;
            let width = img1.width().max(1) as usize;
            self.fail(format!(
                "Failure in {}_reg: image comparison for index {} - byte mismatch at ({}, {}) channel {}",
                self.test_name,
                self.index,
                pixel % width,
                pixel / width,
                pos % stride
            ));
            return false;
        }

        true
    }

    /// Compare two images allowing each byte to differ by `delta`
    pub fn compare_images_within(
        &mut self,
        img1: &RasterImage,
        img2: &RasterImage,
        delta: u8,
    ) -> bool {
        self.index += 1;

        let same_geometry = img1.width() == img2.width()
            && img1.height() == img2.height()
            && img1.channels() == img2.channels();
        let max_diff = img1
            .data()
            .iter()
            .zip(img2.data())
            .map(|(a, b)| a.abs_diff(*b))
            .max()
            .unwrap_or(0);

        if !same_geometry || max_diff > delta {
            self.fail(format!(
                "Failure in {}_reg: approximate image comparison for index {} \
                 (same geometry: {}, max diff {} > {})",
                self.test_name, self.index, same_geometry, max_diff, delta
            ));
            false
        } else {
            true
        }
    }

    /// Compare two byte arrays
    pub fn compare_bytes(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;

        if data1 != data2 {
            self.fail(format!(
                "Failure in {}_reg: byte comparison for index {}\n\
                 sizes: {} vs {}",
                self.test_name,
                self.index,
                data1.len(),
                data2.len()
            ));
            false
        } else {
            true
        }
    }

    /// Write an image under [`regout_dir`] in display mode
    ///
    /// The file is named `<test>.<index>.<ext>`. Nothing is written in
    /// compare mode. Returns the path that was (or would have been) used.
    pub fn write_image_and_check(&mut self, image: &RasterImage, ext: &str) -> TestResult<String> {
        self.index += 1;

        let local_path = format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            ext
        );

        if self.display() {
            fs::create_dir_all(regout_dir())?;
            raster_io::write_image(image, &local_path).map_err(|e| TestError::ImageWrite {
                path: local_path.clone(),
                message: e.to_string(),
            })?;
            eprintln!("Wrote: {}", local_path);
        }

        Ok(local_path)
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all checks passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all tests have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_values_within_delta() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_images_reports_position() {
        let a = RasterImage::from_pixels(2, 1, 3, vec![0, 0, 0, 1, 2, 3]).unwrap();
        let b = RasterImage::from_pixels(2, 1, 3, vec![0, 0, 0, 1, 9, 3]).unwrap();
        let mut rp = RegParams::new("test");
        assert!(rp.compare_images(&a, &a.clone()));
        assert!(!rp.compare_images(&a, &b));
        assert!(rp.failures()[0].contains("(1, 0) channel 1"));
        assert_eq!(rp.index(), 2);
    }

    #[test]
    fn test_compare_images_within() {
        let a = RasterImage::from_pixels(1, 1, 3, vec![10, 10, 10]).unwrap();
        let b = RasterImage::from_pixels(1, 1, 3, vec![12, 8, 10]).unwrap();
        let mut rp = RegParams::new("test");
        assert!(rp.compare_images_within(&a, &b, 2));
        assert!(!rp.compare_images_within(&a, &b, 1));
    }
}
