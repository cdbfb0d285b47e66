//! Grayscale regression test
//!
//! Checks the average and luminosity conversions, their idempotence,
//! and that the partitioned average matches the sequential one.
//!
//! Run with:
//! ```
//! cargo test -p raster-core --test grayscale_reg
//! ```

use raster_core::{ParallelConfig, RasterImage};
use raster_test::{RegParams, gradient_image, solid_image};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn grayscale_reg() {
    init_logging();
    let mut rp = RegParams::new("grayscale");

    // 2x2 RGB scenario: averages 20, 50, 80, 110
    let mut img = RasterImage::from_pixels(
        2,
        2,
        3,
        vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120],
    )
    .unwrap();
    img.grayscale_average();
    rp.compare_bytes(
        img.data(),
        &[20, 20, 20, 50, 50, 50, 80, 80, 80, 110, 110, 110],
    );

    // Both methods are idempotent and keep the buffer size
    for channels in [3, 4] {
        let src = gradient_image(37, 11, channels).unwrap();

        let mut avg = src.clone();
        avg.grayscale_average();
        let once = avg.clone();
        avg.grayscale_average();
        rp.compare_images(&once, &avg);
        rp.compare_values(src.byte_size() as f64, avg.byte_size() as f64, 0.0);

        let mut lum = src.clone();
        lum.grayscale_luminosity();
        let once = lum.clone();
        lum.grayscale_luminosity();
        rp.compare_images(&once, &lum);
        rp.compare_values(src.byte_size() as f64, lum.byte_size() as f64, 0.0);

        // Every pixel is gray afterwards
        let gray = lum
            .data()
            .chunks_exact(channels as usize)
            .all(|px| px[0] == px[1] && px[1] == px[2]);
        rp.compare_values(1.0, if gray { 1.0 } else { 0.0 }, 0.0);
    }

    // The two methods disagree on saturated colors
    let mut a = solid_image(1, 1, &[200, 10, 10]).unwrap();
    let mut b = a.clone();
    a.grayscale_average();
    b.grayscale_luminosity();
    rp.compare_values(73.0, a.data()[0] as f64, 0.0);
    rp.compare_values(67.0, b.data()[0] as f64, 0.0);

    // Alpha is left alone
    let mut rgba = gradient_image(9, 9, 4).unwrap();
    let alpha_before: Vec<u8> = rgba.data().iter().skip(3).step_by(4).copied().collect();
    rgba.grayscale_luminosity();
    let alpha_after: Vec<u8> = rgba.data().iter().skip(3).step_by(4).copied().collect();
    rp.compare_bytes(&alpha_before, &alpha_after);

    assert!(rp.cleanup());
}

#[test]
fn grayscale_parallel_reg() {
    init_logging();
    let mut rp = RegParams::new("grayscale_parallel");

    // Alignment-safe geometry (byte size divisible by 3 partitions * 3 channels)
    // and awkward ones that are not
    let geometries = [(6, 6, 3), (64, 48, 3), (7, 5, 3), (13, 1, 4), (1, 1, 3), (101, 3, 4)];
    for (w, h, c) in geometries {
        let src = gradient_image(w, h, c).unwrap();
        let mut seq = src.clone();
        seq.grayscale_average();

        let mut par = src.clone();
        par.grayscale_average_parallel();
        rp.compare_images(&seq, &par);

        for n in [1, 2, 5, 16] {
            let mut par = src.clone();
            par.grayscale_average_parallel_with(ParallelConfig::new(n));
            rp.compare_images(&seq, &par);
        }
    }

    // Fewer than 3 channels: untouched
    let gray = gradient_image(10, 10, 2).unwrap();
    let mut par = gray.clone();
    par.grayscale_average_parallel();
    rp.compare_images(&gray, &par);

    assert!(rp.cleanup());
}
