//! I/O formats regression test
//!
//! Writes synthetic images in every format chosen by file name, reads
//! them back and checks geometry and pixels (JPEG within a tolerance).
//!
//! Run with:
//! ```
//! cargo test -p raster-io --test ioformats_reg
//! ```

use raster_io::{
    ImageFileFormat, RasterImage, StdCodec, detect_format, read_image, read_image_mem,
    resolve_format, write_image, write_image_mem,
};
use raster_test::{RegParams, gradient_image, regout_dir, solid_image};
use std::fs;

#[test]
fn ioformats_reg() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rp = RegParams::new("ioformats");

    let outdir = regout_dir();
    fs::create_dir_all(&outdir).expect("Failed to create output directory");

    // Lossless formats keep every byte for 1, 3 and 4 channels
    for ext in ["png", "bmp", "tga"] {
        for channels in [1, 3, 4] {
            let src = gradient_image(19, 13, channels).unwrap();
            let path = format!("{}/ioformats_{}c.{}", outdir, channels, ext);
            eprintln!("Testing {} ({} channels)", path, channels);

            write_image(&src, &path).unwrap();
            rp.compare_values(
                1.0,
                if detect_format(&path).unwrap() == resolve_format(&path) { 1.0 } else { 0.0 },
                0.0,
            );
            let back = read_image(&path, 0).unwrap();
            rp.compare_images(&src, &back);
        }
    }

    // PNG keeps gray+alpha as two channels
    let src = gradient_image(8, 8, 2).unwrap();
    let bytes = write_image_mem(&src, ImageFileFormat::Png).unwrap();
    let decoded = read_image_mem(&bytes).unwrap();
    rp.compare_values(2.0, decoded.channels as f64, 0.0);
    rp.compare_bytes(src.data(), &decoded.pixels);

    // BMP and TGA widen gray+alpha to RGBA
    for format in [ImageFileFormat::Bmp, ImageFileFormat::Tga] {
        let bytes = write_image_mem(&src, format).unwrap();
        let decoded = read_image_mem(&bytes).unwrap();
        rp.compare_values(4.0, decoded.channels as f64, 0.0);
        let back = RasterImage::from_decoded(decoded, 2).unwrap();
        rp.compare_images(&src, &back);
    }

    // JPEG is lossy: smooth content comes back close at quality 100
    let src = solid_image(32, 16, &[180, 90, 30]).unwrap();
    let path = format!("{}/ioformats_solid.jpg", outdir);
    write_image(&src, &path).unwrap();
    let back = read_image(&path, 0).unwrap();
    rp.compare_images_within(&src, &back, 4);

    // Channel forcing on read
    let path = format!("{}/ioformats_force.png", outdir);
    write_image(&gradient_image(10, 10, 3).unwrap(), &path).unwrap();
    for force in 1..=4 {
        let img = read_image(&path, force).unwrap();
        rp.compare_values(force as f64, img.channels() as f64, 0.0);
        rp.compare_values((10 * 10 * force) as f64, img.byte_size() as f64, 0.0);
    }

    // Unknown extension is written as PNG
    let path = format!("{}/ioformats_default.unknownext", outdir);
    let src = gradient_image(4, 4, 3).unwrap();
    rp.compare_values(1.0, if src.write(&path, &StdCodec) { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(
        1.0,
        if detect_format(&path).unwrap() == ImageFileFormat::Png { 1.0 } else { 0.0 },
        0.0,
    );

    assert!(rp.cleanup());
}
