//! rasterkit - Apply transforms to an image file
//!
//! ```text
//! rasterkit <input> <output> [op...]
//! ```
//!
//! Operations run left to right on the decoded image:
//!
//! - `gray-avg`, `gray-lum`, `gray-par`
//! - `mask:R,G,B` with float factors, e.g. `mask:1,0,0`
//! - `swap-gb`
//!
//! The output format follows the output file extension. The process exits
//! with status 0 on success and 1 on any failure.

use log::error;
use rasterkit::{RasterImage, StdCodec};
use std::process::ExitCode;

const USAGE: &str =
    "usage: rasterkit <input> <output> [gray-avg|gray-lum|gray-par|mask:R,G,B|swap-gb]...";

/// Parse `R,G,B` into three factors.
fn parse_mask(arg: &str) -> Option<(f32, f32, f32)> {
    let mut parts = arg.split(',').map(|p| p.trim().parse::<f32>());
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(Ok(r)), Some(Ok(g)), Some(Ok(b)), None) => Some((r, g, b)),
        _ => None,
    }
}

/// Apply one named operation, or report it as unknown.
fn apply(img: &mut RasterImage, op: &str) -> Result<(), String> {
    match op {
        "gray-avg" => {
            img.grayscale_average();
        }
        "gray-lum" => {
            img.grayscale_luminosity();
        }
        "gray-par" => {
            img.grayscale_average_parallel();
        }
        "swap-gb" => {
            img.swap_green_blue();
        }
        _ => match op.strip_prefix("mask:").and_then(parse_mask) {
            Some((r, g, b)) => {
                img.apply_color_mask(r, g, b);
            }
            None => return Err(format!("unknown operation '{}'", op)),
        },
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [input, output, ops @ ..] = args.as_slice() else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    let mut img = RasterImage::from_file(input, 0, &StdCodec);
    if !img.is_valid() {
        return ExitCode::FAILURE;
    }

    for op in ops {
        if let Err(e) = apply(&mut img, op) {
            error!("{}", e);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    }

    if img.write(output, &StdCodec) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
