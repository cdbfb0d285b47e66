//! Channel-count conversion for decoded pixels
//!
//! Every pixel is widened to RGBA and then narrowed to the target layout,
//! which gives the usual rules: gray is replicated, color collapses to
//! [`luma`], a missing alpha becomes 255 and a dropped alpha is discarded.

use super::alloc_buffer;
use crate::channel::{MAX_CHANNELS, luma};
use crate::error::{Error, Result};

/// Convert interleaved pixels from `from` to `to` channels.
pub(super) fn convert_channels(src: &[u8], from: u32, to: u32) -> Result<Vec<u8>> {
    if !(1..=MAX_CHANNELS).contains(&from) {
        return Err(Error::InvalidChannelCount(from));
    }
    if !(1..=MAX_CHANNELS).contains(&to) {
        return Err(Error::InvalidChannelCount(to));
    }
    let from = from as usize;
    let to = to as usize;
    let pixel_count = src.len() / from;
    let mut out = alloc_buffer(pixel_count * to)?;

    for (s, d) in src.chunks_exact(from).zip(out.chunks_exact_mut(to)) {
        let (r, g, b, a) = match *s {
            [v] => (v, v, v, 255),
            [v, a] => (v, v, v, a),
            [r, g, b] => (r, g, b, 255),
            [r, g, b, a, ..] => (r, g, b, a),
            [] => unreachable!("chunks_exact never yields empty chunks"),
        };
        match d {
            [y] => *y = luma(r, g, b),
            [y, alpha] => {
                *y = luma(r, g, b);
                *alpha = a;
            }
            [dr, dg, db] => {
                *dr = r;
                *dg = g;
                *db = b;
            }
            [dr, dg, db, da, ..] => {
                *dr = r;
                *dg = g;
                *db = b;
                *da = a;
            }
            [] => unreachable!("chunks_exact never yields empty chunks"),
        }
    }

    Ok(out)
}
