//! Pixel-aligned fan-out over disjoint buffer partitions
//!
//! The buffer is split by pixel index, never by raw byte offset, so every
//! partition starts on a pixel boundary. Each partition gets
//! `pixel_count / partitions` pixels and the last one also takes the
//! remainder. Partitions run as tasks on the rayon pool and the caller is
//! blocked until all of them have finished.

use std::ops::Range;

/// Partition count used by [`RasterImage::grayscale_average_parallel`].
///
/// [`RasterImage::grayscale_average_parallel`]: super::RasterImage::grayscale_average_parallel
pub const DEFAULT_PARTITIONS: usize = 3;

/// Settings for the partitioned transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Number of disjoint partitions (at least 1)
    pub partitions: usize,
}

impl ParallelConfig {
    /// Create a config; zero partitions is treated as one.
    pub fn new(partitions: usize) -> Self {
        Self {
            partitions: partitions.max(1),
        }
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PARTITIONS)
    }
}

/// Byte ranges of each partition for `pixel_count` pixels of `stride` bytes.
///
/// The ranges are contiguous, disjoint, start on multiples of `stride` and
/// together cover `0..pixel_count * stride`. Zero partitions is treated as
/// one. When there are more partitions than pixels the leading ranges are
/// empty.
pub fn partition_ranges(pixel_count: usize, stride: usize, partitions: usize) -> Vec<Range<usize>> {
    let partitions = partitions.max(1);
    let per_partition = pixel_count / partitions;
    (0..partitions)
        .map(|t| {
            let start = t * per_partition;
            let end = if t == partitions - 1 {
                pixel_count
            } else {
                start + per_partition
            };
            start * stride..end * stride
        })
        .collect()
}

/// Run `op` on every partition of `data` concurrently and wait for all.
pub(super) fn for_each_partition<F>(data: &mut [u8], stride: usize, partitions: usize, op: F)
where
    F: Fn(&mut [u8]) + Sync,
{
    let ranges = partition_ranges(data.len() / stride, stride, partitions);
    let mut rest = data;
    let mut parts = Vec::with_capacity(ranges.len());
    for range in &ranges {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
        parts.push(head);
        rest = tail;
    }

    let op = &op;
    rayon::scope(|s| {
        for part in parts.into_iter().filter(|p| !p.is_empty()) {
            s.spawn(move |_| op(part));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partitions_cover_buffer() {
        let ranges = partition_ranges(10, 3, 3);
        assert_eq!(ranges, vec![0..9, 9..18, 18..30]);
    }

    #[test]
    fn test_partitions_start_on_pixel_boundary() {
        for pixels in [1usize, 7, 64, 1001] {
            for stride in 1..=4 {
                for n in 1..=8 {
                    let ranges = partition_ranges(pixels, stride, n);
                    assert_eq!(ranges.len(), n);
                    assert_eq!(ranges[0].start, 0);
                    assert_eq!(ranges[n - 1].end, pixels * stride);
                    for pair in ranges.windows(2) {
                        assert_eq!(pair[0].end, pair[1].start);
                    }
                    for r in &ranges {
                        assert_eq!(r.start % stride, 0);
                        assert_eq!(r.end % stride, 0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_partitions_is_one() {
        assert_eq!(partition_ranges(4, 4, 0), vec![0..16]);
        assert_eq!(ParallelConfig::new(0).partitions, 1);
    }

    #[test]
    fn test_more_partitions_than_pixels() {
        let ranges = partition_ranges(2, 3, 4);
        assert_eq!(ranges, vec![0..0, 0..0, 0..0, 0..6]);
    }

    #[test]
    fn test_for_each_partition_touches_every_byte_once() {
        let mut data = vec![0u8; 4 * 101];
        for_each_partition(&mut data, 4, 3, |part| {
            for b in part.iter_mut() {
                *b += 1;
            }
        });
        assert!(data.iter().all(|&b| b == 1));
    }
}
