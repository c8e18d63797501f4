//! Statistical analysis: histogram, mean/stddev, brightness, contrast,
//! entropy and Sobel edge magnitude.
//!
//! Every statistic uses the 256-bin histogram policy from
//! [`crate::buffer::SampleFormat::bin_index`]: 16-bit sources are binned by their top
//! byte and float sources are clamped to 0.0-1.0 and scaled, so numbers
//! stay comparable across bit depths.

use crate::buffer::{ChannelLayout, PixelBuffer};
use crate::error::{ImageError, Result};

/// Per-channel mean and standard deviation, sized to the buffer's channel
/// count.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelStats {
    pub mean: Vec<f64>,
    pub stddev: Vec<f64>,
}

// ============================================================================
// Histogram
// ============================================================================

/// Count samples into 256 bins per channel.
///
/// The result holds `256 * channels` counts, channel-major: bin `b` of
/// channel `c` lives at `c * 256 + b`. Bin counts per channel sum to
/// `width * height`.
pub fn histogram(image: &PixelBuffer) -> Vec<u32> {
    let (w, h, c) = (image.width(), image.height(), image.channels());
    let format = image.format();
    let mut bins = vec![0u32; 256 * c];
    for y in 0..h {
        for x in 0..w {
            for ch in 0..c {
                bins[ch * 256 + format.bin_index(image.get(x, y, ch))] += 1;
            }
        }
    }
    bins
}

// ============================================================================
// Mean / stddev
// ============================================================================

/// Per-channel mean and standard deviation in the canonical domain.
///
/// Accumulates in f64; the variance is floored at zero before the square
/// root to absorb floating-point cancellation on near-constant channels.
pub fn mean_stddev(image: &PixelBuffer) -> ChannelStats {
    let (w, h, c) = (image.width(), image.height(), image.channels());
    let n = (w * h) as f64;
    let mut mean = Vec::with_capacity(c);
    let mut stddev = Vec::with_capacity(c);
    for ch in 0..c {
        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for y in 0..h {
            for x in 0..w {
                let v = image.get(x, y, ch) as f64;
                sum += v;
                sum_sq += v * v;
            }
        }
        let m = sum / n;
        let variance = (sum_sq / n - m * m).max(0.0);
        mean.push(m);
        stddev.push(variance.sqrt());
    }
    ChannelStats { mean, stddev }
}

// ============================================================================
// Brightness / contrast
// ============================================================================

/// Average luminance normalized to 0.0-1.0 by the format maximum.
///
/// An all-zero buffer reports 0.0; an all-maximum buffer reports 1.0.
pub fn brightness(image: &PixelBuffer) -> f64 {
    let (w, h) = (image.width(), image.height());
    let mut total = 0.0f64;
    for y in 0..h {
        for x in 0..w {
            total += image.luminance(x, y) as f64;
        }
    }
    total / ((w * h) as f64 * image.format().max_value() as f64)
}

/// Average per-channel standard deviation normalized to 0.0-1.0 by the
/// format maximum.
pub fn contrast(image: &PixelBuffer) -> f64 {
    let stats = mean_stddev(image);
    let total: f64 = stats.stddev.iter().sum();
    total / stats.stddev.len() as f64 / image.format().max_value() as f64
}

// ============================================================================
// Entropy
// ============================================================================

/// Shannon entropy in bits over the aggregated histogram.
///
/// Bins are summed across channels; probabilities are counts over total
/// samples, and only nonzero bins contribute.
pub fn entropy(image: &PixelBuffer) -> f64 {
    let bins = histogram(image);
    let c = image.channels();
    let mut aggregated = [0u64; 256];
    for ch in 0..c {
        for b in 0..256 {
            aggregated[b] += bins[ch * 256 + b] as u64;
        }
    }
    let total = (image.width() * image.height() * c) as f64;
    let mut entropy = 0.0f64;
    for &count in aggregated.iter() {
        if count == 0 {
            continue;
        }
        let p = count as f64 / total;
        entropy -= p * p.log2();
    }
    entropy
}

// ============================================================================
// Sobel edge magnitude
// ============================================================================

const SOBEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Sobel gradient magnitude over the source luminance.
///
/// Returns a new single-channel buffer of the source's sample format.
/// Interior pixels hold `sqrt(gx^2 + gy^2)` clamped to the format maximum;
/// the border ring (where the 3x3 window would leave the image) stays zero.
/// Fails with [`ImageError::TooSmall`] when either dimension is below 3.
pub fn edge_sobel(image: &PixelBuffer) -> Result<PixelBuffer> {
    let (w, h) = (image.width(), image.height());
    if w < 3 || h < 3 {
        return Err(ImageError::TooSmall {
            width: w,
            height: h,
            required: 3,
        });
    }

    let max = image.format().max_value();
    let mut out = PixelBuffer {
        layout: ChannelLayout::Gray,
        store: image.zeroed_like(w, h, 1),
    };
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let mut gx = 0.0f32;
            let mut gy = 0.0f32;
            for ky in 0..3 {
                for kx in 0..3 {
                    let v = image.luminance(x + kx - 1, y + ky - 1);
                    gx += SOBEL_X[ky][kx] * v;
                    gy += SOBEL_Y[ky][kx] * v;
                }
            }
            let magnitude = (gx * gx + gy * gy).sqrt().min(max);
            out.put(x, y, 0, magnitude);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ChannelLayout, SampleFormat};

    #[test]
    fn test_histogram_counts_sum_to_pixel_count() {
        let mut img = PixelBuffer::new(4, 3, SampleFormat::U8, ChannelLayout::Rgb).unwrap();
        img.put(2, 1, 0, 200.0);
        let bins = histogram(&img);
        assert_eq!(bins.len(), 256 * 3);
        for ch in 0..3 {
            let sum: u32 = bins[ch * 256..(ch + 1) * 256].iter().sum();
            assert_eq!(sum, 12);
        }
        assert_eq!(bins[200], 1);
        assert_eq!(bins[0], 11);
    }

    #[test]
    fn test_histogram_u16_uses_top_byte() {
        let mut img = PixelBuffer::new(1, 1, SampleFormat::U16, ChannelLayout::Gray).unwrap();
        img.put(0, 0, 0, 0x1234 as f32);
        let bins = histogram(&img);
        assert_eq!(bins[0x12], 1);
    }

    #[test]
    fn test_histogram_f32_scales_unit_range() {
        let mut img = PixelBuffer::new(2, 1, SampleFormat::F32, ChannelLayout::Gray).unwrap();
        img.put(0, 0, 0, 0.5);
        img.put(1, 0, 0, 3.0); // clamps into the top bin
        let bins = histogram(&img);
        assert_eq!(bins[128], 1);
        assert_eq!(bins[255], 1);
    }

    #[test]
    fn test_mean_stddev_known_values() {
        let mut img = PixelBuffer::new(2, 2, SampleFormat::U8, ChannelLayout::Gray).unwrap();
        for (i, v) in [10.0, 20.0, 30.0, 40.0].into_iter().enumerate() {
            img.put(i % 2, i / 2, 0, v);
        }
        let stats = mean_stddev(&img);
        assert!((stats.mean[0] - 25.0).abs() < 1e-9);
        assert!((stats.stddev[0] - 125.0f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_stddev_constant_channel_is_zero() {
        let mut img = PixelBuffer::new(3, 3, SampleFormat::U16, ChannelLayout::Gray).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                img.put(x, y, 0, 40000.0);
            }
        }
        let stats = mean_stddev(&img);
        assert_eq!(stats.stddev[0], 0.0);
    }

    #[test]
    fn test_brightness_extremes() {
        let dark = PixelBuffer::new(2, 2, SampleFormat::U8, ChannelLayout::Rgb).unwrap();
        assert_eq!(brightness(&dark), 0.0);

        let mut bright = PixelBuffer::new(2, 2, SampleFormat::F32, ChannelLayout::Rgb).unwrap();
        for y in 0..2 {
            for x in 0..2 {
                for ch in 0..3 {
                    bright.put(x, y, ch, 1.0);
                }
            }
        }
        assert!((brightness(&bright) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_contrast_flat_versus_checkerboard() {
        let flat = PixelBuffer::new(2, 2, SampleFormat::U8, ChannelLayout::Gray).unwrap();
        assert_eq!(contrast(&flat), 0.0);

        let mut checker = PixelBuffer::new(2, 2, SampleFormat::U8, ChannelLayout::Gray).unwrap();
        checker.put(0, 0, 0, 255.0);
        checker.put(1, 1, 0, 255.0);
        // stddev = 127.5, normalized to 0.5.
        assert!((contrast(&checker) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_entropy_uniform_versus_constant() {
        let constant = PixelBuffer::new(4, 4, SampleFormat::U8, ChannelLayout::Gray).unwrap();
        assert_eq!(entropy(&constant), 0.0);

        let mut two_level = PixelBuffer::new(2, 1, SampleFormat::U8, ChannelLayout::Gray).unwrap();
        two_level.put(1, 0, 0, 255.0);
        assert!((entropy(&two_level) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sobel_rejects_tiny_images() {
        let img = PixelBuffer::new(2, 5, SampleFormat::U8, ChannelLayout::Gray).unwrap();
        assert!(matches!(
            edge_sobel(&img).unwrap_err(),
            ImageError::TooSmall { .. }
        ));
    }

    #[test]
    fn test_sobel_point_source_ring() {
        // 5x5 zeros with a bright center: the interior ring around the
        // center lights up, the outer border stays zero.
        let mut img = PixelBuffer::new(5, 5, SampleFormat::U8, ChannelLayout::Gray).unwrap();
        img.put(2, 2, 0, 255.0);
        let edges = edge_sobel(&img).unwrap();
        assert_eq!(edges.channels(), 1);
        assert_eq!(edges.format(), SampleFormat::U8);
        // Center has zero gradient by symmetry.
        assert_eq!(edges.get(2, 2, 0), 0.0);
        for (x, y) in [(1, 1), (1, 2), (1, 3), (2, 1), (2, 3), (3, 1), (3, 2), (3, 3)] {
            assert!(edges.get(x, y, 0) > 0.0, "ring pixel ({x}, {y}) should be lit");
        }
        for i in 0..5 {
            assert_eq!(edges.get(i, 0, 0), 0.0);
            assert_eq!(edges.get(0, i, 0), 0.0);
            assert_eq!(edges.get(i, 4, 0), 0.0);
            assert_eq!(edges.get(4, i, 0), 0.0);
        }
    }

    #[test]
    fn test_sobel_magnitude_clamps_to_format_max() {
        let mut img = PixelBuffer::new(3, 3, SampleFormat::U8, ChannelLayout::Gray).unwrap();
        for y in 0..3 {
            img.put(2, y, 0, 255.0);
        }
        let edges = edge_sobel(&img).unwrap();
        // Vertical step edge: |gx| = 4 * 255, clamped to 255.
        assert_eq!(edges.get(1, 1, 0), 255.0);
    }

    #[test]
    fn test_sobel_uses_rgb_luminance() {
        let mut img = PixelBuffer::new(3, 3, SampleFormat::U8, ChannelLayout::Rgb).unwrap();
        for y in 0..3 {
            img.put(2, y, 1, 255.0); // green column
        }
        let edges = edge_sobel(&img).unwrap();
        // Luminance step of 0.587 * 255, gradient 4x, clamped.
        assert_eq!(edges.get(1, 1, 0), 255.0);
    }
}
