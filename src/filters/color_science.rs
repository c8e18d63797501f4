//! Color science filters: HSV adjustment, grayscale conversion, histogram
//! equalization, sepia.
//!
//! These require either a color space conversion (RGB <-> HSV) or a global
//! pass over the image (equalization). Color math runs on the first three
//! channels normalized to 0.0-1.0; the write-back rescales to the buffer's
//! native range.

use crate::buffer::{ChannelLayout, PixelBuffer, LUMA_B, LUMA_G, LUMA_R};
use crate::error::{ImageError, Result};

// ============================================================================
// Color space conversion utilities
// ============================================================================

/// Convert RGB to HSV.
/// Input: r, g, b in 0.0-1.0
/// Output: (h, s, v) where h is 0.0-360.0, s and v are 0.0-1.0
#[inline]
fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max == 0.0 { 0.0 } else { delta / max };

    let mut h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    if h < 0.0 {
        h += 360.0;
    }

    (h, s, v)
}

/// Convert HSV to RGB.
/// Input: h in 0.0-360.0, s and v in 0.0-1.0
/// Output: (r, g, b) in 0.0-1.0
#[inline]
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r1, g1, b1) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r1 + m, g1 + m, b1 + m)
}

// ============================================================================
// HSV adjustment
// ============================================================================

/// Shift hue, scale saturation and value.
///
/// Each pixel's first three channels are converted to HSV, the hue shift is
/// added and wrapped into 0-360, saturation and value are multiplied and
/// clamped to 0.0-1.0, and the result is converted back. Requires at least
/// three channels.
///
/// # Arguments
/// * `hue_shift` - Degrees added to the hue (any sign, wraps)
/// * `sat_mult` - Saturation multiplier
/// * `val_mult` - Value multiplier
pub fn hsv_adjust(
    image: &mut PixelBuffer,
    hue_shift: f32,
    sat_mult: f32,
    val_mult: f32,
) -> Result<()> {
    if image.channels() < 3 {
        return Err(ImageError::InvalidArgument(
            "hsv adjustment requires at least three channels",
        ));
    }
    let max = image.format().max_value();
    let (w, h) = (image.width(), image.height());

    for y in 0..h {
        for x in 0..w {
            let r = image.get(x, y, 0) / max;
            let g = image.get(x, y, 1) / max;
            let b = image.get(x, y, 2) / max;

            let (mut hue, mut s, mut v) = rgb_to_hsv(r, g, b);
            hue = (hue + hue_shift) % 360.0;
            if hue < 0.0 {
                hue += 360.0;
            }
            s = (s * sat_mult).clamp(0.0, 1.0);
            v = (v * val_mult).clamp(0.0, 1.0);

            let (r, g, b) = hsv_to_rgb(hue, s, v);
            image.put(x, y, 0, (r * max).clamp(0.0, max));
            image.put(x, y, 1, (g * max).clamp(0.0, max));
            image.put(x, y, 2, (b * max).clamp(0.0, max));
        }
    }
    Ok(())
}

// ============================================================================
// Grayscale conversion
// ============================================================================

/// Collapse the buffer to a single luminance channel of the same bit depth.
///
/// RGB-like layouts combine the first three channels with BT.601 weights;
/// YUV takes its luma channel. Buffers that are already single-channel are
/// a successful no-op. The storage is replaced wholesale and the layout
/// becomes gray.
pub fn grayscale(image: &mut PixelBuffer) -> Result<()> {
    if image.channels() < 3 {
        return Ok(());
    }
    let (w, h) = (image.width(), image.height());
    let mut out = PixelBuffer {
        layout: ChannelLayout::Gray,
        store: image.zeroed_like(w, h, 1),
    };
    for y in 0..h {
        for x in 0..w {
            out.put(x, y, 0, image.luminance(x, y));
        }
    }
    *image = out;
    Ok(())
}

// ============================================================================
// Histogram equalization
// ============================================================================

/// Cumulative distribution over 256 bins, plus the CDF value at the first
/// occupied bin.
fn cdf_256(hist: &[u32; 256]) -> ([u64; 256], u64) {
    let mut cdf = [0u64; 256];
    let mut running = 0u64;
    for (bin, &count) in hist.iter().enumerate() {
        running += count as u64;
        cdf[bin] = running;
    }
    let cdf_min = hist
        .iter()
        .position(|&c| c > 0)
        .map(|bin| cdf[bin])
        .unwrap_or(0);
    (cdf, cdf_min)
}

/// Spread the intensity distribution across the full native range.
///
/// Single-channel buffers are remapped directly through the luminance CDF.
/// Color buffers equalize the derived luminance and apply the resulting
/// per-pixel ratio to each color channel, which preserves hue. 16-bit and
/// float buffers share the 256-bin histogram policy of the analysis engine.
pub fn equalize(image: &mut PixelBuffer) -> Result<()> {
    let format = image.format();
    let max = format.max_value();
    let (w, h) = (image.width(), image.height());
    let npixels = (w * h) as u64;

    let mut hist = [0u32; 256];
    for y in 0..h {
        for x in 0..w {
            hist[format.bin_index(image.luminance(x, y))] += 1;
        }
    }
    let (cdf, cdf_min) = cdf_256(&hist);
    if npixels == cdf_min {
        // Constant image: nothing to spread.
        return Ok(());
    }
    let denom = (npixels - cdf_min) as f64;
    let remap =
        |bin: usize| -> f32 { ((cdf[bin] - cdf_min) as f64 / denom * max as f64) as f32 };

    if image.channels() == 1 {
        for y in 0..h {
            for x in 0..w {
                let v = remap(format.bin_index(image.get(x, y, 0)));
                image.put(x, y, 0, v);
            }
        }
        return Ok(());
    }

    let color = image.color_channels().min(3);
    for y in 0..h {
        for x in 0..w {
            let luma = image.luminance(x, y);
            let equalized = remap(format.bin_index(luma));
            if luma == 0.0 {
                for ch in 0..color {
                    image.put(x, y, ch, equalized);
                }
            } else {
                // Uniform scale keeps the channel ratios, and with them the hue.
                let ratio = equalized / luma;
                for ch in 0..color {
                    let v = image.get(x, y, ch) * ratio;
                    image.put(x, y, ch, v.min(max));
                }
            }
        }
    }
    Ok(())
}

// ============================================================================
// Sepia
// ============================================================================

/// Classic sepia tone over the first three channels.
///
/// Buffers with fewer than three channels are a no-op.
pub fn sepia(image: &mut PixelBuffer) -> Result<()> {
    if image.channels() < 3 {
        return Ok(());
    }
    let (w, h) = (image.width(), image.height());
    for y in 0..h {
        for x in 0..w {
            let r = image.get(x, y, 0);
            let g = image.get(x, y, 1);
            let b = image.get(x, y, 2);
            image.put(x, y, 0, 0.393 * r + 0.769 * g + 0.189 * b);
            image.put(x, y, 1, 0.349 * r + 0.686 * g + 0.168 * b);
            image.put(x, y, 2, 0.272 * r + 0.534 * g + 0.131 * b);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ChannelLayout, SampleFormat};

    fn rgb_u8(r: u8, g: u8, b: u8) -> PixelBuffer {
        let mut buf = PixelBuffer::new(1, 1, SampleFormat::U8, ChannelLayout::Rgb).unwrap();
        buf.put(0, 0, 0, r as f32);
        buf.put(0, 0, 1, g as f32);
        buf.put(0, 0, 2, b as f32);
        buf
    }

    #[test]
    fn test_hsv_round_trip_preserves_color() {
        let (h, s, v) = rgb_to_hsv(0.8, 0.3, 0.1);
        let (r, g, b) = hsv_to_rgb(h, s, v);
        assert!((r - 0.8).abs() < 1e-5);
        assert!((g - 0.3).abs() < 1e-5);
        assert!((b - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_hsv_adjust_rotates_red_to_green() {
        let mut img = rgb_u8(255, 0, 0);
        hsv_adjust(&mut img, 120.0, 1.0, 1.0).unwrap();
        assert!(img.get(0, 0, 0) <= 1.0);
        assert_eq!(img.get(0, 0, 1), 255.0);
        assert!(img.get(0, 0, 2) <= 1.0);
    }

    #[test]
    fn test_hsv_adjust_negative_shift_wraps() {
        let mut img = rgb_u8(255, 0, 0);
        hsv_adjust(&mut img, -240.0, 1.0, 1.0).unwrap();
        // -240 wraps to +120: red becomes green.
        assert_eq!(img.get(0, 0, 1), 255.0);
    }

    #[test]
    fn test_hsv_adjust_desaturation_grays_out() {
        let mut img = rgb_u8(200, 40, 90);
        hsv_adjust(&mut img, 0.0, 0.0, 1.0).unwrap();
        assert_eq!(img.get(0, 0, 0), img.get(0, 0, 1));
        assert_eq!(img.get(0, 0, 1), img.get(0, 0, 2));
    }

    #[test]
    fn test_hsv_adjust_requires_color_channels() {
        let mut img = PixelBuffer::new(1, 1, SampleFormat::U8, ChannelLayout::Gray).unwrap();
        assert!(hsv_adjust(&mut img, 10.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_grayscale_replaces_with_single_channel() {
        let mut img = rgb_u8(255, 0, 0);
        grayscale(&mut img).unwrap();
        assert_eq!(img.channels(), 1);
        assert_eq!(img.layout(), ChannelLayout::Gray);
        assert_eq!(img.format(), SampleFormat::U8);
        // 0.299 * 255 = 76.245 -> 76
        assert_eq!(img.get(0, 0, 0), 76.0);
    }

    #[test]
    fn test_grayscale_float_keeps_depth() {
        let mut img = PixelBuffer::new(1, 1, SampleFormat::F32, ChannelLayout::Rgb).unwrap();
        img.put(0, 0, 0, 1.0);
        grayscale(&mut img).unwrap();
        assert_eq!(img.format(), SampleFormat::F32);
        assert!((img.get(0, 0, 0) - 0.299).abs() < 1e-5);
    }

    #[test]
    fn test_grayscale_noop_when_already_gray() {
        let mut img = PixelBuffer::new(2, 2, SampleFormat::U8, ChannelLayout::Gray).unwrap();
        img.put(0, 0, 0, 42.0);
        grayscale(&mut img).unwrap();
        assert_eq!(img.channels(), 1);
        assert_eq!(img.get(0, 0, 0), 42.0);
    }

    #[test]
    fn test_equalize_two_level_gray() {
        let mut img = PixelBuffer::new(2, 1, SampleFormat::U8, ChannelLayout::Gray).unwrap();
        img.put(0, 0, 0, 100.0);
        img.put(1, 0, 0, 200.0);
        equalize(&mut img).unwrap();
        // cdf(100)=1=cdf_min -> 0, cdf(200)=2 -> full range.
        assert_eq!(img.get(0, 0, 0), 0.0);
        assert_eq!(img.get(1, 0, 0), 255.0);
    }

    #[test]
    fn test_equalize_constant_image_unchanged() {
        let mut img = PixelBuffer::new(2, 2, SampleFormat::U8, ChannelLayout::Gray).unwrap();
        for y in 0..2 {
            for x in 0..2 {
                img.put(x, y, 0, 42.0);
            }
        }
        equalize(&mut img).unwrap();
        assert_eq!(img.get(1, 1, 0), 42.0);
    }

    #[test]
    fn test_equalize_color_preserves_channel_ratios() {
        let mut img = PixelBuffer::new(3, 1, SampleFormat::U8, ChannelLayout::Rgb).unwrap();
        for (x, rgb) in [[10u8, 10, 10], [40, 60, 80], [200, 220, 240]]
            .iter()
            .enumerate()
        {
            for (ch, &v) in rgb.iter().enumerate() {
                img.put(x, 0, ch, v as f32);
            }
        }
        equalize(&mut img).unwrap();
        // Middle pixel: luminance 56.3 remaps to 127.5, ratio 2.2646.
        assert_eq!(img.get(1, 0, 0), 91.0);
        assert_eq!(img.get(1, 0, 1), 136.0);
        assert_eq!(img.get(1, 0, 2), 181.0);
        // Uniform scaling keeps the channel ordering (hue) intact.
        assert!(img.get(1, 0, 0) < img.get(1, 0, 1));
        assert!(img.get(1, 0, 1) < img.get(1, 0, 2));
    }

    #[test]
    fn test_sepia_tones_towards_brown() {
        let mut img = rgb_u8(100, 100, 100);
        sepia(&mut img).unwrap();
        // Flat gray input: channel weights sum to 1.351 / 1.203 / 0.937.
        assert_eq!(img.get(0, 0, 0), 135.0);
        assert_eq!(img.get(0, 0, 1), 120.0);
        assert_eq!(img.get(0, 0, 2), 94.0);
    }
}
