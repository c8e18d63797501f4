//! Pixel-wise photometric adjustments: brightness, contrast, gamma, invert,
//! normalize, threshold, channel swap, saturation.
//!
//! These operate per sample without spatial context. All of them go through
//! the canonical accessor, so one implementation covers u8, u16 and float
//! buffers; integer write-back rounds and clamps to the native range, float
//! write-back only clamps where the operation's contract says so (gamma).

use crate::buffer::{PixelBuffer, SampleFormat, LUMA_B, LUMA_G, LUMA_R};
use crate::error::{ImageError, Result};

// ============================================================================
// Brightness / contrast
// ============================================================================

/// Add `offset` (in native units) to every sample.
///
/// Integer formats clamp to their range; float buffers add without clamping.
pub fn brightness(image: &mut PixelBuffer, offset: f32) -> Result<()> {
    let (w, h, c) = (image.width(), image.height(), image.channels());
    for y in 0..h {
        for x in 0..w {
            for ch in 0..c {
                let v = image.get(x, y, ch) + offset;
                image.put(x, y, ch, v);
            }
        }
    }
    Ok(())
}

/// Scale every sample's distance from the format midpoint by `factor`.
pub fn contrast(image: &mut PixelBuffer, factor: f32) -> Result<()> {
    let midpoint = image.format().midpoint();
    let (w, h, c) = (image.width(), image.height(), image.channels());
    for y in 0..h {
        for x in 0..w {
            for ch in 0..c {
                let v = (image.get(x, y, ch) - midpoint) * factor + midpoint;
                image.put(x, y, ch, v);
            }
        }
    }
    Ok(())
}

// ============================================================================
// Gamma
// ============================================================================

/// Apply gamma correction `v -> (v / max) ^ (1 / gamma) * max`.
///
/// The 8-bit path goes through a 256-entry lookup table; 16-bit and float
/// paths evaluate `powf` directly. Float inputs are clamped to 0.0-1.0
/// first, since the power curve is only defined over the nominal range.
/// `gamma` must be positive.
pub fn gamma(image: &mut PixelBuffer, gamma: f32) -> Result<()> {
    if gamma <= 0.0 {
        return Err(ImageError::InvalidArgument("non-positive gamma"));
    }
    let inv = 1.0 / gamma;
    let (w, h, c) = (image.width(), image.height(), image.channels());

    match image.format() {
        SampleFormat::U8 => {
            let mut lut = [0.0f32; 256];
            for (i, entry) in lut.iter_mut().enumerate() {
                *entry = (i as f32 / 255.0).powf(inv) * 255.0;
            }
            for y in 0..h {
                for x in 0..w {
                    for ch in 0..c {
                        let v = lut[image.get(x, y, ch) as usize];
                        image.put(x, y, ch, v);
                    }
                }
            }
        }
        SampleFormat::U16 => {
            for y in 0..h {
                for x in 0..w {
                    for ch in 0..c {
                        let v = (image.get(x, y, ch) / 65535.0).powf(inv) * 65535.0;
                        image.put(x, y, ch, v);
                    }
                }
            }
        }
        SampleFormat::F32 => {
            for y in 0..h {
                for x in 0..w {
                    for ch in 0..c {
                        let v = image.get(x, y, ch).clamp(0.0, 1.0).powf(inv);
                        image.put(x, y, ch, v);
                    }
                }
            }
        }
    }
    Ok(())
}

// ============================================================================
// Invert / normalize / threshold
// ============================================================================

/// Replace every sample with its complement against the format maximum.
pub fn invert(image: &mut PixelBuffer) -> Result<()> {
    let max = image.format().max_value();
    let (w, h, c) = (image.width(), image.height(), image.channels());
    for y in 0..h {
        for x in 0..w {
            for ch in 0..c {
                let v = max - image.get(x, y, ch);
                image.put(x, y, ch, v);
            }
        }
    }
    Ok(())
}

/// Stretch the buffer so its minimum sample maps to 0 and its maximum to the
/// format maximum. A constant buffer is left unchanged.
pub fn normalize(image: &mut PixelBuffer) -> Result<()> {
    let (w, h, c) = (image.width(), image.height(), image.channels());
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for y in 0..h {
        for x in 0..w {
            for ch in 0..c {
                let v = image.get(x, y, ch);
                min = min.min(v);
                max = max.max(v);
            }
        }
    }
    if max <= min {
        return Ok(());
    }

    let scale = image.format().max_value() / (max - min);
    for y in 0..h {
        for x in 0..w {
            for ch in 0..c {
                let v = (image.get(x, y, ch) - min) * scale;
                image.put(x, y, ch, v);
            }
        }
    }
    Ok(())
}

/// Binary threshold for single-channel buffers: samples at or above
/// `threshold` (native units) become the format maximum, the rest zero.
pub fn threshold(image: &mut PixelBuffer, threshold: f32) -> Result<()> {
    if image.channels() != 1 {
        return Err(ImageError::InvalidArgument(
            "threshold requires a single-channel buffer",
        ));
    }
    let max = image.format().max_value();
    let (w, h) = (image.width(), image.height());
    for y in 0..h {
        for x in 0..w {
            let v = if image.get(x, y, 0) >= threshold { max } else { 0.0 };
            image.put(x, y, 0, v);
        }
    }
    Ok(())
}

// ============================================================================
// Channel swap / saturation
// ============================================================================

/// Exchange channels `a` and `b` in every pixel.
pub fn channel_swap(image: &mut PixelBuffer, a: usize, b: usize) -> Result<()> {
    let c = image.channels();
    for index in [a, b] {
        if index >= c {
            return Err(ImageError::ChannelOutOfRange { index, channels: c });
        }
    }
    if a == b {
        return Ok(());
    }
    let (w, h) = (image.width(), image.height());
    for y in 0..h {
        for x in 0..w {
            let va = image.get(x, y, a);
            let vb = image.get(x, y, b);
            image.put(x, y, a, vb);
            image.put(x, y, b, va);
        }
    }
    Ok(())
}

/// Scale each pixel's distance from its own luminance by `factor`
/// (0.0 = fully desaturated, 1.0 = unchanged, above 1.0 = more vivid).
///
/// Needs at least three color channels; buffers with fewer are a no-op.
pub fn saturate(image: &mut PixelBuffer, factor: f32) -> Result<()> {
    if image.channels() < 3 {
        return Ok(());
    }
    let (w, h) = (image.width(), image.height());
    for y in 0..h {
        for x in 0..w {
            let r = image.get(x, y, 0);
            let g = image.get(x, y, 1);
            let b = image.get(x, y, 2);
            let luma = LUMA_R * r + LUMA_G * g + LUMA_B * b;
            image.put(x, y, 0, luma + (r - luma) * factor);
            image.put(x, y, 1, luma + (g - luma) * factor);
            image.put(x, y, 2, luma + (b - luma) * factor);
        }
    }
    Ok(())
}
