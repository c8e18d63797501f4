//! Geometric transforms: resize, crop, flip, rotate, plus the binary
//! blend/composite operations.
//!
//! Every operation here works through the canonical sample accessor and is
//! therefore identical across u8, u16 and float buffers. Operations that
//! change dimensions build the replacement storage completely before
//! swapping it into the buffer, so a failed validation never leaves a
//! half-updated image behind.

use crate::buffer::PixelBuffer;
use crate::error::{ImageError, Result};

/// Interpolation mode for [`resize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Round each destination coordinate to the nearest source pixel.
    Nearest,
    /// Interpolate between the four surrounding source pixels.
    Bilinear,
}

// ============================================================================
// Resize
// ============================================================================

/// Resize the image to `new_width` x `new_height`.
///
/// Nearest mode maps destination `(x, y)` to the nearest source pixel of
/// `x * srcW / dstW` (so upscale-then-crop round-trips exactly for integer
/// formats). Bilinear maps with `x * (srcW-1) / (dstW-1)` and interpolates
/// per channel; a destination dimension of 1 samples coordinate 0. Results
/// round to nearest for integer formats and stay float for float buffers.
///
/// # Arguments
/// * `new_width`, `new_height` - Target dimensions, both must be nonzero
/// * `mode` - Interpolation mode
pub fn resize(
    image: &mut PixelBuffer,
    new_width: usize,
    new_height: usize,
    mode: ResizeMode,
) -> Result<()> {
    if new_width == 0 || new_height == 0 {
        return Err(ImageError::InvalidArgument("zero resize dimension"));
    }

    let (w, h, c) = (image.width(), image.height(), image.channels());
    let mut out = PixelBuffer {
        layout: image.layout(),
        store: image.zeroed_like(new_width, new_height, c),
    };

    match mode {
        ResizeMode::Nearest => {
            for y in 0..new_height {
                let fy = y as f32 * h as f32 / new_height as f32;
                let sy = ((fy + 0.5).floor() as usize).min(h - 1);
                for x in 0..new_width {
                    let fx = x as f32 * w as f32 / new_width as f32;
                    let sx = ((fx + 0.5).floor() as usize).min(w - 1);
                    for ch in 0..c {
                        out.put(x, y, ch, image.get(sx, sy, ch));
                    }
                }
            }
        }
        ResizeMode::Bilinear => {
            for y in 0..new_height {
                // Degenerate 1-pixel destination dimension samples row/col 0.
                let fy = if new_height > 1 {
                    y as f32 * (h - 1) as f32 / (new_height - 1) as f32
                } else {
                    0.0
                };
                let y0 = fy.floor() as usize;
                let y1 = (y0 + 1).min(h - 1);
                let ty = fy - y0 as f32;
                for x in 0..new_width {
                    let fx = if new_width > 1 {
                        x as f32 * (w - 1) as f32 / (new_width - 1) as f32
                    } else {
                        0.0
                    };
                    let x0 = fx.floor() as usize;
                    let x1 = (x0 + 1).min(w - 1);
                    let tx = fx - x0 as f32;
                    for ch in 0..c {
                        let v00 = image.get(x0, y0, ch);
                        let v10 = image.get(x1, y0, ch);
                        let v01 = image.get(x0, y1, ch);
                        let v11 = image.get(x1, y1, ch);
                        let top = v00 * (1.0 - tx) + v10 * tx;
                        let bottom = v01 * (1.0 - tx) + v11 * tx;
                        out.put(x, y, ch, top * (1.0 - ty) + bottom * ty);
                    }
                }
            }
        }
    }

    *image = out;
    Ok(())
}

// ============================================================================
// Crop
// ============================================================================

/// Extract the sub-rectangle at `(x, y)` sized `width` x `height`.
///
/// The rectangle must lie entirely inside the source; a partially
/// out-of-bounds rectangle is rejected rather than clamped.
pub fn crop(image: &mut PixelBuffer, x: usize, y: usize, width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidArgument("zero crop dimension"));
    }
    let (w, h, c) = (image.width(), image.height(), image.channels());
    if x + width > w || y + height > h {
        return Err(ImageError::OutOfBounds {
            x,
            y,
            width,
            height,
            bound_width: w,
            bound_height: h,
        });
    }

    let mut out = PixelBuffer {
        layout: image.layout(),
        store: image.zeroed_like(width, height, c),
    };
    for row in 0..height {
        for col in 0..width {
            for ch in 0..c {
                out.put(col, row, ch, image.get(x + col, y + row, ch));
            }
        }
    }

    *image = out;
    Ok(())
}

// ============================================================================
// Flip
// ============================================================================

/// Mirror the image horizontally and/or vertically, in place.
///
/// Both flags false is a successful no-op.
pub fn flip(image: &mut PixelBuffer, horizontal: bool, vertical: bool) -> Result<()> {
    if !horizontal && !vertical {
        return Ok(());
    }
    let (w, h, c) = (image.width(), image.height(), image.channels());
    let src = image.clone();
    for y in 0..h {
        let sy = if vertical { h - 1 - y } else { y };
        for x in 0..w {
            let sx = if horizontal { w - 1 - x } else { x };
            for ch in 0..c {
                image.put(x, y, ch, src.get(sx, sy, ch));
            }
        }
    }
    Ok(())
}

// ============================================================================
// Rotate
// ============================================================================

/// Rotate by an arbitrary angle, clockwise in screen coordinates (y-down).
///
/// Resamples with nearest-neighbor into a bounding box expanded to hold the
/// full rotated content; destination pixels not covered by the source stay
/// zero. Width and height are updated together with the storage swap.
pub fn rotate(image: &mut PixelBuffer, degrees: f32) -> Result<()> {
    let (w, h, c) = (image.width(), image.height(), image.channels());

    // In y-down screen coordinates the standard rotation matrix with a
    // positive angle already turns clockwise, so no sign flip.
    let rad = degrees.to_radians();
    let (sin, cos) = rad.sin_cos();

    // Rotate the source corners about the center to size the bounding box.
    let cx = (w - 1) as f32 * 0.5;
    let cy = (h - 1) as f32 * 0.5;
    let corners = [(-cx, -cy), (cx, -cy), (-cx, cy), (cx, cy)];
    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    let mut min_y = f32::MAX;
    let mut max_y = f32::MIN;
    for (x, y) in corners {
        let rx = x * cos - y * sin;
        let ry = x * sin + y * cos;
        min_x = min_x.min(rx);
        max_x = max_x.max(rx);
        min_y = min_y.min(ry);
        max_y = max_y.max(ry);
    }
    let new_w = (max_x - min_x + 1.0).ceil() as usize;
    let new_h = (max_y - min_y + 1.0).ceil() as usize;

    let mut out = PixelBuffer {
        layout: image.layout(),
        store: image.zeroed_like(new_w, new_h, c),
    };

    let ncx = (new_w - 1) as f32 * 0.5;
    let ncy = (new_h - 1) as f32 * 0.5;
    for y in 0..new_h {
        for x in 0..new_w {
            let tx = x as f32 - ncx;
            let ty = y as f32 - ncy;
            // Inverse-rotate the destination coordinate into source space.
            let sxf = tx * cos + ty * sin + cx;
            let syf = -tx * sin + ty * cos + cy;
            let sx = (sxf + 0.5).floor() as isize;
            let sy = (syf + 0.5).floor() as isize;
            if sx >= 0 && sx < w as isize && sy >= 0 && sy < h as isize {
                for ch in 0..c {
                    out.put(x, y, ch, image.get(sx as usize, sy as usize, ch));
                }
            }
        }
    }

    *image = out;
    Ok(())
}

// ============================================================================
// Blend / composite
// ============================================================================

/// Blend `src` into `dst` with the given ratio (0.0 = only dst, 1.0 = only
/// src). Both operands must match in dimensions, channel count and format.
pub fn blend(dst: &mut PixelBuffer, src: &PixelBuffer, ratio: f32) -> Result<()> {
    dst.check_compatible(src)?;
    let ratio = ratio.clamp(0.0, 1.0);
    let (w, h, c) = (dst.width(), dst.height(), dst.channels());
    for y in 0..h {
        for x in 0..w {
            for ch in 0..c {
                let d = dst.get(x, y, ch);
                let s = src.get(x, y, ch);
                dst.put(x, y, ch, (1.0 - ratio) * d + ratio * s);
            }
        }
    }
    Ok(())
}

/// Composite `overlay` onto `dst` with its top-left corner at `(x, y)`.
///
/// The overlay is clipped to the destination bounds, so it may extend past
/// the right or bottom edge. `alpha` weights the whole overlay; when the
/// overlay carries an alpha channel, its per-pixel alpha multiplies in and
/// the destination alpha channel is left untouched.
pub fn composite(
    dst: &mut PixelBuffer,
    overlay: &PixelBuffer,
    x: usize,
    y: usize,
    alpha: f32,
) -> Result<()> {
    if dst.channels() != overlay.channels() {
        return Err(ImageError::DimensionMismatch);
    }
    if dst.format() != overlay.format() {
        return Err(ImageError::FormatMismatch);
    }
    if x >= dst.width() || y >= dst.height() {
        return Err(ImageError::OutOfBounds {
            x,
            y,
            width: overlay.width(),
            height: overlay.height(),
            bound_width: dst.width(),
            bound_height: dst.height(),
        });
    }

    let alpha = alpha.clamp(0.0, 1.0);
    let max = overlay.format().max_value();
    let color = overlay.color_channels();
    let visible_w = overlay.width().min(dst.width() - x);
    let visible_h = overlay.height().min(dst.height() - y);

    for oy in 0..visible_h {
        for ox in 0..visible_w {
            let a = if overlay.channels() > color {
                alpha * overlay.get(ox, oy, color) / max
            } else {
                alpha
            };
            for ch in 0..color {
                let d = dst.get(x + ox, y + oy, ch);
                let s = overlay.get(ox, oy, ch);
                dst.put(x + ox, y + oy, ch, (1.0 - a) * d + a * s);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ChannelLayout, SampleFormat};

    fn gray_u8(values: &[&[u8]]) -> PixelBuffer {
        let h = values.len();
        let w = values[0].len();
        let mut buf = PixelBuffer::new(w, h, SampleFormat::U8, ChannelLayout::Gray).unwrap();
        for (y, row) in values.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                buf.put(x, y, 0, v as f32);
            }
        }
        buf
    }

    #[test]
    fn test_resize_nearest_upscale() {
        let mut img = gray_u8(&[&[10, 20], &[30, 40]]);
        resize(&mut img, 4, 4, ResizeMode::Nearest).unwrap();
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 4);
        assert_eq!(img.get(0, 0, 0), 10.0);
        assert_eq!(img.get(3, 3, 0), 40.0);
    }

    #[test]
    fn test_resize_rejects_zero_dimension() {
        let mut img = gray_u8(&[&[1, 2], &[3, 4]]);
        assert!(resize(&mut img, 0, 4, ResizeMode::Nearest).is_err());
        assert_eq!(img.width(), 2); // untouched on failure
    }

    #[test]
    fn test_resize_bilinear_midpoint() {
        let mut img = gray_u8(&[&[0, 100]]);
        resize(&mut img, 3, 1, ResizeMode::Bilinear).unwrap();
        assert_eq!(img.get(0, 0, 0), 0.0);
        assert_eq!(img.get(1, 0, 0), 50.0);
        assert_eq!(img.get(2, 0, 0), 100.0);
    }

    #[test]
    fn test_resize_bilinear_to_single_column() {
        let mut img = gray_u8(&[&[10, 200], &[10, 200]]);
        resize(&mut img, 1, 2, ResizeMode::Bilinear).unwrap();
        assert_eq!(img.get(0, 0, 0), 10.0);
    }

    #[test]
    fn test_resize_bilinear_float_keeps_fraction() {
        let mut img = PixelBuffer::new(2, 1, SampleFormat::F32, ChannelLayout::Gray).unwrap();
        img.put(1, 0, 0, 1.0);
        resize(&mut img, 3, 1, ResizeMode::Bilinear).unwrap();
        assert!((img.get(1, 0, 0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_crop_extracts_rectangle() {
        let mut img = gray_u8(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]);
        crop(&mut img, 1, 1, 2, 2).unwrap();
        assert_eq!(img.width(), 2);
        assert_eq!(img.get(0, 0, 0), 5.0);
        assert_eq!(img.get(1, 1, 0), 9.0);
    }

    #[test]
    fn test_crop_rejects_partial_overlap() {
        let mut img = gray_u8(&[&[1, 2], &[3, 4]]);
        let err = crop(&mut img, 1, 0, 2, 1).unwrap_err();
        assert!(matches!(err, ImageError::OutOfBounds { .. }));
        assert_eq!(img.width(), 2);
    }

    #[test]
    fn test_flip_horizontal_and_vertical() {
        let mut img = gray_u8(&[&[1, 2], &[3, 4]]);
        flip(&mut img, true, false).unwrap();
        assert_eq!(img.get(0, 0, 0), 2.0);
        flip(&mut img, false, true).unwrap();
        assert_eq!(img.get(0, 0, 0), 4.0);
        // Both flags false leaves pixels alone.
        flip(&mut img, false, false).unwrap();
        assert_eq!(img.get(0, 0, 0), 4.0);
    }

    #[test]
    fn test_rotate_90_swaps_dimensions() {
        let mut img = gray_u8(&[&[1, 2, 3], &[4, 5, 6]]);
        rotate(&mut img, 90.0).unwrap();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 3);
        // Clockwise: the old left column becomes the top row.
        assert_eq!(img.get(0, 0, 0), 4.0);
        assert_eq!(img.get(1, 0, 0), 1.0);
    }

    #[test]
    fn test_rotate_45_zero_fills_corners() {
        let mut img = gray_u8(&[&[200, 200], &[200, 200]]);
        rotate(&mut img, 45.0).unwrap();
        assert!(img.width() > 2);
        // Bounding-box corners are outside the rotated content.
        assert_eq!(img.get(0, 0, 0), 0.0);
    }

    #[test]
    fn test_blend_weighted_average() {
        let mut a = gray_u8(&[&[100]]);
        let b = gray_u8(&[&[200]]);
        blend(&mut a, &b, 0.25).unwrap();
        assert_eq!(a.get(0, 0, 0), 125.0);
    }

    #[test]
    fn test_blend_rejects_mismatched_operands() {
        let mut a = gray_u8(&[&[100]]);
        let b = gray_u8(&[&[1, 2]]);
        assert_eq!(blend(&mut a, &b, 0.5).unwrap_err(), ImageError::DimensionMismatch);

        let f = PixelBuffer::new(1, 1, SampleFormat::F32, ChannelLayout::Gray).unwrap();
        assert_eq!(blend(&mut a, &f, 0.5).unwrap_err(), ImageError::FormatMismatch);
    }

    #[test]
    fn test_composite_clips_overlay() {
        let mut dst = gray_u8(&[&[0, 0], &[0, 0]]);
        let overlay = gray_u8(&[&[100, 100], &[100, 100]]);
        composite(&mut dst, &overlay, 1, 1, 1.0).unwrap();
        assert_eq!(dst.get(0, 0, 0), 0.0);
        assert_eq!(dst.get(1, 1, 0), 100.0);
    }

    #[test]
    fn test_composite_uses_overlay_alpha() {
        let mut dst = PixelBuffer::new(1, 1, SampleFormat::U8, ChannelLayout::Rgba).unwrap();
        let mut overlay = PixelBuffer::new(1, 1, SampleFormat::U8, ChannelLayout::Rgba).unwrap();
        overlay.put(0, 0, 0, 200.0);
        overlay.put(0, 0, 3, 128.0);
        composite(&mut dst, &overlay, 0, 0, 1.0).unwrap();
        let expected = 200.0 * 128.0 / 255.0;
        assert!((dst.get(0, 0, 0) - expected).abs() <= 1.0);
    }
}
