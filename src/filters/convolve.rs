//! Kernel convolution and the filters built on it.
//!
//! Two border policies live here on purpose and must not be unified:
//!
//! - [`convolve3x3`] leaves the outermost row and column of pixels at their
//!   original values and only processes the interior.
//! - [`convolve`] (general N x N) processes every pixel and skips kernel
//!   taps that fall outside the image, so border pixels see a partial sum.
//! - [`gaussian_blur`] clamps sample coordinates to the nearest edge pixel
//!   during its two separable passes.
//!
//! Each policy materially changes edge appearance and callers rely on the
//! distinction.

use ndarray::ArrayView2;

use crate::buffer::PixelBuffer;
use crate::error::{ImageError, Result};

/// Immutable 3x3 kernel with the scale and bias applied to the weighted sum
/// before write-back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel3 {
    pub weights: [[f32; 3]; 3],
    pub scale: f32,
    pub bias: f32,
}

impl Kernel3 {
    /// Kernel with scale 1 and bias 0.
    pub fn plain(weights: [[f32; 3]; 3]) -> Kernel3 {
        Kernel3 {
            weights,
            scale: 1.0,
            bias: 0.0,
        }
    }
}

const BLUR_KERNEL: [[f32; 3]; 3] = [[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]];

// ============================================================================
// Core convolution
// ============================================================================

/// Convolve every interior pixel and channel with a 3x3 kernel.
///
/// For each interior pixel the weighted neighborhood sum is scaled, biased
/// and written back with format-appropriate clamping. Border pixels
/// (row/column 0 and max) keep their original values.
///
/// Fails with [`ImageError::TooSmall`] when either dimension is below 3,
/// since no interior pixel exists.
pub fn convolve3x3(image: &mut PixelBuffer, kernel: &Kernel3) -> Result<()> {
    let (w, h, c) = (image.width(), image.height(), image.channels());
    if w < 3 || h < 3 {
        return Err(ImageError::TooSmall {
            width: w,
            height: h,
            required: 3,
        });
    }

    let src = image.clone();
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            for ch in 0..c {
                let mut sum = 0.0f32;
                for ky in 0..3 {
                    for kx in 0..3 {
                        sum += kernel.weights[ky][kx] * src.get(x + kx - 1, y + ky - 1, ch);
                    }
                }
                image.put(x, y, ch, sum * kernel.scale + kernel.bias);
            }
        }
    }
    Ok(())
}

/// Convolve with an arbitrary N x N (or N x M) kernel.
///
/// Unlike [`convolve3x3`] this processes every pixel; taps whose source
/// coordinate falls outside the image contribute nothing to the sum.
pub fn convolve(image: &mut PixelBuffer, kernel: ArrayView2<f32>) -> Result<()> {
    let (kh, kw) = kernel.dim();
    if kw == 0 || kh == 0 {
        return Err(ImageError::InvalidArgument("empty kernel"));
    }

    let (w, h, c) = (image.width(), image.height(), image.channels());
    let kcx = (kw / 2) as isize;
    let kcy = (kh / 2) as isize;

    let src = image.clone();
    for y in 0..h {
        for x in 0..w {
            for ch in 0..c {
                let mut sum = 0.0f32;
                for ky in 0..kh {
                    let sy = y as isize + ky as isize - kcy;
                    if sy < 0 || sy >= h as isize {
                        continue;
                    }
                    for kx in 0..kw {
                        let sx = x as isize + kx as isize - kcx;
                        if sx < 0 || sx >= w as isize {
                            continue;
                        }
                        sum += kernel[[ky, kx]] * src.get(sx as usize, sy as usize, ch);
                    }
                }
                image.put(x, y, ch, sum);
            }
        }
    }
    Ok(())
}

// ============================================================================
// Predefined 3x3 filters
// ============================================================================

/// Gaussian-like 3x3 blur.
///
/// For `radius > 1` the 3x3 kernel is applied `floor(radius)` times in
/// sequence, approximating a larger radius with repeated passes.
pub fn blur(image: &mut PixelBuffer, radius: f32) -> Result<()> {
    let kernel = Kernel3 {
        weights: BLUR_KERNEL,
        scale: 1.0 / 16.0,
        bias: 0.0,
    };
    if radius <= 1.0 {
        return convolve3x3(image, &kernel);
    }
    for _ in 0..radius as usize {
        convolve3x3(image, &kernel)?;
    }
    Ok(())
}

/// Sharpen with the standard 5-center kernel.
pub fn sharpen(image: &mut PixelBuffer) -> Result<()> {
    convolve3x3(
        image,
        &Kernel3::plain([[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]]),
    )
}

/// Edge enhancement with the 8-center Laplacian-style kernel.
pub fn edge(image: &mut PixelBuffer) -> Result<()> {
    convolve3x3(
        image,
        &Kernel3::plain([[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]]),
    )
}

/// Emboss, biased to the format midpoint so flat regions land on mid-gray.
pub fn emboss(image: &mut PixelBuffer) -> Result<()> {
    convolve3x3(
        image,
        &Kernel3 {
            weights: [[-2.0, -1.0, 0.0], [-1.0, 1.0, 1.0], [0.0, 1.0, 2.0]],
            scale: 1.0,
            bias: image.format().midpoint(),
        },
    )
}

// ============================================================================
// Separable Gaussian
// ============================================================================

/// Normalized 1-D Gaussian with half-width `ceil(radius * 3)`.
fn gaussian_kernel_1d(radius: f32) -> Vec<f32> {
    let half = (radius * 3.0).ceil() as usize;
    let sigma2 = 2.0 * radius * radius;
    let mut kernel: Vec<f32> = (0..=2 * half)
        .map(|i| {
            let x = i as f32 - half as f32;
            (-x * x / sigma2).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }
    kernel
}

/// Separable Gaussian blur: a horizontal pass followed by a vertical pass.
///
/// Sample coordinates are clamped to the image edge during both passes, a
/// deliberately different border policy from [`convolve3x3`]'s skip.
/// `radius` must be positive.
pub fn gaussian_blur(image: &mut PixelBuffer, radius: f32) -> Result<()> {
    if radius <= 0.0 {
        return Err(ImageError::InvalidArgument("non-positive blur radius"));
    }
    let kernel = gaussian_kernel_1d(radius);
    let half = kernel.len() / 2;
    let (w, h, c) = (image.width(), image.height(), image.channels());

    let mut pass = image.clone();
    // Horizontal pass: image -> pass.
    for y in 0..h {
        for x in 0..w {
            for ch in 0..c {
                let mut acc = 0.0f32;
                for (i, &kv) in kernel.iter().enumerate() {
                    let sx = (x as isize + i as isize - half as isize).clamp(0, w as isize - 1);
                    acc += kv * image.get(sx as usize, y, ch);
                }
                pass.put(x, y, ch, acc);
            }
        }
    }
    // Vertical pass: pass -> image.
    for y in 0..h {
        for x in 0..w {
            for ch in 0..c {
                let mut acc = 0.0f32;
                for (i, &kv) in kernel.iter().enumerate() {
                    let sy = (y as isize + i as isize - half as isize).clamp(0, h as isize - 1);
                    acc += kv * pass.get(x, sy as usize, ch);
                }
                image.put(x, y, ch, acc);
            }
        }
    }
    Ok(())
}
