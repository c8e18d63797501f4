//! Filter modules: convolution kernels and photometric/color operations.
//!
//! ## Supported Formats
//!
//! Every filter accepts any [`crate::buffer::PixelBuffer`], so each is
//! written once against the canonical sample domain:
//!
//! | Format | Native range | Write-back |
//! |--------|--------------|------------|
//! | U8 | 0-255 | round + clamp |
//! | U16 | 0-65535 | round + clamp |
//! | F32 | 0.0-1.0 nominal | raw (clamped only where documented) |
//!
//! ## Filter Categories
//!
//! - **Convolution** ([`convolve`]): generic 3x3 and N x N kernels plus the
//!   blur/sharpen/edge/emboss presets and the separable Gaussian. Carries
//!   two intentionally different border policies, see the module docs.
//! - **Pixel-wise** ([`color_adjust`]): brightness, contrast, gamma,
//!   invert, normalize, threshold, channel swap, saturation.
//! - **Color science** ([`color_science`]): HSV adjustment, grayscale
//!   conversion, histogram equalization, sepia.

pub mod color_adjust;
pub mod color_science;
pub mod convolve;
