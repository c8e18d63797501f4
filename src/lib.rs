//! pixelkit
//!
//! Format-generic still-image processing: geometric transforms, convolution
//! filters, color math and statistics over one shared pixel buffer type.
//!
//! ## Pixel Buffer
//!
//! [`PixelBuffer`] stores samples in `(height, width, channels)` order in
//! one of three native encodings behind a tagged enum:
//!
//! - `U8`: 8-bit per channel (0-255)
//! - `U16`: 16-bit per channel (0-65535), stored as whole words
//! - `F32`: float per channel (nominal 0.0-1.0, unclamped)
//!
//! A [`ChannelLayout`] records what the channels mean (gray, RGB, RGBA,
//! indexed, YUV) and decides which of them carry color for luminance and
//! HSV math. Every algorithm reads and writes through the canonical sample
//! accessor on the buffer, so each is implemented exactly once and behaves
//! identically across the three encodings.
//!
//! ## Architecture
//!
//! - [`transform`] - resize, crop, flip, rotate, blend, composite
//! - [`filters::convolve`] - 3x3 and N x N convolution, filter presets,
//!   separable Gaussian blur
//! - [`filters::color_adjust`] - brightness, contrast, gamma, invert,
//!   normalize, threshold, channel swap, saturation
//! - [`filters::color_science`] - HSV adjustment, grayscale conversion,
//!   histogram equalization, sepia
//! - [`analyze`] - histogram, mean/stddev, brightness, contrast, entropy,
//!   Sobel edge magnitude
//!
//! Operations mutate the buffer in place or replace its storage wholesale;
//! a returned error always means the buffer is unchanged. Everything is
//! single-threaded and synchronous. Codec, drawing and generator
//! collaborators exchange data through the same buffer type and accessor
//! contract.

pub mod analyze;
pub mod buffer;
pub mod error;
pub mod filters;
pub mod transform;

// Main entry points: the shared entity plus its descriptors.
pub use crate::buffer::{ChannelLayout, PixelBuffer, SampleFormat};
pub use crate::error::{ImageError, Result};
pub use crate::filters::convolve::Kernel3;
pub use crate::transform::ResizeMode;
