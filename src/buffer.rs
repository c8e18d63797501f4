//! Pixel buffer: format-tagged storage plus the sample accessor.
//!
//! The buffer stores samples in one of three native encodings (`u8`, `u16`,
//! `f32`) behind a tagged enum, so algorithms never reinterpret raw memory.
//! All algorithms read and write through [`PixelBuffer::get`] and
//! [`PixelBuffer::put`], which convert between native storage and the
//! canonical `f32` domain; only the accessor contains per-format branches.
//!
//! ## Canonical domain
//!
//! - `U8` / `U16`: the raw integer value (0-255 / 0-65535) as `f32`
//! - `F32`: the raw float, nominal range 0.0-1.0
//!
//! Normalized quantities (brightness, entropy probabilities, ...) divide by
//! [`SampleFormat::max_value`] at the point of use.

use ndarray::Array3;

use crate::error::{ImageError, Result};

// ============================================================================
// Format and layout descriptors
// ============================================================================

/// Native sample encoding of a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// 8-bit unsigned integer samples, range 0-255.
    U8,
    /// 16-bit unsigned integer samples, range 0-65535. Stored as whole
    /// 16-bit words, never as independent bytes.
    U16,
    /// 32-bit float samples, nominal range 0.0-1.0. Unclamped on write
    /// unless an operation explicitly clamps.
    F32,
}

impl SampleFormat {
    /// Largest representable value (255 / 65535) or nominal top of range (1.0).
    #[inline]
    pub fn max_value(self) -> f32 {
        match self {
            SampleFormat::U8 => 255.0,
            SampleFormat::U16 => 65535.0,
            SampleFormat::F32 => 1.0,
        }
    }

    /// Midpoint used by contrast and emboss (128 / 32768 / 0.5).
    #[inline]
    pub fn midpoint(self) -> f32 {
        match self {
            SampleFormat::U8 => 128.0,
            SampleFormat::U16 => 32768.0,
            SampleFormat::F32 => 0.5,
        }
    }

    /// Storage size of one sample in bytes.
    #[inline]
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::U8 => 1,
            SampleFormat::U16 => 2,
            SampleFormat::F32 => 4,
        }
    }

    /// Map a canonical sample value to one of 256 histogram bins.
    ///
    /// 16-bit sources keep only the top 8 bits and float sources are clamped
    /// to 0.0-1.0 and scaled, so statistics stay comparable with 8-bit
    /// analysis regardless of source depth.
    #[inline]
    pub fn bin_index(self, v: f32) -> usize {
        match self {
            SampleFormat::U8 => (v as usize).min(255),
            SampleFormat::U16 => (v as usize >> 8).min(255),
            SampleFormat::F32 => (v.clamp(0.0, 1.0) * 255.0).round() as usize,
        }
    }
}

/// Semantic interpretation of a buffer's channels.
///
/// The layout decides which channels carry color for luminance and HSV math:
/// `Rgb` / `Rgba` combine the first three channels with BT.601 weights,
/// while `Gray`, `Indexed` and `Yuv` read channel 0 directly (for YUV the
/// first channel already is luma).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Gray,
    Rgb,
    Rgba,
    Indexed,
    Yuv,
}

impl ChannelLayout {
    /// Number of channels implied by the layout.
    #[inline]
    pub fn channel_count(self) -> usize {
        match self {
            ChannelLayout::Gray | ChannelLayout::Indexed => 1,
            ChannelLayout::Rgb | ChannelLayout::Yuv => 3,
            ChannelLayout::Rgba => 4,
        }
    }
}

/// BT.601 luminance weights.
pub const LUMA_R: f32 = 0.299;
pub const LUMA_G: f32 = 0.587;
pub const LUMA_B: f32 = 0.114;

// ============================================================================
// Storage
// ============================================================================

/// Format-tagged backing storage in `(height, width, channels)` order.
#[derive(Debug, Clone)]
pub enum SampleStore {
    U8(Array3<u8>),
    U16(Array3<u16>),
    F32(Array3<f32>),
}

impl SampleStore {
    fn zeroed(format: SampleFormat, height: usize, width: usize, channels: usize) -> SampleStore {
        match format {
            SampleFormat::U8 => SampleStore::U8(Array3::zeros((height, width, channels))),
            SampleFormat::U16 => SampleStore::U16(Array3::zeros((height, width, channels))),
            SampleFormat::F32 => SampleStore::F32(Array3::zeros((height, width, channels))),
        }
    }

    fn dim(&self) -> (usize, usize, usize) {
        match self {
            SampleStore::U8(a) => a.dim(),
            SampleStore::U16(a) => a.dim(),
            SampleStore::F32(a) => a.dim(),
        }
    }
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// The shared entity every engine in this crate operates on.
///
/// Width, height and channel count derive from the storage dimensions, so
/// storage size and metadata can never disagree. Operations that change
/// dimensions build a complete replacement store and swap it in with a
/// single assignment; the old storage is dropped through normal ownership.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pub(crate) layout: ChannelLayout,
    pub(crate) store: SampleStore,
}

impl PixelBuffer {
    /// Create a zero-filled buffer with the layout's channel count.
    ///
    /// # Arguments
    /// * `width`, `height` - Dimensions in pixels, both must be nonzero
    /// * `format` - Native sample encoding
    /// * `layout` - Channel interpretation (decides the channel count)
    pub fn new(
        width: usize,
        height: usize,
        format: SampleFormat,
        layout: ChannelLayout,
    ) -> Result<PixelBuffer> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidArgument("zero width or height"));
        }
        Ok(PixelBuffer {
            layout,
            store: SampleStore::zeroed(format, height, width, layout.channel_count()),
        })
    }

    /// Create a zero-filled buffer with an explicit channel count, for
    /// custom multi-channel data.
    ///
    /// The layout is inferred from the count (1 = gray, 4 = RGBA, otherwise
    /// RGB semantics for the first three channels).
    pub fn with_channels(
        width: usize,
        height: usize,
        format: SampleFormat,
        channels: usize,
    ) -> Result<PixelBuffer> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidArgument("zero width or height"));
        }
        if channels == 0 {
            return Err(ImageError::InvalidArgument("zero channel count"));
        }
        let layout = match channels {
            1 => ChannelLayout::Gray,
            4 => ChannelLayout::Rgba,
            _ => ChannelLayout::Rgb,
        };
        Ok(PixelBuffer {
            layout,
            store: SampleStore::zeroed(format, height, width, channels),
        })
    }

    /// Zero-filled buffer sharing this buffer's format, used by operations
    /// that replace storage wholesale.
    pub(crate) fn zeroed_like(&self, width: usize, height: usize, channels: usize) -> SampleStore {
        SampleStore::zeroed(self.format(), height, width, channels)
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.store.dim().1
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.store.dim().0
    }

    /// Number of channels per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.store.dim().2
    }

    /// Native sample encoding.
    #[inline]
    pub fn format(&self) -> SampleFormat {
        match self.store {
            SampleStore::U8(_) => SampleFormat::U8,
            SampleStore::U16(_) => SampleFormat::U16,
            SampleStore::F32(_) => SampleFormat::F32,
        }
    }

    /// Channel interpretation.
    #[inline]
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Total backing storage size in bytes.
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.width() * self.height() * self.channels() * self.format().bytes_per_sample()
    }

    /// Read the sample at `(x, y, channel)` in the canonical domain.
    ///
    /// Bounds are the caller's responsibility; the accessor itself does not
    /// range-check (internal contract shared by every engine in this crate,
    /// and by drawing collaborators at the boundary).
    #[inline]
    pub fn get(&self, x: usize, y: usize, channel: usize) -> f32 {
        match &self.store {
            SampleStore::U8(a) => a[[y, x, channel]] as f32,
            SampleStore::U16(a) => a[[y, x, channel]] as f32,
            SampleStore::F32(a) => a[[y, x, channel]],
        }
    }

    /// Write a canonical value back to `(x, y, channel)`.
    ///
    /// Integer formats round to nearest and clamp to the native range.
    /// Float samples are stored as-is; operations with an explicit clamping
    /// contract (gamma, HSV) clamp before calling this.
    #[inline]
    pub fn put(&mut self, x: usize, y: usize, channel: usize, v: f32) {
        match &mut self.store {
            SampleStore::U8(a) => a[[y, x, channel]] = v.round().clamp(0.0, 255.0) as u8,
            SampleStore::U16(a) => a[[y, x, channel]] = v.round().clamp(0.0, 65535.0) as u16,
            SampleStore::F32(a) => a[[y, x, channel]] = v,
        }
    }

    /// Luminance of the pixel at `(x, y)` in the canonical domain.
    ///
    /// Applies BT.601 weights for RGB-like layouts; gray, indexed and YUV
    /// layouts read channel 0 directly.
    #[inline]
    pub fn luminance(&self, x: usize, y: usize) -> f32 {
        match self.layout {
            ChannelLayout::Rgb | ChannelLayout::Rgba if self.channels() >= 3 => {
                LUMA_R * self.get(x, y, 0) + LUMA_G * self.get(x, y, 1) + LUMA_B * self.get(x, y, 2)
            }
            _ => self.get(x, y, 0),
        }
    }

    /// Number of channels carrying color data (excludes alpha).
    #[inline]
    pub(crate) fn color_channels(&self) -> usize {
        let c = self.channels();
        if self.layout == ChannelLayout::Rgba && c == 4 {
            3
        } else {
            c
        }
    }

    /// Error unless `other` matches in width, height, channels and format.
    pub(crate) fn check_compatible(&self, other: &PixelBuffer) -> Result<()> {
        if self.width() != other.width()
            || self.height() != other.height()
            || self.channels() != other.channels()
        {
            return Err(ImageError::DimensionMismatch);
        }
        if self.format() != other.format() {
            return Err(ImageError::FormatMismatch);
        }
        Ok(())
    }
}
