//! Error type shared by every operation in the crate.
//!
//! All operations validate their arguments before touching pixel data, so a
//! returned error always means no change occurred; callers may retry with
//! different parameters without re-creating the buffer.

use thiserror::Error;

/// Errors reported by transform, filter, color and analysis operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// A parameter is outside its documented domain (zero dimension,
    /// non-positive gamma, empty kernel, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Binary operation operands differ in width, height or channel count.
    #[error("operands differ in dimensions or channel count")]
    DimensionMismatch,

    /// Binary operation operands differ in sample format.
    #[error("operands differ in sample format")]
    FormatMismatch,

    /// A channel index is not valid for the buffer.
    #[error("channel index {index} out of range for {channels} channels")]
    ChannelOutOfRange { index: usize, channels: usize },

    /// The image is smaller than the kernel footprint of a convolution.
    #[error("image {width}x{height} is smaller than the required {required}x{required} footprint")]
    TooSmall {
        width: usize,
        height: usize,
        required: usize,
    },

    /// A crop or composite rectangle does not fit the source bounds.
    #[error("rectangle at ({x}, {y}) sized {width}x{height} lies outside the {bound_width}x{bound_height} bounds")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        bound_width: usize,
        bound_height: usize,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ImageError>;
