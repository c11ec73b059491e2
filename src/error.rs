use thiserror::Error;

/// Error type for blur operations
///
/// Every variant is produced during validation, before any pixel is
/// written, so a failed call always leaves the caller's buffer untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlurError {
    /// Radius is non-positive or above the supported maximum
    #[error("Invalid blur radius {radius}: must be in 1..={max}")]
    InvalidRadius {
        /// Radius supplied by the caller
        radius: i32,
        /// Largest accepted radius
        max: i32,
    },

    /// Image has a zero dimension
    #[error("Invalid image dimensions {width}x{height}: both must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Raw pixel slice length does not match `width * height`
    #[error("Pixel buffer length mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Downscale factor outside `(0, 1]`
    #[error("Invalid scale factor {0}: must be in (0, 1]")]
    InvalidScale(f32),

    /// No pixel data at all
    #[error("Pixel buffer is empty")]
    EmptyInput,

    /// Resampling around the blur failed
    #[error("Resize failed: {0}")]
    Resize(#[from] ResizeError),

    /// The accelerated backend reported a failure
    #[error("Blur backend error: {0}")]
    Backend(String),
}

impl BlurError {
    /// Returns `true` for the argument-validation family of errors.
    ///
    /// `EmptyInput` is treated as a degenerate argument and is included.
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidRadius { .. }
                | Self::InvalidDimensions { .. }
                | Self::BufferSizeMismatch { .. }
                | Self::InvalidScale(_)
                | Self::EmptyInput
        )
    }
}

/// Error type for area resize operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResizeError {
    /// Target size has a zero dimension
    #[error("Invalid target dimensions {width}x{height}")]
    InvalidTargetDimensions { width: u32, height: u32 },

    /// Source image has a zero dimension
    #[error("Cannot resize empty image {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    /// Area resize only reduces images
    #[error(
        "Area resize cannot upscale {src_width}x{src_height} to {target_width}x{target_height}"
    )]
    UpscalingNotSupported {
        src_width: u32,
        src_height: u32,
        target_width: u32,
        target_height: u32,
    },
}
