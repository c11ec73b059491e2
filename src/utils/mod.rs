//! Internal validation helpers shared by the blur operations.
//!
//! Every public operation validates its arguments through these functions
//! before it touches a pixel.

use crate::error::BlurError;

/// Largest radius accepted by the stack blur.
///
/// Keeps the stack (`2 * radius + 1` slots) and the 64-bit running sums
/// bounded.
pub const MAX_RADIUS: i32 = 65_535;

/// Validates a blur radius and returns it as `usize`.
///
/// # Arguments
///
/// * `radius` - Radius supplied by the caller
///
/// # Returns
///
/// The radius as `usize` if it lies in `1..=MAX_RADIUS`
pub fn validate_radius(radius: i32) -> Result<usize, BlurError> {
    if (1..=MAX_RADIUS).contains(&radius) {
        Ok(radius as usize)
    } else {
        Err(BlurError::InvalidRadius {
            radius,
            max: MAX_RADIUS,
        })
    }
}

/// Validates that an image has non-zero dimensions.
pub const fn validate_non_empty_image(width: u32, height: u32) -> Result<(), BlurError> {
    if width == 0 || height == 0 {
        Err(BlurError::InvalidDimensions { width, height })
    } else {
        Ok(())
    }
}

/// Validates that a raw pixel slice matches the declared dimensions.
///
/// An empty slice is reported as [`BlurError::EmptyInput`] rather than as a
/// size mismatch.
pub fn validate_buffer_len(len: usize, width: u32, height: u32) -> Result<(), BlurError> {
    if len == 0 {
        return Err(BlurError::EmptyInput);
    }
    validate_non_empty_image(width, height)?;

    let expected = width as usize * height as usize;
    if len != expected {
        return Err(BlurError::BufferSizeMismatch {
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// Computes one side of a scaled image, rounding to nearest.
#[inline]
pub fn scaled_dimension(size: u32, scale: f32) -> u32 {
    (size as f32 * scale + 0.5) as u32
}
