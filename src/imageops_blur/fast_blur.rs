use image::imageops::{self, FilterType};
use image::Rgba;
use itertools::izip;
use tracing::debug;

use crate::error::BlurError;
use crate::imageops_blur::area_resize::AreaResizeExt;
use crate::imageops_blur::backend::{select_backend, BackendPreference};
use crate::imageops_blur::pixel_buffer::PixelBuffer;
use crate::utils::{scaled_dimension, validate_non_empty_image, validate_radius};
use crate::Image;

/// Parameters for [`FastBlurExt::fast_blur`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FastBlurOptions {
    /// Downscale factor in `(0, 1]` applied before blurring
    pub scale: f32,
    /// Blur radius at the reduced size
    pub radius: i32,
    /// Backend used for the blur itself
    pub backend: BackendPreference,
}

impl Default for FastBlurOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            radius: 8,
            backend: BackendPreference::Software,
        }
    }
}

impl FastBlurOptions {
    /// Options for the given scale and radius on the software backend.
    pub const fn new(scale: f32, radius: i32) -> Self {
        Self {
            scale,
            radius,
            backend: BackendPreference::Software,
        }
    }

    #[must_use]
    pub const fn with_backend(mut self, backend: BackendPreference) -> Self {
        self.backend = backend;
        self
    }

    /// Checks the scale factor and radius.
    pub fn validate(&self) -> Result<(), BlurError> {
        if !(self.scale > 0.0 && self.scale <= 1.0) {
            return Err(BlurError::InvalidScale(self.scale));
        }
        validate_radius(self.radius)?;
        Ok(())
    }
}

/// Downscale, blur, upscale.
///
/// Blurring a reduced copy is much cheaper than blurring at full size and
/// the resampling adds extra softening of its own. With `scale == 1.0` no
/// resampling happens and the result equals a plain blur through the chosen
/// backend. The output always has the input's dimensions and alpha channel.
pub trait FastBlurExt {
    /// Returns a blurred copy of the image.
    ///
    /// # Errors
    ///
    /// * [`BlurError::InvalidScale`] if `scale` is not in `(0, 1]`
    /// * [`BlurError::InvalidRadius`] if the radius is out of range
    /// * [`BlurError::InvalidDimensions`] if the image, or its scaled size,
    ///   has a zero dimension
    fn fast_blur(&self, options: &FastBlurOptions) -> Result<Self, BlurError>
    where
        Self: Sized;
}

impl FastBlurExt for Image<Rgba<u8>> {
    fn fast_blur(&self, options: &FastBlurOptions) -> Result<Self, BlurError> {
        options.validate()?;
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height)?;

        let scaled_width = scaled_dimension(width, options.scale);
        let scaled_height = scaled_dimension(height, options.scale);
        validate_non_empty_image(scaled_width, scaled_height)?;
        let resampled = (scaled_width, scaled_height) != (width, height);

        debug!(
            width,
            height,
            scaled_width,
            scaled_height,
            radius = options.radius,
            "fast blur"
        );

        let mut small = if resampled {
            self.resize_area(scaled_width, scaled_height)?
        } else {
            self.clone()
        };

        let mut buffer = PixelBuffer::from_rgba_image(&small)?;
        select_backend(options.backend, scaled_width, scaled_height, options.radius)
            .blur_in_place(&mut buffer, options.radius)?;
        buffer.write_rgb_into(&mut small);

        if !resampled {
            return Ok(small);
        }

        let mut output = imageops::resize(&small, width, height, FilterType::Triangle);
        for (dst, src) in izip!(output.pixels_mut(), self.pixels()) {
            dst.0[3] = src.0[3];
        }
        Ok(output)
    }
}

impl FastBlurExt for PixelBuffer {
    fn fast_blur(&self, options: &FastBlurOptions) -> Result<Self, BlurError> {
        let blurred = self.to_rgba_image().fast_blur(options)?;
        Self::from_rgba_image(&blurred)
    }
}
