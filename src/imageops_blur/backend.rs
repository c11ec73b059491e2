use libblur::{BlurImage, BlurImageMut, BoxBlurParameters, FastBlurChannels, ThreadingPolicy};
use tracing::debug;

use crate::error::BlurError;
use crate::imageops_blur::pixel_buffer::{with_rgb, PixelBuffer};
use crate::imageops_blur::stack_blur::StackBlurExt;
use crate::utils::validate_radius;

/// A blur implementation that can run on a [`PixelBuffer`].
///
/// Implementations must keep the alpha channel and the dimensions of the
/// buffer unchanged, and must not modify the buffer when they return an
/// error.
pub trait BlurBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Whether this backend can blur an image of the given size and radius.
    fn supports(&self, width: u32, height: u32, radius: i32) -> bool;

    /// Blurs `buffer` in place.
    fn blur_in_place(&self, buffer: &mut PixelBuffer, radius: i32) -> Result<(), BlurError>;
}

/// Portable stack blur. Always available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoftwareStackBlur;

impl BlurBackend for SoftwareStackBlur {
    fn name(&self) -> &'static str {
        "software-stack-blur"
    }

    fn supports(&self, width: u32, height: u32, radius: i32) -> bool {
        width > 0 && height > 0 && validate_radius(radius).is_ok()
    }

    fn blur_in_place(&self, buffer: &mut PixelBuffer, radius: i32) -> Result<(), BlurError> {
        buffer.stack_blur_mut(radius).map(|_| ())
    }
}

/// SIMD box blur provided by `libblur`.
///
/// The result is a box-blur approximation and differs numerically from
/// [`SoftwareStackBlur`]. Alpha is blurred by libblur along with the colour
/// channels and then restored from the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceleratedBoxBlur;

impl BlurBackend for AcceleratedBoxBlur {
    fn name(&self) -> &'static str {
        "libblur-box-blur"
    }

    fn supports(&self, width: u32, height: u32, radius: i32) -> bool {
        // libblur takes an odd kernel width and needs the image strictly larger than it.
        box_kernel(radius).is_some_and(|kernel| kernel % 2 == 1 && width.min(height) > kernel)
    }

    fn blur_in_place(&self, buffer: &mut PixelBuffer, radius: i32) -> Result<(), BlurError> {
        let (width, height) = buffer.dimensions();
        if !self.supports(width, height, radius) {
            validate_radius(radius)?;
            return Err(BlurError::Backend(format!(
                "{width}x{height} image is too small for radius {radius}"
            )));
        }

        let kernel = box_kernel(radius).ok_or_else(|| {
            BlurError::Backend(format!("no box kernel for radius {radius}"))
        })?;

        let source = buffer.to_rgba_bytes();
        let mut blurred = vec![0u8; source.len()];

        {
            let src_image = BlurImage::borrow(&source, width, height, FastBlurChannels::Channels4);
            let mut dst_image =
                BlurImageMut::borrow(&mut blurred, width, height, FastBlurChannels::Channels4);

            libblur::box_blur(
                &src_image,
                &mut dst_image,
                BoxBlurParameters::new(kernel),
                ThreadingPolicy::Single,
            )
            .map_err(|e| BlurError::Backend(e.to_string()))?;
        }

        for (pixel, rgba) in buffer.as_mut_slice().iter_mut().zip(blurred.chunks_exact(4)) {
            *pixel = with_rgb(*pixel, [rgba[0], rgba[1], rgba[2]]);
        }
        Ok(())
    }
}

/// Full window width of a box blur with the given radius.
fn box_kernel(radius: i32) -> Option<u32> {
    let radius = u32::try_from(validate_radius(radius).ok()?).ok()?;
    radius.checked_mul(2)?.checked_add(1)
}

/// Which backend the caller would like to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendPreference {
    /// Always use the portable stack blur.
    #[default]
    Software,
    /// Use the accelerated backend when it supports the input, otherwise
    /// fall back to the software stack blur.
    Accelerated,
}

static SOFTWARE: SoftwareStackBlur = SoftwareStackBlur;
static ACCELERATED: AcceleratedBoxBlur = AcceleratedBoxBlur;

/// Picks a backend for the given preference and input.
pub fn select_backend(
    preference: BackendPreference,
    width: u32,
    height: u32,
    radius: i32,
) -> &'static dyn BlurBackend {
    let backend: &'static dyn BlurBackend = match preference {
        BackendPreference::Accelerated if ACCELERATED.supports(width, height, radius) => {
            &ACCELERATED
        }
        _ => &SOFTWARE,
    };
    debug!(
        ?preference,
        backend = backend.name(),
        width,
        height,
        radius,
        "selected blur backend"
    );
    backend
}
