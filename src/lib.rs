mod error;
mod imageops_blur;
mod utils;

#[cfg(test)]
mod test_utils;

use image::{ImageBuffer, Pixel};

pub use error::{BlurError, ResizeError};
pub use imageops_blur::area_resize::{AreaResize, AreaResizeExt};
pub use imageops_blur::backend::{
    select_backend, AcceleratedBoxBlur, BackendPreference, BlurBackend, SoftwareStackBlur,
};
pub use imageops_blur::fast_blur::{FastBlurExt, FastBlurOptions};
pub use imageops_blur::pixel_buffer::{pack_argb, unpack_argb, PixelBuffer, ALPHA_MASK};
pub use imageops_blur::stack_blur::{stack_blur_argb, StackBlurExt};
pub use utils::MAX_RADIUS;

pub type Image<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;
