//! Test utilities for imageops-blur
//!
//! This module provides common fixtures for the unit tests.
//! It is only compiled when running tests.

use image::{Rgb, Rgba};

use crate::Image;

/// Creates a 2x2 RGBA image with known pixel values:
/// - (0,0): [200, 150, 100, 255] (opaque)
/// - (1,0): [100, 200, 150, 128] (semi-transparent)
/// - (0,1): [150, 100, 200, 64]  (more transparent)
/// - (1,1): [50, 75, 25, 0]      (fully transparent)
pub fn create_test_rgba_image() -> Image<Rgba<u8>> {
    let mut image: Image<Rgba<u8>> = Image::new(2, 2);
    image.put_pixel(0, 0, Rgba([200, 150, 100, 255]));
    image.put_pixel(1, 0, Rgba([100, 200, 150, 128]));
    image.put_pixel(0, 1, Rgba([150, 100, 200, 64]));
    image.put_pixel(1, 1, Rgba([50, 75, 25, 0]));
    image
}

/// Creates an RGB checkerboard alternating [200, 150, 100] and
/// [100, 150, 200], starting with the former at (0, 0).
pub fn create_large_test_image(width: u32, height: u32) -> Image<Rgb<u8>> {
    Image::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgb([200, 150, 100])
        } else {
            Rgb([100, 150, 200])
        }
    })
}

/// Creates an RGBA image with a horizontal red ramp, a vertical green ramp
/// and an alpha channel that varies along both axes.
pub fn create_gradient_rgba_image(width: u32, height: u32) -> Image<Rgba<u8>> {
    Image::from_fn(width, height, |x, y| {
        let r = (x * 255 / (width.max(2) - 1)) as u8;
        let g = (y * 255 / (height.max(2) - 1)) as u8;
        let a = if (x + y) % 3 == 0 { 128 } else { 255 };
        Rgba([r, g, 64, a])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_test_rgba_image_with_valid_input_creates_image() {
        let image = create_test_rgba_image();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(0, 0), &Rgba([200, 150, 100, 255]));
        assert_eq!(image.get_pixel(1, 1), &Rgba([50, 75, 25, 0]));
    }

    #[test]
    fn create_large_test_image_with_valid_input_creates_checkerboard() {
        let image = create_large_test_image(10, 10);
        assert_eq!(image.dimensions(), (10, 10));
        assert_eq!(image.get_pixel(0, 0), &Rgb([200, 150, 100]));
        assert_eq!(image.get_pixel(1, 0), &Rgb([100, 150, 200]));
        assert_eq!(image.get_pixel(0, 1), &Rgb([100, 150, 200]));
        assert_eq!(image.get_pixel(1, 1), &Rgb([200, 150, 100]));
    }

    #[test]
    fn create_gradient_rgba_image_spans_full_range() {
        let image = create_gradient_rgba_image(8, 4);
        assert_eq!(image.get_pixel(0, 0), &Rgba([0, 0, 64, 128]));
        assert_eq!(image.get_pixel(7, 3)[0], 255);
        assert_eq!(image.get_pixel(7, 3)[1], 255);
    }
}
