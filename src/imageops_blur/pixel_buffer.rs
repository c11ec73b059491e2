use image::{Rgb, Rgba};

use crate::error::BlurError;
use crate::utils::validate_buffer_len;
use crate::Image;

/// Mask selecting the alpha bits of a packed ARGB pixel.
pub const ALPHA_MASK: u32 = 0xFF00_0000;

/// Packs four channels into a `0xAARRGGBB` value.
#[inline]
pub const fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Splits a packed pixel into `[a, r, g, b]`.
#[inline]
pub const fn unpack_argb(pixel: u32) -> [u8; 4] {
    [
        (pixel >> 24) as u8,
        (pixel >> 16) as u8,
        (pixel >> 8) as u8,
        pixel as u8,
    ]
}

/// Extracts the colour channels of a packed pixel as `[r, g, b]`.
#[inline]
pub const fn rgb_of(pixel: u32) -> [u8; 3] {
    [(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8]
}

/// Replaces the colour channels of `pixel` while keeping its alpha bits.
#[inline]
pub const fn with_rgb(pixel: u32, [r, g, b]: [u8; 3]) -> u32 {
    (pixel & ALPHA_MASK) | pack_argb(0, r, g, b)
}

/// Row-major buffer of packed `0xAARRGGBB` pixels.
///
/// A buffer always has non-zero dimensions and exactly `width * height`
/// pixels; the constructors enforce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Wraps raw packed pixels.
    ///
    /// # Errors
    ///
    /// * [`BlurError::EmptyInput`] if `pixels` is empty
    /// * [`BlurError::InvalidDimensions`] if either dimension is zero
    /// * [`BlurError::BufferSizeMismatch`] if `pixels.len() != width * height`
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, BlurError> {
        validate_buffer_len(pixels.len(), width, height)?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Creates a buffer filled with a single pixel value.
    pub fn from_pixel(width: u32, height: u32, pixel: u32) -> Result<Self, BlurError> {
        let len = width as usize * height as usize;
        Self::from_raw(width, height, vec![pixel; len])
    }

    /// Creates a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self, BlurError>
    where
        F: FnMut(u32, u32) -> u32,
    {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::from_raw(width, height, pixels)
    }

    /// Converts an RGBA image, keeping its alpha channel.
    pub fn from_rgba_image(image: &Image<Rgba<u8>>) -> Result<Self, BlurError> {
        let (width, height) = image.dimensions();
        let pixels = image
            .pixels()
            .map(|&Rgba([r, g, b, a])| pack_argb(a, r, g, b))
            .collect();
        Self::from_raw(width, height, pixels)
    }

    /// Converts an RGB image; every pixel becomes fully opaque.
    pub fn from_rgb_image(image: &Image<Rgb<u8>>) -> Result<Self, BlurError> {
        let (width, height) = image.dimensions();
        let pixels = image
            .pixels()
            .map(|&Rgb([r, g, b])| pack_argb(0xFF, r, g, b))
            .collect();
        Self::from_raw(width, height, pixels)
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.pixels
    }

    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    pub fn into_raw(self) -> Vec<u32> {
        self.pixels
    }

    /// Returns the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Converts back into an RGBA image.
    pub fn to_rgba_image(&self) -> Image<Rgba<u8>> {
        Image::from_fn(self.width, self.height, |x, y| {
            let [a, r, g, b] = unpack_argb(self.pixels[self.index(x, y)]);
            Rgba([r, g, b, a])
        })
    }

    /// Converts back into an RGB image, dropping alpha.
    pub fn to_rgb_image(&self) -> Image<Rgb<u8>> {
        Image::from_fn(self.width, self.height, |x, y| {
            Rgb(rgb_of(self.pixels[self.index(x, y)]))
        })
    }

    /// Writes the colour channels back into an RGBA image of the same size,
    /// leaving the image's alpha channel as it was.
    pub(crate) fn write_rgb_into(&self, image: &mut Image<Rgba<u8>>) {
        for (dst, &src) in image.pixels_mut().zip(&self.pixels) {
            let [r, g, b] = rgb_of(src);
            dst.0[0] = r;
            dst.0[1] = g;
            dst.0[2] = b;
        }
    }

    /// Flattens into `[r, g, b, a]` bytes.
    pub(crate) fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&p| {
                let [a, r, g, b] = unpack_argb(p);
                [r, g, b, a]
            })
            .collect()
    }

    #[inline]
    const fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_rgba_image;

    #[test]
    fn pack_and_unpack_agree() {
        let pixel = pack_argb(0x12, 0x34, 0x56, 0x78);
        assert_eq!(pixel, 0x1234_5678);
        assert_eq!(unpack_argb(pixel), [0x12, 0x34, 0x56, 0x78]);
        assert_eq!(rgb_of(pixel), [0x34, 0x56, 0x78]);
    }

    #[test]
    fn with_rgb_keeps_alpha_bits() {
        assert_eq!(with_rgb(0x80FF_FFFF, [1, 2, 3]), 0x8001_0203);
        assert_eq!(with_rgb(0x0000_0000, [255, 255, 255]), 0x00FF_FFFF);
    }

    #[test]
    fn from_raw_rejects_inconsistent_input() {
        assert_eq!(
            PixelBuffer::from_raw(2, 2, Vec::new()),
            Err(BlurError::EmptyInput)
        );
        assert!(matches!(
            PixelBuffer::from_raw(0, 2, vec![0; 2]),
            Err(BlurError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            PixelBuffer::from_raw(2, 2, vec![0; 3]),
            Err(BlurError::BufferSizeMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn from_fn_is_row_major() {
        let buffer = PixelBuffer::from_fn(3, 2, |x, y| y * 10 + x).unwrap();
        assert_eq!(buffer.as_slice(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(buffer.get(2, 1), Some(12));
        assert_eq!(buffer.get(3, 0), None);
    }

    #[test]
    fn rgba_image_conversion_keeps_every_channel() {
        let image = create_test_rgba_image();
        let buffer = PixelBuffer::from_rgba_image(&image).unwrap();

        assert_eq!(buffer.get(1, 0), Some(pack_argb(128, 100, 200, 150)));
        assert_eq!(buffer.to_rgba_image(), image);
    }

    #[test]
    fn rgb_image_conversion_is_opaque() {
        let image: Image<Rgb<u8>> = Image::from_pixel(2, 1, Rgb([10, 20, 30]));
        let buffer = PixelBuffer::from_rgb_image(&image).unwrap();

        assert!(buffer.as_slice().iter().all(|&p| p == 0xFF0A_141E));
        assert_eq!(buffer.to_rgb_image(), image);
    }

    #[test]
    fn to_rgba_bytes_uses_rgba_order() {
        let buffer = PixelBuffer::from_raw(1, 1, vec![0x4411_2233]).unwrap();
        assert_eq!(buffer.to_rgba_bytes(), vec![0x11, 0x22, 0x33, 0x44]);
    }
}
