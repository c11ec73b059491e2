use image::{Rgb, Rgba};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::trace;

use crate::error::BlurError;
use crate::imageops_blur::pixel_buffer::{rgb_of, with_rgb, PixelBuffer};
use crate::utils::{validate_buffer_len, validate_radius};
use crate::Image;

/// Largest lookup table built for the final division, in entries.
const MAX_DIVISION_TABLE_LEN: usize = 1 << 20;

/// Stack blur operations.
///
/// Stack blur approximates a Gaussian blur with a triangular ("tent")
/// kernel of width `2 * radius + 1`, applied horizontally and then
/// vertically. The cost per pixel does not depend on the radius.
/// Out-of-range samples replicate the nearest edge pixel and the alpha
/// channel is never modified.
///
/// Two ownership flavours are offered: [`stack_blur`](Self::stack_blur)
/// leaves `self` untouched and returns a blurred copy, while
/// [`stack_blur_mut`](Self::stack_blur_mut) overwrites `self`.
pub trait StackBlurExt {
    /// Returns a blurred copy of the image.
    ///
    /// # Errors
    ///
    /// * [`BlurError::InvalidRadius`] if `radius < 1` or `radius > MAX_RADIUS`
    /// * [`BlurError::EmptyInput`] if the image holds no pixels
    fn stack_blur(&self, radius: i32) -> Result<Self, BlurError>
    where
        Self: Sized;

    /// Blurs the image in place.
    ///
    /// On error the image is left exactly as it was.
    fn stack_blur_mut(&mut self, radius: i32) -> Result<&mut Self, BlurError>;
}

impl StackBlurExt for PixelBuffer {
    fn stack_blur(&self, radius: i32) -> Result<Self, BlurError> {
        let mut output = self.clone();
        output.stack_blur_mut(radius)?;
        Ok(output)
    }

    fn stack_blur_mut(&mut self, radius: i32) -> Result<&mut Self, BlurError> {
        let (width, height) = self.dimensions();
        stack_blur_argb(self.as_mut_slice(), width, height, radius)?;
        Ok(self)
    }
}

impl StackBlurExt for Image<Rgba<u8>> {
    fn stack_blur(&self, radius: i32) -> Result<Self, BlurError> {
        let mut output = self.clone();
        output.stack_blur_mut(radius)?;
        Ok(output)
    }

    fn stack_blur_mut(&mut self, radius: i32) -> Result<&mut Self, BlurError> {
        validate_radius(radius)?;
        let mut buffer = PixelBuffer::from_rgba_image(self)?;
        buffer.stack_blur_mut(radius)?;
        buffer.write_rgb_into(self);
        Ok(self)
    }
}

impl StackBlurExt for Image<Rgb<u8>> {
    fn stack_blur(&self, radius: i32) -> Result<Self, BlurError> {
        validate_radius(radius)?;
        let mut buffer = PixelBuffer::from_rgb_image(self)?;
        buffer.stack_blur_mut(radius)?;
        Ok(buffer.to_rgb_image())
    }

    fn stack_blur_mut(&mut self, radius: i32) -> Result<&mut Self, BlurError> {
        *self = self.stack_blur(radius)?;
        Ok(self)
    }
}

/// Blurs a raw slice of packed `0xAARRGGBB` pixels in place.
///
/// This is the primitive behind [`StackBlurExt`]. All arguments are checked
/// before the slice is modified.
///
/// # Arguments
///
/// * `pixels` - Row-major pixels, exactly `width * height` long
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `radius` - Blur radius, `1..=MAX_RADIUS`
pub fn stack_blur_argb(
    pixels: &mut [u32],
    width: u32,
    height: u32,
    radius: i32,
) -> Result<(), BlurError> {
    let radius = validate_radius(radius)?;
    validate_buffer_len(pixels.len(), width, height)?;

    let (width, height) = (width as usize, height as usize);
    trace!(width, height, radius, "stack blur");

    let divider = Divider::new(radius);
    let mut rgb = vec![[0u8; 3]; pixels.len()];

    horizontal_pass(pixels, &mut rgb, width, radius, &divider);
    vertical_pass(pixels, &rgb, width, height, radius, &divider);
    Ok(())
}

/// Floor division by the total kernel weight `(radius + 1)^2`.
///
/// Small radii use a lookup table indexed by the weighted sum; the table
/// has `256 * divsum` entries so the largest possible sum stays in bounds.
struct Divider {
    divsum: u64,
    table: Option<Vec<u8>>,
}

impl Divider {
    fn new(radius: usize) -> Self {
        let divsum = (radius as u64 + 1).pow(2);
        let len = 256 * divsum;
        let table = (len <= MAX_DIVISION_TABLE_LEN as u64)
            .then(|| (0..len).map(|v| (v / divsum) as u8).collect());
        Self { divsum, table }
    }

    #[inline]
    fn divide(&self, sum: u64) -> u8 {
        match &self.table {
            Some(table) => table[sum as usize],
            None => (sum / self.divsum) as u8,
        }
    }
}

/// Blurs one line of `len` samples with the sliding tent window.
///
/// `read(i)` must accept any index in `0..len`; the window clamps
/// out-of-range offsets before calling it. `stack` holds `2 * radius + 1`
/// slots and is overwritten.
fn blur_line<R, W>(
    len: usize,
    radius: usize,
    divider: &Divider,
    stack: &mut [[u8; 3]],
    read: R,
    mut write: W,
) where
    R: Fn(usize) -> [u8; 3],
    W: FnMut(usize, [u8; 3]),
{
    let last = len - 1;
    let div = stack.len();

    let mut sum = [0u64; 3];
    let mut in_sum = [0u64; 3];
    let mut out_sum = [0u64; 3];

    for (slot_index, slot) in stack.iter_mut().enumerate() {
        let offset = slot_index as isize - radius as isize;
        let sample = read((offset.max(0) as usize).min(last));
        *slot = sample;

        let weight = (radius + 1 - offset.unsigned_abs()) as u64;
        for c in 0..3 {
            let value = u64::from(sample[c]);
            sum[c] += value * weight;
            if offset > 0 {
                in_sum[c] += value;
            } else {
                out_sum[c] += value;
            }
        }
    }

    let mut pointer = radius;
    for position in 0..len {
        write(
            position,
            [
                divider.divide(sum[0]),
                divider.divide(sum[1]),
                divider.divide(sum[2]),
            ],
        );

        // Oldest slot leaves the window and is refilled with the next sample.
        let oldest = (pointer + div - radius) % div;
        let incoming = read((position + radius + 1).min(last));
        for c in 0..3 {
            sum[c] -= out_sum[c];
            out_sum[c] -= u64::from(stack[oldest][c]);
            in_sum[c] += u64::from(incoming[c]);
            sum[c] += in_sum[c];
        }
        stack[oldest] = incoming;

        // The slot after the centre crosses from the leading to the trailing half.
        pointer = (pointer + 1) % div;
        let center = stack[pointer];
        for c in 0..3 {
            out_sum[c] += u64::from(center[c]);
            in_sum[c] -= u64::from(center[c]);
        }
    }
}

#[cfg(not(feature = "rayon"))]
fn horizontal_pass(
    pixels: &[u32],
    rgb: &mut [[u8; 3]],
    width: usize,
    radius: usize,
    divider: &Divider,
) {
    let mut stack = vec![[0u8; 3]; 2 * radius + 1];
    for (src_row, dst_row) in pixels.chunks_exact(width).zip(rgb.chunks_exact_mut(width)) {
        blur_line(
            width,
            radius,
            divider,
            &mut stack,
            |x| rgb_of(src_row[x]),
            |x, value| dst_row[x] = value,
        );
    }
}

#[cfg(not(feature = "rayon"))]
fn vertical_pass(
    pixels: &mut [u32],
    rgb: &[[u8; 3]],
    width: usize,
    height: usize,
    radius: usize,
    divider: &Divider,
) {
    let mut stack = vec![[0u8; 3]; 2 * radius + 1];
    for x in 0..width {
        blur_line(
            height,
            radius,
            divider,
            &mut stack,
            |y| rgb[y * width + x],
            |y, value| {
                let index = y * width + x;
                pixels[index] = with_rgb(pixels[index], value);
            },
        );
    }
}

#[cfg(feature = "rayon")]
fn horizontal_pass(
    pixels: &[u32],
    rgb: &mut [[u8; 3]],
    width: usize,
    radius: usize,
    divider: &Divider,
) {
    pixels
        .par_chunks_exact(width)
        .zip(rgb.par_chunks_exact_mut(width))
        .for_each_init(
            || vec![[0u8; 3]; 2 * radius + 1],
            |stack, (src_row, dst_row)| {
                blur_line(
                    width,
                    radius,
                    divider,
                    stack,
                    |x| rgb_of(src_row[x]),
                    |x, value| dst_row[x] = value,
                );
            },
        );
}

#[cfg(feature = "rayon")]
fn vertical_pass(
    pixels: &mut [u32],
    rgb: &[[u8; 3]],
    width: usize,
    height: usize,
    radius: usize,
    divider: &Divider,
) {
    // Columns are blurred into a column-major buffer so each task owns a
    // contiguous chunk, then scattered back in row-major order.
    let mut columns = vec![[0u8; 3]; rgb.len()];
    columns
        .par_chunks_exact_mut(height)
        .enumerate()
        .for_each_init(
            || vec![[0u8; 3]; 2 * radius + 1],
            |stack, (x, column)| {
                blur_line(
                    height,
                    radius,
                    divider,
                    stack,
                    |y| rgb[y * width + x],
                    |y, value| column[y] = value,
                );
            },
        );

    pixels
        .par_chunks_exact_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = with_rgb(*pixel, columns[x * height + y]);
            }
        });
}
