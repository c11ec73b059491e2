use image::{GenericImageView, ImageBuffer, Pixel, Primitive};
use imageproc::definitions::Clamp;

use crate::error::ResizeError;
use crate::Image;

/// One source sample contributing to one destination sample.
#[derive(Debug, Clone, Copy)]
struct AreaWeight {
    dst: u32,
    src: u32,
    weight: f32,
}

/// Area-averaging downscaler.
///
/// Each destination pixel is the coverage-weighted mean of the source pixels
/// under its footprint, which avoids the aliasing a point or bilinear
/// sampler shows at large reduction factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaResize {
    width: u32,
    height: u32,
}

impl AreaResize {
    /// Creates a resizer targeting `width x height`.
    pub const fn new(width: u32, height: u32) -> Result<Self, ResizeError> {
        if width == 0 || height == 0 {
            return Err(ResizeError::InvalidTargetDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Downscales `src` to the target size.
    ///
    /// # Errors
    ///
    /// * [`ResizeError::EmptyImage`] if `src` has a zero dimension
    /// * [`ResizeError::UpscalingNotSupported`] if the target is larger than
    ///   `src` along either axis
    pub fn resize<I, P>(&self, src: &I) -> Result<Image<P>, ResizeError>
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel,
        P::Subpixel: Clamp<f32> + Into<f32> + Primitive,
    {
        let (src_width, src_height) = src.dimensions();
        if src_width == 0 || src_height == 0 {
            return Err(ResizeError::EmptyImage {
                width: src_width,
                height: src_height,
            });
        }
        if self.width > src_width || self.height > src_height {
            return Err(ResizeError::UpscalingNotSupported {
                src_width,
                src_height,
                target_width: self.width,
                target_height: self.height,
            });
        }

        if let (Some(fx), Some(fy)) = (
            integer_factor(src_width, self.width),
            integer_factor(src_height, self.height),
        ) {
            Ok(resize_integer_factor(src, self.width, self.height, fx, fy))
        } else {
            Ok(resize_fractional(src, self.width, self.height))
        }
    }
}

/// Returns the reduction factor when `src` is an exact multiple of `dst`.
fn integer_factor(src: u32, dst: u32) -> Option<u32> {
    (src % dst == 0).then_some(src / dst)
}

/// Builds the coverage table mapping source samples to destination samples.
///
/// Weights for every destination index sum to one.
fn area_weights(src_size: u32, dst_size: u32) -> Vec<AreaWeight> {
    let scale = src_size as f32 / dst_size as f32;
    let mut table = Vec::new();

    for dst in 0..dst_size {
        let start = dst as f32 * scale;
        let end = (start + scale).min(src_size as f32);
        let footprint = end - start;

        let first = start.floor() as u32;
        let last = (end.ceil() as u32).min(src_size);
        for src in first..last {
            let covered = (end.min(src as f32 + 1.0) - start.max(src as f32)).max(0.0);
            if covered > 1e-3 {
                table.push(AreaWeight {
                    dst,
                    src,
                    weight: covered / footprint,
                });
            }
        }
    }

    table
}

/// Integer channels round to nearest, float channels are only clamped.
fn to_subpixel<S>(value: f32) -> S
where
    S: Clamp<f32> + Into<f32> + Primitive,
{
    if S::DEFAULT_MAX_VALUE.into() > 1.0 {
        S::clamp(value.round())
    } else {
        S::clamp(value)
    }
}

fn resize_integer_factor<I, P>(src: &I, width: u32, height: u32, fx: u32, fy: u32) -> Image<P>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel,
    P::Subpixel: Clamp<f32> + Into<f32> + Primitive,
{
    let channels = P::CHANNEL_COUNT as usize;
    let inv_area = 1.0 / (fx * fy) as f32;
    let mut sums = vec![0.0f32; channels];
    let mut out = vec![P::Subpixel::DEFAULT_MIN_VALUE; channels];

    ImageBuffer::from_fn(width, height, |dx, dy| {
        sums.fill(0.0);
        for sy in dy * fy..(dy + 1) * fy {
            for sx in dx * fx..(dx + 1) * fx {
                let pixel = src.get_pixel(sx, sy);
                for (sum, &value) in sums.iter_mut().zip(pixel.channels()) {
                    *sum += value.into();
                }
            }
        }
        for (dst, &sum) in out.iter_mut().zip(&sums) {
            *dst = to_subpixel(sum * inv_area);
        }
        *P::from_slice(&out)
    })
}

fn resize_fractional<I, P>(src: &I, width: u32, height: u32) -> Image<P>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel,
    P::Subpixel: Clamp<f32> + Into<f32> + Primitive,
{
    let (src_width, src_height) = src.dimensions();
    let x_weights = area_weights(src_width, width);
    let y_weights = area_weights(src_height, height);

    let channels = P::CHANNEL_COUNT as usize;
    let row_len = width as usize * channels;
    let mut row = vec![0.0f32; row_len];
    let mut acc = vec![0.0f32; row_len * height as usize];

    for y in &y_weights {
        row.fill(0.0);
        for x in &x_weights {
            let pixel = src.get_pixel(x.src, y.src);
            let base = x.dst as usize * channels;
            for (c, &value) in pixel.channels().iter().enumerate() {
                row[base + c] += value.into() * x.weight;
            }
        }

        let dst_row = &mut acc[y.dst as usize * row_len..(y.dst as usize + 1) * row_len];
        for (dst, &value) in dst_row.iter_mut().zip(&row) {
            *dst += value * y.weight;
        }
    }

    let mut out = vec![P::Subpixel::DEFAULT_MIN_VALUE; channels];
    ImageBuffer::from_fn(width, height, |dx, dy| {
        let base = dy as usize * row_len + dx as usize * channels;
        for (c, dst) in out.iter_mut().enumerate() {
            *dst = to_subpixel(acc[base + c]);
        }
        *P::from_slice(&out)
    })
}

/// Extension trait providing area downscaling on image buffers.
pub trait AreaResizeExt<P: Pixel> {
    /// Downscales to `width x height` by area averaging.
    fn resize_area(&self, width: u32, height: u32) -> Result<Image<P>, ResizeError>;
}

impl<P> AreaResizeExt<P> for Image<P>
where
    P: Pixel,
    P::Subpixel: Clamp<f32> + Into<f32> + Primitive,
{
    fn resize_area(&self, width: u32, height: u32) -> Result<Image<P>, ResizeError> {
        AreaResize::new(width, height)?.resize(self)
    }
}
