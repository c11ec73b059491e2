//! Performance benchmarks for imageops-blur
//!
//! Stack blur cost should be linear in pixel count and flat in the radius;
//! the radius sweep below tracks that.

use criterion::*;
use image::Rgba;
use imageops_blur::{
    AcceleratedBoxBlur, BlurBackend, FastBlurExt, FastBlurOptions, Image, PixelBuffer,
    SoftwareStackBlur, StackBlurExt,
};
use itertools::iproduct;
use std::hint::black_box;

/// Helper function to create a test RGBA image with specific dimensions
fn create_rgba_image(width: u32, height: u32) -> Image<Rgba<u8>> {
    let mut image: Image<Rgba<u8>> = Image::new(width, height);

    iproduct!(0..height, 0..width).for_each(|(y, x)| {
        let r = ((x * 255) / width) as u8;
        let g = ((y * 255) / height) as u8;
        let b = ((x + y) * 255 / (width + height)) as u8;
        let a = if (x + y) % 3 == 0 { 128 } else { 255 };
        image.put_pixel(x, y, Rgba([r, g, b, a]));
    });

    image
}

/// Benchmark stack blur across image sizes at a fixed radius
fn bench_stack_blur_sizes(c: &mut Criterion) {
    let sizes = vec![
        (100, 100),   // Small
        (500, 500),   // Medium
        (1000, 1000), // Large
        (1920, 1080), // HD
    ];

    let mut group = c.benchmark_group("stack_blur_sizes");
    group.sample_size(10);

    for (width, height) in sizes {
        let buffer = PixelBuffer::from_rgba_image(&create_rgba_image(width, height)).unwrap();
        group.throughput(Throughput::Elements(u64::from(width * height)));
        group.bench_with_input(
            BenchmarkId::new("radius_8", format!("{width}x{height}")),
            &buffer,
            |b, buffer| b.iter(|| black_box(buffer.stack_blur(black_box(8)).unwrap())),
        );
    }

    group.finish();
}

/// Benchmark stack blur across radii on a fixed image
fn bench_stack_blur_radii(c: &mut Criterion) {
    let buffer = PixelBuffer::from_rgba_image(&create_rgba_image(512, 512)).unwrap();

    let mut group = c.benchmark_group("stack_blur_radii");
    group.sample_size(10);

    for radius in [1, 4, 16, 64, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, &radius| {
            b.iter(|| black_box(buffer.stack_blur(radius).unwrap()))
        });
    }

    group.finish();
}

/// Compare the two backends on the same input
fn bench_backends(c: &mut Criterion) {
    let buffer = PixelBuffer::from_rgba_image(&create_rgba_image(1000, 1000)).unwrap();
    let backends: [&dyn BlurBackend; 2] = [&SoftwareStackBlur, &AcceleratedBoxBlur];

    let mut group = c.benchmark_group("backends");
    group.sample_size(10);

    for backend in backends {
        group.bench_function(backend.name(), |b| {
            b.iter_batched(
                || buffer.clone(),
                |mut target| {
                    backend.blur_in_place(&mut target, 10).unwrap();
                    target
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

/// Benchmark fast blur at several downscale factors
fn bench_fast_blur(c: &mut Criterion) {
    let image = create_rgba_image(1920, 1080);

    let mut group = c.benchmark_group("fast_blur");
    group.sample_size(10);

    for scale in [1.0f32, 0.5, 0.25, 0.125] {
        let options = FastBlurOptions::new(scale, 8);
        group.bench_with_input(
            BenchmarkId::from_parameter(scale),
            &options,
            |b, options| b.iter(|| black_box(image.fast_blur(options).unwrap())),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_stack_blur_sizes,
    bench_stack_blur_radii,
    bench_backends,
    bench_fast_blur
);
criterion_main!(benches);
