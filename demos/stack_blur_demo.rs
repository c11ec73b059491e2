use std::env;

use imageops_blur::{BackendPreference, FastBlurExt, FastBlurOptions, StackBlurExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 4 || args.len() > 6 {
        eprintln!(
            "Usage: {} <input_image> <radius> <output_image> [scale] [accelerated]",
            args[0]
        );
        eprintln!("Example: {} input.png 12 output.png 0.25", args[0]);
        std::process::exit(1);
    }

    let input_path = &args[1];
    let radius: i32 = args[2].parse().map_err(|_| "Invalid radius")?;
    let output_path = &args[3];
    let scale: Option<f32> = args
        .get(4)
        .map(|s| s.parse())
        .transpose()
        .map_err(|_| "Invalid scale")?;
    let backend = if args.get(5).is_some_and(|s| s == "accelerated") {
        BackendPreference::Accelerated
    } else {
        BackendPreference::Software
    };

    // The library only handles in-memory buffers; decoding lives here.
    let img = image::open(input_path)?.to_rgba8();
    info!(
        width = img.width(),
        height = img.height(),
        radius,
        "loaded {input_path}"
    );

    let blurred = match scale {
        Some(scale) => {
            let options = FastBlurOptions::new(scale, radius).with_backend(backend);
            img.fast_blur(&options)?
        }
        None => img.stack_blur(radius)?,
    };

    blurred.save(output_path)?;
    info!("wrote {output_path}");

    Ok(())
}
