//! Demo application showing basic herbview usage.
//!
//! Loads an image (the first argument, or a generated gradient) into a depth
//! visualizer, decodes it on a worker thread, adjusts the controls and
//! prints the resulting scene.
//!
//! Run with `RUST_LOG=debug cargo run --example demo -- leaf.png`.

use std::path::Path;

use herbview::*;
use image::{ImageBuffer, ImageFormat, Rgba};

fn gradient_png() -> Vec<u8> {
    let img = ImageBuffer::from_fn(64, 64, |x, y| Rgba([(x * 4) as u8, (y * 4) as u8, 96, 255]));
    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)
        .expect("encoding a PNG into memory cannot fail");
    buffer.into_inner()
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let ctx = init()?;
    let mut viewer = DepthMeshVisualizer::new(&ctx, HeadlessBackend::new())?;

    let image = match std::env::args().nth(1) {
        Some(path) => SourceImage::from_path(Path::new(&path))?,
        None => SourceImage::new(gradient_png(), "image/png"),
    };

    // Decode off the interaction thread, then hand the result back.
    let ticket = viewer.begin_load(image)?;
    let decoded = std::thread::spawn(move || ticket.decode())
        .join()
        .map_err(|_| "decode worker panicked")?;
    viewer.finish_load(decoded)?;

    viewer.set_parameters(DisplacementParameters::new(70.0, 90.0, 120.0))?;
    viewer.set_view_state(ViewState::Comparison);

    viewer.orbit_mut().rotate(0.1, 0.05);
    while viewer.orbit_mut().update() {}

    let scene = viewer.scene();
    let (min, max) = scene.mesh.bounding_box();
    println!("image size: {:?}", viewer.image_size());
    println!("relief: {:.3} .. {:.3}", min.z, max.z);
    println!("group offset: {:.2}", scene.group_translation.y);
    println!("camera at {:?}", scene.camera.position);
    for light in scene.lights.lights() {
        println!("  {:<8} {:.2}", light.name, light.intensity);
    }

    if let Some(plant) = ctx.catalog.get("turmeric") {
        println!("\n{}", compose_narration(plant));
    }

    viewer.dispose();
    Ok(())
}
