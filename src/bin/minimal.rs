// Minimal smoke run: every style over a synthetic scene, results saved as PNG

use image::{Rgb, RgbImage};

use photo_stylizer::{
    config::Config,
    raster::{encode_png, PixelGrid},
    styles::{StyleConfig, StyleRegistry},
    transform::TransformEngine,
};

fn scene(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let dx = x as f32 - width as f32 / 2.0;
        let dy = y as f32 - height as f32 / 2.0;
        if dx * dx + dy * dy < (height as f32 / 4.0).powi(2) {
            Rgb([230, 180, 40])
        } else if y > height * 2 / 3 {
            Rgb([40, (90 + x % 40) as u8, 50])
        } else {
            Rgb([(80 + y / 4) as u8, 140, 220])
        }
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Testing Photo-Stylizer core functionality");

    // 1. Style registry
    let registry = StyleRegistry::new();
    let available = registry.available_styles();
    println!("\n1. Available styles: {:?}", available);
    assert_eq!(available.len(), 4);

    // 2. Input image
    let grid = PixelGrid::new(scene(320, 240))?;
    println!("\n2. Created scene: {}x{}", grid.width(), grid.height());
    let input_png = encode_png(&grid)?;
    std::fs::write("minimal_input.png", input_png.as_bytes())?;

    // 3. Styles applied directly
    println!("\n3. Applying each style directly...");
    for name in &available {
        let style = registry.get_style(name).ok_or("style not found")?;
        let out = style.apply_effect(&grid, &StyleConfig::default())?;
        println!("   {} ({}): {}x{}", style.name(), style.description(), out.width(), out.height());
    }

    // 4. Full transform through the engine, including the poster anime variant
    println!("\n4. Running the transform engine...");
    let mut config = Config::default();
    config
        .styles
        .overrides
        .insert("anime".to_string(), StyleConfig::default().set("variant", "poster"));
    let engine = TransformEngine::new(config)?;

    for name in &available {
        let encoded = engine.transform(input_png.as_bytes(), name)?;
        let path = format!("minimal_{}.png", name);
        std::fs::write(&path, encoded.as_bytes())?;
        println!("   {} -> {} ({} bytes)", name, path, encoded.len());
    }

    // 5. Unknown style falls back to the default
    let fallback = engine.transform(input_png.as_bytes(), "watercolor")?;
    let modern = engine.transform(input_png.as_bytes(), "modern_art")?;
    println!("\n5. Unknown style matches modern_art: {}", fallback == modern);

    println!("\nAll checks passed.");
    Ok(())
}
