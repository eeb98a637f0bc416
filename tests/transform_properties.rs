use image::{ImageFormat, Rgb, RgbImage};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use photo_stylizer::{
    config::Config,
    error::{ImageError, StylizerError},
    raster::{decode, encode_png, PixelGrid, Resizer},
    styles::StyleId,
    transform::TransformEngine,
};

fn photo(width: u32, height: u32, seed: u64) -> PixelGrid {
    let mut rng = SmallRng::seed_from_u64(seed);
    PixelGrid::new(RgbImage::from_fn(width, height, |x, y| {
        let base = if (x / 16 + y / 16) % 2 == 0 { 60 } else { 190 };
        let noise: i16 = rng.gen_range(-12..=12);
        let v = (base + noise).clamp(0, 255) as u8;
        Rgb([v, v.saturating_add(20), 255 - v])
    }))
    .unwrap()
}

fn png(grid: &PixelGrid) -> Vec<u8> {
    encode_png(grid).unwrap().into_bytes()
}

fn engine() -> TransformEngine {
    TransformEngine::new(Config::default()).unwrap()
}

#[test]
fn every_style_returns_png_with_input_aspect() {
    let mut config = Config::default();
    config.limits.max_dimension = 120;
    let engine = TransformEngine::new(config).unwrap();
    let bytes = png(&photo(300, 200, 1));

    for style in StyleId::ALL {
        let out = engine.transform(&bytes, style.as_str()).unwrap();
        assert_eq!(out.format(), Some(ImageFormat::Png), "{}", style);

        let (w, h) = decode(out.as_bytes()).unwrap().dimensions();
        assert_eq!((w, h), (120, 80), "{}", style);
    }
}

#[test]
fn unknown_style_matches_modern_art() {
    let engine = engine();
    let bytes = png(&photo(64, 48, 2));

    let modern = engine.transform(&bytes, "modern_art").unwrap();
    for unknown in ["watercolor", "", "MODERN ART!"] {
        assert_eq!(engine.transform(&bytes, unknown).unwrap(), modern, "{:?}", unknown);
    }
}

#[test]
fn style_names_are_lenient() {
    let engine = engine();
    let bytes = png(&photo(40, 30, 3));

    assert_eq!(
        engine.transform(&bytes, " Pencil-Sketch ").unwrap(),
        engine.transform(&bytes, "pencil_sketch").unwrap()
    );
}

#[test]
fn resizer_is_idempotent() {
    let resizer = Resizer::new(1100);
    let once = resizer.fit(photo(2000, 1500, 4));
    let twice = resizer.fit(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn large_input_is_bounded_before_any_pipeline() {
    let grid = photo(2000, 1500, 5);
    assert_eq!(Resizer::new(1100).fit(grid.clone()).dimensions(), (1100, 825));

    let out = engine().transform(&png(&grid), "pencil_sketch").unwrap();
    assert_eq!(decode(out.as_bytes()).unwrap().dimensions(), (1100, 825));
}

#[test]
fn pencil_sketch_channels_are_identical() {
    let out = engine().transform(&png(&photo(80, 60, 6)), "pencil_sketch").unwrap();
    let grid = decode(out.as_bytes()).unwrap();

    for pixel in grid.as_image().pixels() {
        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[1], pixel[2]);
    }
}

#[test]
fn encode_decode_preserves_shape() {
    let grid = photo(33, 17, 7);
    let decoded = decode(&png(&grid)).unwrap();

    assert_eq!(decoded.dimensions(), (33, 17));
    assert_eq!(decoded.channels(), 3);
    assert_eq!(decoded, grid);
}

#[test]
fn upload_size_limit_is_inclusive() {
    let bytes = png(&photo(30, 30, 8));

    let mut config = Config::default();
    config.limits.max_upload_bytes = bytes.len();
    assert!(TransformEngine::new(config.clone()).unwrap().transform(&bytes, "anime").is_ok());

    config.limits.max_upload_bytes = bytes.len() - 1;
    let err = TransformEngine::new(config).unwrap().transform(&bytes, "anime").unwrap_err();
    assert!(matches!(err, StylizerError::Image(ImageError::FileTooLarge { .. })));
}

#[test]
fn empty_input_fails_to_decode_for_every_style() {
    let engine = engine();
    for style in StyleId::ALL {
        let err = engine.transform(&[], style.as_str()).unwrap_err();
        assert!(
            matches!(err, StylizerError::Image(ImageError::DecodeFailed { .. })),
            "{}: {:?}",
            style,
            err
        );
        assert!(err.is_client_error());
    }
}

#[test]
fn oil_painting_keeps_flat_red() {
    let red = PixelGrid::new_filled(100, 100, [255, 0, 0]).unwrap();
    let out = engine().transform(&png(&red), "oil_painting").unwrap();
    let grid = decode(out.as_bytes()).unwrap();

    for pixel in grid.as_image().pixels() {
        assert!(pixel[0] >= 247, "{:?}", pixel);
        assert!(pixel[1] <= 8 && pixel[2] <= 8, "{:?}", pixel);
    }
}

#[test]
fn jpeg_input_is_accepted() {
    let grid = photo(48, 32, 9);
    let mut jpeg = Vec::new();
    grid.as_image()
        .write_to(&mut std::io::Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .unwrap();

    let out = engine().transform(&jpeg, "modern_art").unwrap();
    assert_eq!(decode(out.as_bytes()).unwrap().dimensions(), (48, 32));
}
