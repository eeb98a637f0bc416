use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{Rgb, RgbImage};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use photo_stylizer::{
    config::Config,
    raster::{encode_png, PixelGrid},
    styles::{StyleConfig, StyleId, StyleRegistry},
    transform::TransformEngine,
};

fn noisy_photo(width: u32, height: u32) -> PixelGrid {
    let mut rng = SmallRng::seed_from_u64(42);
    let image = RgbImage::from_fn(width, height, |x, y| {
        let shade = ((x + y) % 256) as u8;
        Rgb([shade, rng.gen(), 255 - shade])
    });
    PixelGrid::new(image).expect("non-empty image")
}

fn bench_styles(c: &mut Criterion) {
    let registry = StyleRegistry::new();
    let grid = noisy_photo(320, 240);
    let config = StyleConfig::default();

    let mut group = c.benchmark_group("style_320x240");
    for id in StyleId::ALL {
        let style = registry.get_style(id.as_str()).expect("built-in style");
        group.bench_with_input(BenchmarkId::from_parameter(id), &grid, |b, grid| {
            b.iter(|| style.apply_effect(black_box(grid), &config))
        });
    }
    group.finish();
}

fn bench_transform(c: &mut Criterion) {
    let engine = TransformEngine::new(Config::default()).expect("default config");
    let bytes = encode_png(&noisy_photo(1600, 1200)).expect("encode").into_bytes();

    let mut group = c.benchmark_group("transform_1600x1200");
    group.sample_size(10);
    group.bench_function("modern_art", |b| {
        b.iter(|| engine.transform(black_box(&bytes), "modern_art"))
    });
    group.finish();
}

criterion_group!(benches, bench_styles, bench_transform);
criterion_main!(benches);
