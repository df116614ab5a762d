use std::f64::consts::PI;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use garment_warp::{
    extract_source_outline, resample_perimeter, triangulate, warp_triangles, BlendStrategy,
    CompositeConfig, ContourConfig, GarmentCategory, GarmentWarper, Joint, LandmarkSet, Polygon,
};
use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Opaque elliptical blob on a transparent background with a noisy rim.
fn make_garment(width: u32, height: u32, seed: u64) -> RgbaImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
    let (rx, ry) = (width as f64 * 0.4, height as f64 * 0.45);
    let mut img = RgbaImage::new(width, height);
    for (x, y, p) in img.enumerate_pixels_mut() {
        let dx = (x as f64 - cx) / rx;
        let dy = (y as f64 - cy) / ry;
        let r = dx * dx + dy * dy + rng.gen_range(-0.02..0.02);
        if r <= 1.0 {
            *p = Rgba([(x % 256) as u8, (y % 256) as u8, 140, 255]);
        }
    }
    img
}

fn body() -> LandmarkSet {
    LandmarkSet::new([768, 1024])
        .with(Joint::Nose, [384.0, 180.0])
        .with(Joint::LeftShoulder, [270.0, 300.0])
        .with(Joint::RightShoulder, [498.0, 300.0])
        .with(Joint::LeftElbow, [240.0, 450.0])
        .with(Joint::RightElbow, [528.0, 450.0])
        .with(Joint::LeftHip, [310.0, 600.0])
        .with(Joint::RightHip, [458.0, 600.0])
}

fn noisy_circle(n: usize, seed: u64) -> Polygon {
    let mut rng = StdRng::seed_from_u64(seed);
    Polygon::new(
        (0..n)
            .map(|i| {
                let t = 2.0 * PI * i as f64 / n as f64;
                let r = 200.0 + rng.gen_range(-15.0..15.0);
                [400.0 + r * t.cos(), 400.0 + r * t.sin()]
            })
            .collect(),
    )
}

fn bench_resample(c: &mut Criterion) {
    let poly = noisy_circle(2_000, 1);
    c.bench_function("resample_2000_to_17", |b| {
        b.iter(|| black_box(resample_perimeter(black_box(&poly), 17)))
    });
}

fn bench_triangulate(c: &mut Criterion) {
    let small = noisy_circle(17, 2);
    let large = noisy_circle(256, 3);
    c.bench_function("triangulate_17", |b| {
        b.iter(|| black_box(triangulate(black_box(small.points()))))
    });
    c.bench_function("triangulate_256", |b| {
        b.iter(|| black_box(triangulate(black_box(large.points()))))
    });
}

fn bench_outline(c: &mut Criterion) {
    let garment = make_garment(512, 640, 4);
    let config = ContourConfig::default();
    c.bench_function("outline_512x640", |b| {
        b.iter(|| black_box(extract_source_outline(black_box(&garment), Some(17), &config)))
    });
}

fn bench_warp(c: &mut Criterion) {
    let garment = make_garment(512, 640, 5);
    let src = resample_perimeter(&noisy_circle(64, 6), 17);
    let dst = noisy_circle(17, 7);
    let triangles = triangulate(dst.points());

    for (name, strategy) in [
        ("warp_17pt_per_triangle", BlendStrategy::PerTriangle),
        ("warp_17pt_shared_coverage", BlendStrategy::SharedCoverage),
    ] {
        let config = CompositeConfig {
            strategy,
            ..CompositeConfig::default()
        };
        c.bench_function(name, |b| {
            b.iter(|| {
                black_box(warp_triangles(
                    &src,
                    &dst,
                    black_box(&triangles),
                    &garment,
                    [800, 800],
                    &config,
                ))
            })
        });
    }
}

fn bench_end_to_end(c: &mut Criterion) {
    let garment = make_garment(512, 640, 8);
    let landmarks = body();
    let warper = GarmentWarper::new();
    c.bench_function("warp_shirt_768x1024", |b| {
        b.iter(|| {
            black_box(warper.warp(
                black_box(&garment),
                &landmarks,
                GarmentCategory::Shirt,
                [768, 1024],
            ))
        })
    });
}

criterion_group!(
    hotpaths,
    bench_resample,
    bench_triangulate,
    bench_outline,
    bench_warp,
    bench_end_to_end
);
criterion_main!(hotpaths);
