//! Shared synthetic images and landmark sets for unit tests.

use image::{Rgba, RgbaImage};

use crate::landmarks::{Joint, LandmarkSet};

/// Transparent `w`×`h` canvas with an opaque axis-aligned square.
pub(crate) fn opaque_square(
    w: u32,
    h: u32,
    origin: [u32; 2],
    side: u32,
    rgb: [u8; 3],
) -> RgbaImage {
    let mut img = RgbaImage::new(w, h);
    for y in origin[1]..(origin[1] + side).min(h) {
        for x in origin[0]..(origin[0] + side).min(w) {
            img.put_pixel(x, y, Rgba([rgb[0], rgb[1], rgb[2], 255]));
        }
    }
    img
}

/// Fully opaque image whose red channel ramps with x and green with y.
pub(crate) fn gradient_rgba(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        let r = (x * 255 / w.max(1)) as u8;
        let g = (y * 255 / h.max(1)) as u8;
        Rgba([r, g, 128, 255])
    })
}

/// Inclusive bounding box `[x0, y0, x1, y1]` of pixels with non-zero alpha.
pub(crate) fn alpha_bbox(img: &RgbaImage) -> Option<[u32; 4]> {
    let mut bbox: Option<[u32; 4]> = None;
    for (x, y, p) in img.enumerate_pixels() {
        if p[3] == 0 {
            continue;
        }
        bbox = Some(match bbox {
            None => [x, y, x, y],
            Some(b) => [b[0].min(x), b[1].min(y), b[2].max(x), b[3].max(y)],
        });
    }
    bbox
}

/// Number of pixels with non-zero alpha.
pub(crate) fn alpha_coverage(img: &RgbaImage) -> usize {
    img.pixels().filter(|p| p[3] > 0).count()
}

/// Upright body with arms hanging down, in a 400×600 photo.
pub(crate) fn upright_body() -> LandmarkSet {
    LandmarkSet::new([400, 600])
        .with(Joint::Nose, [200.0, 140.0])
        .with(Joint::LeftShoulder, [140.0, 200.0])
        .with(Joint::RightShoulder, [260.0, 200.0])
        .with(Joint::LeftElbow, [125.0, 290.0])
        .with(Joint::RightElbow, [275.0, 290.0])
        .with(Joint::LeftHip, [160.0, 380.0])
        .with(Joint::RightHip, [240.0, 380.0])
        .with(Joint::LeftKnee, [158.0, 470.0])
        .with(Joint::RightKnee, [242.0, 470.0])
        .with(Joint::LeftAnkle, [156.0, 560.0])
        .with(Joint::RightAnkle, [244.0, 560.0])
}
