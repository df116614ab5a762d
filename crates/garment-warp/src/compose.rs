//! Final compositing onto the user photograph.
//!
//! The warp engine only produces a transparent canvas; placing it over the
//! photograph (and the simple non-mesh overlay used when landmarks are
//! missing) lives here so the CLI and library callers share one blend.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbaImage};
use imageproc::filter::gaussian_blur_f32;

/// Fraction of the photo width the fallback garment spans.
const OVERLAY_WIDTH_FRAC: f64 = 0.5;
/// Vertical torso band `[top, bottom)` of the fallback garment, as photo-height fractions.
const OVERLAY_BAND: [f64; 2] = [0.20, 0.55];

/// Straight-alpha "over" of `overlay` onto `photo`, both anchored at (0, 0).
///
/// Only the overlapping region is blended; the output has `photo`'s size.
/// With `feather_sigma > 0` the overlay alpha is Gaussian-blurred first,
/// which softens the garment's silhouette edge.
pub fn composite_over(photo: &RgbaImage, overlay: &RgbaImage, feather_sigma: f32) -> RgbaImage {
    let mut out = photo.clone();
    let alpha = overlay_alpha(overlay, feather_sigma);
    blend_at(&mut out, overlay, &alpha, [0, 0]);
    out
}

/// Non-mesh fallback: resize `garment` into a centered torso band and paste.
///
/// The band is half the photo wide and spans 20 %–55 % of its height. Used
/// when the mesh path is unavailable (missing landmarks).
pub fn basic_overlay(photo: &RgbaImage, garment: &RgbaImage) -> RgbaImage {
    let (pw, ph) = photo.dimensions();
    let width = (pw as f64 * OVERLAY_WIDTH_FRAC) as u32;
    let top = (ph as f64 * OVERLAY_BAND[0]) as u32;
    let bottom = (ph as f64 * OVERLAY_BAND[1]) as u32;
    let height = bottom.saturating_sub(top);

    if width == 0 || height == 0 || garment.width() == 0 || garment.height() == 0 {
        tracing::warn!(
            photo_w = pw,
            photo_h = ph,
            "basic overlay skipped: empty torso band or garment"
        );
        return photo.clone();
    }

    let resized = imageops::resize(garment, width, height, FilterType::Lanczos3);
    let x = (pw - width) / 2;
    tracing::debug!("basic overlay at ({x}, {top}) size {width}x{height}");

    let mut out = photo.clone();
    let alpha = overlay_alpha(&resized, 0.0);
    blend_at(&mut out, &resized, &alpha, [x, top]);
    out
}

fn overlay_alpha(overlay: &RgbaImage, feather_sigma: f32) -> GrayImage {
    let alpha = GrayImage::from_fn(overlay.width(), overlay.height(), |x, y| {
        Luma([overlay.get_pixel(x, y)[3]])
    });
    if feather_sigma > 0.0 && feather_sigma.is_finite() && !alpha.is_empty() {
        gaussian_blur_f32(&alpha, feather_sigma)
    } else {
        alpha
    }
}

/// Blend `overlay` (with its alpha replaced by `alpha`) into `dst` at `origin`.
fn blend_at(dst: &mut RgbaImage, overlay: &RgbaImage, alpha: &GrayImage, origin: [u32; 2]) {
    let (dw, dh) = dst.dimensions();
    let w = overlay.width().min(dw.saturating_sub(origin[0]));
    let h = overlay.height().min(dh.saturating_sub(origin[1]));

    for y in 0..h {
        for x in 0..w {
            let ao = alpha.get_pixel(x, y)[0] as f64 / 255.0;
            if ao <= 0.0 {
                continue;
            }
            let src = overlay.get_pixel(x, y);
            let px = dst.get_pixel_mut(origin[0] + x, origin[1] + y);
            let ap = px[3] as f64 / 255.0;
            let a_out = ao + ap * (1.0 - ao);
            if a_out <= 0.0 {
                continue;
            }
            for c in 0..3 {
                let v = (src[c] as f64 * ao + px[c] as f64 * ap * (1.0 - ao)) / a_out;
                px[c] = v.round().clamp(0.0, 255.0) as u8;
            }
            px[3] = (a_out * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{alpha_bbox, opaque_square};
    use image::Rgba;

    #[test]
    fn transparent_overlay_leaves_photo_untouched() {
        let photo = RgbaImage::from_pixel(20, 10, Rgba([10, 20, 30, 255]));
        let out = composite_over(&photo, &RgbaImage::new(20, 10), 2.0);
        assert_eq!(out, photo);
    }

    #[test]
    fn opaque_overlay_replaces_pixels() {
        let photo = RgbaImage::from_pixel(20, 20, Rgba([10, 20, 30, 255]));
        let overlay = opaque_square(20, 20, [5, 5], 10, [200, 100, 50]);
        let out = composite_over(&photo, &overlay, 0.0);
        assert_eq!(*out.get_pixel(10, 10), Rgba([200, 100, 50, 255]));
        assert_eq!(*out.get_pixel(1, 1), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn half_alpha_mixes_colors() {
        let photo = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let overlay = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 128]));
        let out = composite_over(&photo, &overlay, 0.0);
        let p = out.get_pixel(2, 2);
        assert!((p[0] as i32 - 128).abs() <= 1);
        assert_eq!(p[3], 255);
    }

    #[test]
    fn feather_softens_edge() {
        let photo = RgbaImage::new(40, 40);
        let overlay = opaque_square(40, 40, [10, 10], 20, [255, 255, 255]);
        let hard = composite_over(&photo, &overlay, 0.0);
        let soft = composite_over(&photo, &overlay, 2.0);
        assert_eq!(hard.get_pixel(9, 20)[3], 0);
        assert_eq!(hard.get_pixel(10, 20)[3], 255);
        assert!(soft.get_pixel(9, 20)[3] > 0);
        assert!(soft.get_pixel(10, 20)[3] < 255);
    }

    #[test]
    fn mismatched_sizes_blend_overlap_only() {
        let photo = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        let overlay = RgbaImage::from_pixel(30, 5, Rgba([255, 0, 0, 255]));
        let out = composite_over(&photo, &overlay, 0.0);
        assert_eq!(out.dimensions(), (10, 10));
        assert_eq!(out.get_pixel(9, 4)[0], 255);
        assert_eq!(out.get_pixel(9, 5)[0], 0);
    }

    #[test]
    fn basic_overlay_fills_torso_band() {
        let photo = RgbaImage::new(200, 100);
        let garment = RgbaImage::from_pixel(37, 53, Rgba([0, 200, 0, 255]));
        let out = basic_overlay(&photo, &garment);
        assert_eq!(out.dimensions(), (200, 100));
        // 50 % width centered: x 50..150; band y 20..55
        assert_eq!(alpha_bbox(&out), Some([50, 20, 149, 54]));
    }

    #[test]
    fn basic_overlay_on_tiny_photo_is_noop() {
        let photo = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255]));
        let garment = RgbaImage::from_pixel(10, 10, Rgba([0, 200, 0, 255]));
        assert_eq!(basic_overlay(&photo, &garment), photo);
    }
}
