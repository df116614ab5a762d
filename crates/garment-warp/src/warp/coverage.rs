//! Triangle coverage masks.

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;

const SOLID: Luma<u8> = Luma([255]);

/// Solid `w`×`h` mask of a triangle given in mask-local coordinates.
///
/// Triangles that collapse to a segment or a point after rounding still mark
/// the pixels they touch.
pub(crate) fn triangle_mask(w: u32, h: u32, tri: &[[f64; 2]; 3]) -> GrayImage {
    let mut mask = GrayImage::new(w, h);
    let mut pts: Vec<Point<i32>> = Vec::with_capacity(3);
    for p in tri {
        let q = Point::new(p[0].round() as i32, p[1].round() as i32);
        if !pts.contains(&q) {
            pts.push(q);
        }
    }

    match pts.as_slice() {
        [_, _, _] => draw_polygon_mut(&mut mask, &pts, SOLID),
        [a, b] => draw_line_segment_mut(
            &mut mask,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            SOLID,
        ),
        [a] => {
            if a.x >= 0 && a.y >= 0 && (a.x as u32) < w && (a.y as u32) < h {
                mask.put_pixel(a.x as u32, a.y as u32, SOLID);
            }
        }
        _ => {}
    }
    mask
}

/// Square dilation by `dilate_px` followed by a Gaussian blur of `sigma`.
///
/// The result never drops below `mask`: softening only feathers outward, so
/// pixels inside the hard coverage stay fully opaque.
pub(crate) fn soften(mask: GrayImage, dilate_px: u8, sigma: f32) -> GrayImage {
    if !(sigma > 0.0 && sigma.is_finite()) {
        return grow(mask, dilate_px);
    }
    let mut soft = imageproc::filter::gaussian_blur_f32(&grow(mask.clone(), dilate_px), sigma);
    for (s, h) in soft.pixels_mut().zip(mask.pixels()) {
        s[0] = s[0].max(h[0]);
    }
    soft
}

fn grow(mask: GrayImage, dilate_px: u8) -> GrayImage {
    if dilate_px > 0 {
        imageproc::morphology::dilate(&mask, Norm::LInf, dilate_px)
    } else {
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(mask: &GrayImage) -> usize {
        mask.pixels().filter(|p| p[0] > 0).count()
    }

    #[test]
    fn fills_interior_only() {
        let mask = triangle_mask(40, 40, &[[5.0, 5.0], [30.0, 5.0], [5.0, 30.0]]);
        assert_eq!(mask.get_pixel(10, 10)[0], 255);
        assert_eq!(mask.get_pixel(35, 35)[0], 0);
        assert_eq!(mask.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn collapsed_triangles_do_not_panic() {
        let point = triangle_mask(10, 10, &[[4.2, 4.4], [4.0, 4.0], [3.9, 4.1]]);
        assert_eq!(count(&point), 1);
        let segment = triangle_mask(10, 10, &[[1.0, 1.0], [8.0, 1.0], [8.2, 1.1]]);
        assert!(count(&segment) >= 8);
        let off = triangle_mask(10, 10, &[[-50.0, -50.0], [-50.0, -50.0], [-50.0, -50.0]]);
        assert_eq!(count(&off), 0);
    }

    #[test]
    fn soften_spreads_but_stays_local() {
        let mask = triangle_mask(40, 40, &[[15.0, 15.0], [25.0, 15.0], [15.0, 25.0]]);
        let hard = count(&mask);
        let soft = soften(mask, 1, 1.0);
        assert!(count(&soft) > hard);
        assert_eq!(soft.get_pixel(0, 0)[0], 0);
        assert_eq!(soft.get_pixel(39, 39)[0], 0);
    }

    #[test]
    fn soften_keeps_hard_coverage_opaque() {
        let mask = triangle_mask(40, 40, &[[5.0, 5.0], [34.0, 5.0], [5.0, 34.0]]);
        let soft = soften(mask.clone(), 1, 2.0);
        for (s, h) in soft.pixels().zip(mask.pixels()) {
            assert!(s[0] >= h[0]);
        }
        assert_eq!(soft.get_pixel(5, 5)[0], 255);
    }

    #[test]
    fn soften_disabled_is_identity() {
        let mask = triangle_mask(20, 20, &[[2.0, 2.0], [17.0, 3.0], [9.0, 16.0]]);
        assert_eq!(soften(mask.clone(), 0, 0.0), mask);
    }
}
