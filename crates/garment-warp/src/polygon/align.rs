//! Start-point and winding alignment between a source and a destination loop.
//!
//! Index `i` of the source is only meaningful against index `i` of the
//! destination when both loops run in the same direction and start at
//! corresponding locations. The two polygons live in different pixel frames,
//! so nearness is measured after mapping each into its own unit bounding box.

use super::{Bounds, Polygon};

/// Rotate (and if needed reverse) `source` so it runs in the same direction
/// as `destination` and starts at the point nearest to destination point 0.
///
/// Cardinality is preserved; an empty input is returned unchanged.
pub fn align_start_point(source: &Polygon, destination: &Polygon) -> Polygon {
    let (Some(src_bounds), Some(dst_bounds), Some(anchor)) =
        (source.bounds(), destination.bounds(), destination.get(0))
    else {
        return source.clone();
    };

    let src_area = source.signed_area();
    let dst_area = destination.signed_area();
    let oriented = if src_area * dst_area < 0.0 {
        source.reversed()
    } else {
        source.clone()
    };

    let anchor = normalize(anchor, &dst_bounds);
    let mut best = 0usize;
    let mut best_d2 = f64::INFINITY;
    for (i, &p) in oriented.points().iter().enumerate() {
        let q = normalize(p, &src_bounds);
        let d2 = (q[0] - anchor[0]).powi(2) + (q[1] - anchor[1]).powi(2);
        if d2 < best_d2 {
            best_d2 = d2;
            best = i;
        }
    }
    oriented.rotated(best)
}

fn normalize(p: [f64; 2], b: &Bounds) -> [f64; 2] {
    let w = b.width();
    let h = b.height();
    [
        if w > 0.0 { (p[0] - b.min[0]) / w } else { 0.5 },
        if h > 0.0 { (p[1] - b.min[1]) / h } else { 0.5 },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_to_matching_corner() {
        // destination starts at its bottom-right corner
        let dst = Polygon::new(vec![
            [300.0, 400.0],
            [100.0, 400.0],
            [100.0, 200.0],
            [300.0, 200.0],
        ]);
        let src = Polygon::rectangle(0.0, 0.0, 50.0, 50.0);
        let aligned = align_start_point(&src, &dst);
        assert_eq!(aligned.len(), 4);
        assert_eq!(aligned.get(0), Some([50.0, 50.0]));
        assert!(aligned.signed_area() * dst.signed_area() > 0.0);
    }

    #[test]
    fn reverses_opposite_winding() {
        let dst = Polygon::rectangle(0.0, 0.0, 10.0, 10.0);
        let src = Polygon::rectangle(0.0, 0.0, 4.0, 4.0).reversed();
        let aligned = align_start_point(&src, &dst);
        assert!(aligned.signed_area() > 0.0);
        assert_eq!(aligned.get(0), Some([0.0, 0.0]));
        assert_eq!(aligned.get(1), Some([4.0, 0.0]));
    }

    #[test]
    fn empty_inputs_pass_through() {
        let src = Polygon::rectangle(0.0, 0.0, 4.0, 4.0);
        assert_eq!(align_start_point(&src, &Polygon::default()), src);
        assert!(align_start_point(&Polygon::default(), &src).is_empty());
    }
}
