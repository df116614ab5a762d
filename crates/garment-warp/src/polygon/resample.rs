//! Arc-length re-parameterization of closed polygons.

use super::{lerp, Polygon};

/// Resample a closed polygon to exactly `n` points spaced at equal arc length.
///
/// Samples start at distance 0 (output point 0 equals input point 0) and walk
/// the closed perimeter, including the edge from the last point back to the
/// first. Every output point is a linear interpolation between two input
/// vertices.
///
/// Degenerate inputs never produce non-finite points:
/// - `n == len` returns the input unchanged,
/// - an empty input or `n == 0` returns an empty polygon,
/// - a zero-length (or non-finite) perimeter returns `n` copies of point 0.
pub fn resample_perimeter(polygon: &Polygon, n: usize) -> Polygon {
    let pts = polygon.points();
    if pts.len() == n {
        return polygon.clone();
    }
    if pts.is_empty() || n == 0 {
        return Polygon::default();
    }

    let seg_lengths = polygon.edge_lengths();
    let perimeter: f64 = seg_lengths.iter().sum();
    if !perimeter.is_finite() || perimeter <= 0.0 {
        return Polygon::new(vec![pts[0]; n]);
    }

    // cumulative[i] = arc length at the start of edge i
    let mut cumulative = Vec::with_capacity(seg_lengths.len());
    let mut acc = 0.0;
    for &len in &seg_lengths {
        cumulative.push(acc);
        acc += len;
    }

    let step = perimeter / n as f64;
    let last_edge = seg_lengths.len() - 1;
    let out = (0..n)
        .map(|k| {
            let d = k as f64 * step;
            let idx = cumulative
                .partition_point(|&c| c <= d)
                .saturating_sub(1)
                .min(last_edge);
            let start = pts[idx];
            let end = pts[(idx + 1) % pts.len()];
            let len = seg_lengths[idx];
            let t = if len > 0.0 {
                ((d - cumulative[idx]) / len).clamp(0.0, 1.0)
            } else {
                0.0
            };
            lerp(start, end, t)
        })
        .collect();
    Polygon::new(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn output_count_matches_request_for_random_polygons() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let len = rng.gen_range(1..40);
            let pts: Vec<[f64; 2]> = (0..len)
                .map(|_| [rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0)])
                .collect();
            let poly = Polygon::new(pts);
            let n = rng.gen_range(1..120);
            let out = resample_perimeter(&poly, n);
            assert_eq!(out.len(), n);
            assert!(out.is_finite());
        }
    }

    #[test]
    fn same_count_is_identity() {
        let poly = Polygon::new(vec![[0.0, 0.0], [7.5, 1.0], [3.0, 9.0]]);
        assert_eq!(resample_perimeter(&poly, 3), poly);
    }

    #[test]
    fn repeated_resampling_is_deterministic() {
        let poly = Polygon::new(vec![[0.0, 0.0], [40.0, 3.0], [35.0, 30.0], [2.0, 25.0]]);
        let a = resample_perimeter(&poly, 17);
        let b = resample_perimeter(&poly, 17);
        assert_eq!(a, b);
    }

    #[test]
    fn coincident_points_tile_first_point() {
        let poly = Polygon::new(vec![[4.0, 4.0]; 3]);
        let out = resample_perimeter(&poly, 5);
        assert_eq!(out.points(), &[[4.0, 4.0]; 5]);
    }

    #[test]
    fn single_point_is_tiled() {
        let poly = Polygon::new(vec![[1.0, 2.0]]);
        let out = resample_perimeter(&poly, 4);
        assert_eq!(out.points(), &[[1.0, 2.0]; 4]);
    }

    #[test]
    fn square_samples_are_evenly_spaced_from_start() {
        let sq = Polygon::rectangle(0.0, 0.0, 10.0, 10.0);
        let out = resample_perimeter(&sq, 8);
        let expected = [
            [0.0, 0.0],
            [5.0, 0.0],
            [10.0, 0.0],
            [10.0, 5.0],
            [10.0, 10.0],
            [5.0, 10.0],
            [0.0, 10.0],
            [0.0, 5.0],
        ];
        for (got, want) in out.points().iter().zip(expected.iter()) {
            assert_abs_diff_eq!(got[0], want[0], epsilon = 1e-9);
            assert_abs_diff_eq!(got[1], want[1], epsilon = 1e-9);
        }
    }

    #[test]
    fn downsampling_keeps_winding() {
        let sq = Polygon::rectangle(0.0, 0.0, 10.0, 10.0);
        let dense = resample_perimeter(&sq, 40);
        assert!(dense.signed_area() > 0.0);
        let sparse = resample_perimeter(&dense, 6);
        assert!(sparse.signed_area() > 0.0);
    }

    #[test]
    fn zero_target_is_empty() {
        let sq = Polygon::rectangle(0.0, 0.0, 1.0, 1.0);
        assert!(resample_perimeter(&sq, 0).is_empty());
        assert!(resample_perimeter(&Polygon::default(), 3).is_empty());
    }
}
