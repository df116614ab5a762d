//! Closed 2-D polygons and the perimeter operations shared by every stage.
//!
//! A [`Polygon`] is an ordered point sequence that is implicitly closed: the
//! last point connects back to the first. Self-intersection is tolerated and
//! never corrected.

mod align;
mod resample;

pub use align::align_start_point;
pub use resample::resample_perimeter;

use serde::{Deserialize, Serialize};

/// Ordered, implicitly closed point sequence in pixel coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    points: Vec<[f64; 2]>,
}

impl Polygon {
    /// Wrap an ordered point sequence.
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        Self { points }
    }

    /// Axis-aligned rectangle traced clockwise (in y-down image space) from the
    /// top-left corner.
    pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]])
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    pub fn into_points(self) -> Vec<[f64; 2]> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<[f64; 2]> {
        self.points.get(index).copied()
    }

    /// `true` when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.points
            .iter()
            .all(|p| p[0].is_finite() && p[1].is_finite())
    }

    /// Edge lengths of the closed loop; entry `i` is the edge `i -> i+1`
    /// (the last entry is the closing edge back to point 0).
    pub fn edge_lengths(&self) -> Vec<f64> {
        let n = self.points.len();
        (0..n)
            .map(|i| distance(self.points[i], self.points[(i + 1) % n]))
            .collect()
    }

    /// Length of the closed perimeter, including the closing edge.
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.edge_lengths().iter().sum()
    }

    /// Shoelace signed area. Positive for counter-clockwise loops in a y-up
    /// frame, i.e. clockwise as seen in y-down image coordinates.
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }

    /// Bounding box of all points, `None` for an empty polygon.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.points)
    }

    /// Same loop, starting at point `k` instead of point 0.
    pub fn rotated(&self, k: usize) -> Self {
        let mut points = self.points.clone();
        if !points.is_empty() {
            let k = k % points.len();
            points.rotate_left(k);
        }
        Self { points }
    }

    /// Same loop traversed in the opposite direction, keeping point 0 first.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        if points.len() > 1 {
            points[1..].reverse();
        }
        Self { points }
    }
}

impl From<Vec<[f64; 2]>> for Polygon {
    fn from(points: Vec<[f64; 2]>) -> Self {
        Self::new(points)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Bounds {
    pub fn from_points(points: &[[f64; 2]]) -> Option<Self> {
        let first = *points.first()?;
        let mut out = Self {
            min: first,
            max: first,
        };
        for p in &points[1..] {
            out.min[0] = out.min[0].min(p[0]);
            out.min[1] = out.min[1].min(p[1]);
            out.max[0] = out.max[0].max(p[0]);
            out.max[1] = out.max[1].max(p[1]);
        }
        Some(out)
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    /// Grow the box by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: [self.min[0] - margin, self.min[1] - margin],
            max: [self.max[0] + margin, self.max[1] + margin],
        }
    }

    pub fn contains(&self, p: [f64; 2]) -> bool {
        p[0] >= self.min[0] && p[0] <= self.max[0] && p[1] >= self.min[1] && p[1] <= self.max[1]
    }

    pub fn clamp(&self, p: [f64; 2]) -> [f64; 2] {
        [
            p[0].clamp(self.min[0], self.max[0]),
            p[1].clamp(self.min[1], self.max[1]),
        ]
    }
}

pub(crate) fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    (b[0] - a[0]).hypot(b[1] - a[1])
}

pub(crate) fn lerp(a: [f64; 2], b: [f64; 2], t: f64) -> [f64; 2] {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]
}

pub(crate) fn signed_area(points: &[[f64; 2]]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        acc += a[0] * b[1] - b[0] * a[1];
    }
    0.5 * acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perimeter_includes_closing_edge() {
        let sq = Polygon::rectangle(0.0, 0.0, 10.0, 10.0);
        assert_relative_eq!(sq.perimeter(), 40.0);
        let open_pair = Polygon::new(vec![[0.0, 0.0], [3.0, 4.0]]);
        assert_relative_eq!(open_pair.perimeter(), 10.0);
    }

    #[test]
    fn signed_area_sign_follows_winding() {
        let sq = Polygon::rectangle(0.0, 0.0, 2.0, 2.0);
        assert_relative_eq!(sq.signed_area(), 4.0);
        assert_relative_eq!(sq.reversed().signed_area(), -4.0);
    }

    #[test]
    fn reversed_keeps_start_point() {
        let sq = Polygon::rectangle(0.0, 0.0, 1.0, 1.0);
        let r = sq.reversed();
        assert_eq!(r.get(0), sq.get(0));
        assert_eq!(r.get(1), sq.get(3));
    }

    #[test]
    fn rotated_wraps_index() {
        let sq = Polygon::rectangle(0.0, 0.0, 1.0, 1.0);
        assert_eq!(sq.rotated(5).get(0), sq.get(1));
        assert!(Polygon::default().rotated(3).is_empty());
    }

    #[test]
    fn bounds_expand_and_clamp() {
        let b = Bounds::from_points(&[[1.0, 2.0], [5.0, -1.0]]).unwrap();
        assert_eq!(b.min, [1.0, -1.0]);
        assert_eq!(b.max, [5.0, 2.0]);
        let e = b.expanded(1.0);
        assert!(e.contains([0.0, 3.0]));
        assert_eq!(b.clamp([10.0, 10.0]), [5.0, 2.0]);
        assert!(Bounds::from_points(&[]).is_none());
    }
}
