use nalgebra::{Matrix2x3, Matrix3};
use serde::{Deserialize, Serialize};

/// Triangles with less than this area (px²) have no affine map.
const MIN_TRIANGLE_AREA: f64 = 1e-9;

/// 2×3 affine map `p' = A·p + t`, stored row-major.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub m: [[f64; 3]; 2],
}

impl AffineTransform {
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    };

    /// The unique affine map sending `src[i]` to `dst[i]` for `i = 0..3`.
    ///
    /// Returns `None` when `src` is (near) collinear.
    pub fn from_triangles(src: &[[f64; 2]; 3], dst: &[[f64; 2]; 3]) -> Option<Self> {
        let area2 = (src[1][0] - src[0][0]) * (src[2][1] - src[0][1])
            - (src[1][1] - src[0][1]) * (src[2][0] - src[0][0]);
        if !area2.is_finite() || area2.abs() * 0.5 < MIN_TRIANGLE_AREA {
            return None;
        }

        let s = Matrix3::new(
            src[0][0], src[1][0], src[2][0], //
            src[0][1], src[1][1], src[2][1], //
            1.0, 1.0, 1.0,
        );
        let d = Matrix2x3::new(
            dst[0][0], dst[1][0], dst[2][0], //
            dst[0][1], dst[1][1], dst[2][1],
        );
        let m = d * s.try_inverse()?;
        let out = Self {
            m: [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            ],
        };
        out.is_finite().then_some(out)
    }

    #[inline]
    pub fn apply(&self, p: [f64; 2]) -> [f64; 2] {
        let m = &self.m;
        [
            m[0][0] * p[0] + m[0][1] * p[1] + m[0][2],
            m[1][0] * p[0] + m[1][1] * p[1] + m[1][2],
        ]
    }

    /// Inverse map, or `None` when the linear part is singular.
    pub fn inverse(&self) -> Option<Self> {
        let [[a, b, tx], [c, d, ty]] = self.m;
        let det = a * d - b * c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        let (ia, ib, ic, id) = (d / det, -b / det, -c / det, a / det);
        Some(Self {
            m: [
                [ia, ib, -(ia * tx + ib * ty)],
                [ic, id, -(ic * tx + id * ty)],
            ],
        })
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }
}
