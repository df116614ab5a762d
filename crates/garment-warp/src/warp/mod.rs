//! Triangle Warper/Compositor.
//!
//! Each destination triangle is filled with the affine-warped content of its
//! source triangle and blended into a transparent canvas through a softened
//! coverage mask. Individual triangles that cannot be warped are skipped and
//! reported; they never abort the canvas.

mod affine;
mod composite;
mod coverage;
mod sample;

pub use affine::AffineTransform;
pub use composite::warp_triangles;

use serde::{Deserialize, Serialize};

/// Source resampling kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    Bilinear,
    /// Keys cubic convolution, `a = -0.5`.
    #[default]
    Bicubic,
}

/// How overlapping triangle patches are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendStrategy {
    /// Soften every triangle's mask and blend patches one after another.
    #[default]
    PerTriangle,
    /// Rasterize all triangles into one coverage buffer (first triangle wins
    /// on overlap) and soften the union once.
    SharedCoverage,
}

/// Compositing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    /// Margin added around each triangle's bounding rectangle.
    pub padding_px: u32,
    /// Square dilation radius applied to the coverage mask (0 disables).
    pub dilate_px: u8,
    /// Gaussian sigma applied after dilation (`<= 0` disables).
    pub blur_sigma: f32,
    pub interpolation: Interpolation,
    pub strategy: BlendStrategy,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            padding_px: 3,
            dilate_px: 1,
            blur_sigma: 1.0,
            interpolation: Interpolation::Bicubic,
            strategy: BlendStrategy::PerTriangle,
        }
    }
}

/// Why a single triangle was not composited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriangleSkip {
    /// A vertex index is out of range for the source or destination polygon.
    IndexOutOfRange,
    /// Source or destination triangle has (near) zero area.
    DegenerateTriangle,
    /// The padded source rectangle does not overlap the garment image.
    EmptySourceRegion,
    /// The padded destination rectangle lies entirely off the canvas.
    OutsideCanvas,
}

impl TriangleSkip {
    pub const fn code(self) -> &'static str {
        match self {
            Self::IndexOutOfRange => "index_out_of_range",
            Self::DegenerateTriangle => "degenerate_triangle",
            Self::EmptySourceRegion => "empty_source_region",
            Self::OutsideCanvas => "outside_canvas",
        }
    }
}

impl std::fmt::Display for TriangleSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A skipped triangle: its position in the mesh and the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTriangle {
    pub index: usize,
    pub triangle: [usize; 3],
    pub reason: TriangleSkip,
}

/// Per-call compositing counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarpStats {
    pub triangles_total: usize,
    pub triangles_warped: usize,
    pub skipped: Vec<SkippedTriangle>,
}

impl WarpStats {
    /// Number of triangles skipped for `reason`.
    pub fn skipped_for(&self, reason: TriangleSkip) -> usize {
        self.skipped.iter().filter(|s| s.reason == reason).count()
    }
}

/// Integer pixel rectangle; `x`, `y` may be negative before clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    /// Bounding rectangle of `pts` grown by `pad` pixels on every side.
    pub fn around(pts: &[[f64; 2]], pad: u32) -> Option<Self> {
        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];
        for p in pts {
            if !(p[0].is_finite() && p[1].is_finite()) {
                return None;
            }
            for k in 0..2 {
                min[k] = min[k].min(p[k]);
                max[k] = max[k].max(p[k]);
            }
        }
        if min[0] > max[0] {
            return None;
        }
        let pad = pad as i64;
        let x0 = (min[0].floor() as i64).saturating_sub(pad);
        let y0 = (min[1].floor() as i64).saturating_sub(pad);
        let x1 = (max[0].ceil() as i64).saturating_add(pad);
        let y1 = (max[1].ceil() as i64).saturating_add(pad);
        let span = |lo: i64, hi: i64| {
            hi.saturating_sub(lo)
                .saturating_add(1)
                .clamp(0, u32::MAX as i64) as u32
        };
        Some(Self {
            x: x0,
            y: y0,
            w: span(x0, x1),
            h: span(y0, y1),
        })
    }

    /// Intersection with `[0, width) × [0, height)`.
    pub fn clip(&self, width: u32, height: u32) -> Option<Self> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = self.x.saturating_add(self.w as i64).min(width as i64);
        let y1 = self.y.saturating_add(self.h as i64).min(height as i64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self {
            x: x0,
            y: y0,
            w: (x1 - x0) as u32,
            h: (y1 - y0) as u32,
        })
    }

    /// `pts` translated into rectangle-local coordinates.
    pub fn local(&self, pts: &[[f64; 2]; 3]) -> [[f64; 2]; 3] {
        let (ox, oy) = (self.x as f64, self.y as f64);
        pts.map(|p| [p[0] - ox, p[1] - oy])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_pads_and_rounds_outward() {
        let r = PixelRect::around(&[[10.2, 5.7], [20.0, 9.1]], 3).unwrap();
        assert_eq!(r, PixelRect { x: 7, y: 2, w: 17, h: 12 });
    }

    #[test]
    fn rect_clips_to_canvas() {
        let r = PixelRect { x: -5, y: 90, w: 20, h: 20 };
        assert_eq!(r.clip(100, 100), Some(PixelRect { x: 0, y: 90, w: 15, h: 10 }));
        assert_eq!(r.clip(100, 80), None);
    }

    #[test]
    fn non_finite_points_have_no_rect() {
        assert!(PixelRect::around(&[[0.0, 0.0], [f64::NAN, 1.0]], 1).is_none());
        assert!(PixelRect::around(&[], 1).is_none());
    }

    #[test]
    fn config_defaults_match_partial_json() {
        let cfg: CompositeConfig =
            serde_json::from_str(r#"{"strategy":"shared_coverage"}"#).unwrap();
        assert_eq!(cfg.strategy, BlendStrategy::SharedCoverage);
        assert_eq!(cfg.padding_px, 3);
        assert_eq!(cfg.interpolation, Interpolation::Bicubic);
    }
}
