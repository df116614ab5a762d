use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::contour::OutlineSource;
use crate::polygon::Polygon;
use crate::warp::{SkippedTriangle, WarpStats};

/// Why the whole mesh was abandoned in favour of a transparent canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegenerateGeometry {
    /// A polygon has fewer than three points.
    TooFewPoints { got: usize },
    /// A polygon's perimeter is zero (all points coincide).
    ZeroPerimeter,
    /// A polygon contains NaN or infinite coordinates.
    NonFinitePoints,
    /// Triangulation of the destination produced no usable triangle.
    NoTriangles,
}

impl DegenerateGeometry {
    pub const fn code(self) -> &'static str {
        match self {
            Self::TooFewPoints { .. } => "too_few_points",
            Self::ZeroPerimeter => "zero_perimeter",
            Self::NonFinitePoints => "non_finite_points",
            Self::NoTriangles => "no_triangles",
        }
    }
}

impl std::fmt::Display for DegenerateGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewPoints { got } => write!(f, "{} ({})", self.code(), got),
            _ => f.write_str(self.code()),
        }
    }
}

/// What happened during one warp, for logging and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarpDiagnostics {
    /// Whether the source outline was traced or fell back to the rectangle.
    pub outline_source: OutlineSource,
    /// Points in each polygon of the correspondence pair.
    pub n_points: usize,
    /// The source needed an explicit resample after extraction.
    pub source_resampled: bool,
    /// The source was rotated/reversed to match the destination's start.
    pub start_aligned: bool,
    pub triangles_total: usize,
    pub triangles_warped: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped: Vec<SkippedTriangle>,
    /// Set when the mesh was abandoned; the canvas is then fully transparent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degenerate: Option<DegenerateGeometry>,
}

impl WarpDiagnostics {
    pub(crate) fn new(outline_source: OutlineSource, n_points: usize) -> Self {
        Self {
            outline_source,
            n_points,
            source_resampled: false,
            start_aligned: false,
            triangles_total: 0,
            triangles_warped: 0,
            skipped: Vec::new(),
            degenerate: None,
        }
    }

    pub(crate) fn record_stats(&mut self, stats: WarpStats) {
        self.triangles_total = stats.triangles_total;
        self.triangles_warped = stats.triangles_warped;
        self.skipped = stats.skipped;
    }
}

/// Output of one garment warp.
#[derive(Debug, Clone)]
pub struct WarpResult {
    /// RGBA canvas the size of the photograph, transparent outside the garment.
    pub canvas: RgbaImage,
    /// Source outline in garment-image pixels, after resampling and alignment.
    pub source: Polygon,
    /// Destination outline in photograph pixels.
    pub destination: Polygon,
    /// Mesh triangles indexing both polygons.
    pub triangles: Vec<[usize; 3]>,
    pub diagnostics: WarpDiagnostics,
}

impl WarpResult {
    /// `true` when the mesh was abandoned and the canvas is empty.
    pub fn is_degenerate(&self) -> bool {
        self.diagnostics.degenerate.is_some()
    }
}
