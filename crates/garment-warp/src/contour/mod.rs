//! Source Contour Extractor.
//!
//! Turns a segmented garment image into a source [`Polygon`]: binary
//! silhouette, largest outer border, Douglas–Peucker simplification, then
//! optional perimeter resampling. Extraction never fails; when no usable
//! outline exists the image rectangle is returned and the result is marked
//! with [`OutlineSource::BoundingBoxFallback`].

use image::{imageops, DynamicImage, GrayImage, Luma, RgbaImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use serde::{Deserialize, Serialize};

use crate::polygon::{self, resample_perimeter, Polygon};

/// Alpha level above which a pixel counts for [`tight_alpha_bbox`].
const TIGHT_BBOX_ALPHA: u8 = 5;

/// Contour extraction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourConfig {
    /// Pixels with alpha strictly above this value are garment.
    pub alpha_threshold: u8,
    /// Without an alpha channel, pixels with luma at or below this value are
    /// garment (near-white background removal).
    pub near_white_luma: u8,
    /// Simplification tolerance as a fraction of the border length.
    pub simplify_frac: f64,
    /// Lower bound on the simplification tolerance, in pixels.
    pub min_simplify_px: f64,
    /// Simplified outlines with fewer vertices fall back to the rectangle.
    pub min_vertices: usize,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            alpha_threshold: 0,
            near_white_luma: 250,
            simplify_frac: 0.01,
            min_simplify_px: 1.0,
            min_vertices: 4,
        }
    }
}

/// Why the extractor used the bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Image has zero width or height.
    EmptyImage,
    /// No pixel passed the silhouette threshold.
    EmptySilhouette,
    /// The simplified border had too few vertices.
    TooFewVertices { got: usize },
}

impl FallbackReason {
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyImage => "empty_image",
            Self::EmptySilhouette => "empty_silhouette",
            Self::TooFewVertices { .. } => "too_few_vertices",
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewVertices { got } => write!(f, "{} ({})", self.code(), got),
            _ => f.write_str(self.code()),
        }
    }
}

/// Provenance of an extracted outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutlineSource {
    /// Traced from the garment silhouette.
    Contour,
    /// Image rectangle used instead.
    BoundingBoxFallback { reason: FallbackReason },
}

/// Source polygon together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub polygon: Polygon,
    pub source: OutlineSource,
}

impl Outline {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, OutlineSource::BoundingBoxFallback { .. })
    }
}

/// Extract the garment outline from an RGBA image using its alpha channel.
///
/// With `target_points = Some(n)` the polygon is resampled to exactly `n`
/// points (the fallback rectangle included).
pub fn extract_source_outline(
    image: &RgbaImage,
    target_points: Option<usize>,
    config: &ContourConfig,
) -> Outline {
    let mask = alpha_silhouette(image, config.alpha_threshold);
    outline_from_mask(&mask, target_points, config)
}

/// Like [`extract_source_outline`], but images without an alpha channel are
/// segmented by a near-white luma threshold instead.
pub fn extract_source_outline_dynamic(
    image: &DynamicImage,
    target_points: Option<usize>,
    config: &ContourConfig,
) -> Outline {
    let mask = if image.color().has_alpha() {
        alpha_silhouette(&image.to_rgba8(), config.alpha_threshold)
    } else {
        luma_silhouette(image, config.near_white_luma)
    };
    outline_from_mask(&mask, target_points, config)
}

/// RGBA copy of `image` for the warp path. Images without an alpha channel
/// get the near-white luma silhouette as their alpha, so the background stays
/// transparent and [`extract_source_outline`] traces the same border as
/// [`extract_source_outline_dynamic`].
pub fn garment_rgba(image: &DynamicImage, config: &ContourConfig) -> RgbaImage {
    let mut rgba = image.to_rgba8();
    if !image.color().has_alpha() {
        let mask = luma_silhouette(image, config.near_white_luma);
        for (p, m) in rgba.pixels_mut().zip(mask.pixels()) {
            p[3] = m[0];
        }
    }
    rgba
}

/// Binary mask (0 / 255) of pixels whose alpha exceeds `threshold`.
pub fn alpha_silhouette(image: &RgbaImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let a = image.get_pixel(x, y)[3];
        Luma([if a > threshold { 255 } else { 0 }])
    })
}

fn luma_silhouette(image: &DynamicImage, near_white: u8) -> GrayImage {
    let mut gray = image.to_luma8();
    for p in gray.pixels_mut() {
        p[0] = if p[0] <= near_white { 255 } else { 0 };
    }
    gray
}

/// Image-rectangle polygon `[0,0] → [w-1,0] → [w-1,h-1] → [0,h-1]`.
pub fn bounding_rectangle(width: u32, height: u32) -> Polygon {
    Polygon::rectangle(
        0.0,
        0.0,
        width.saturating_sub(1) as f64,
        height.saturating_sub(1) as f64,
    )
}

fn outline_from_mask(
    mask: &GrayImage,
    target_points: Option<usize>,
    config: &ContourConfig,
) -> Outline {
    let (w, h) = mask.dimensions();
    let (polygon, source) = match trace_largest_border(mask, config) {
        Ok(poly) => (poly, OutlineSource::Contour),
        Err(reason) => {
            tracing::warn!(
                reason = %reason,
                width = w,
                height = h,
                "garment outline unavailable, using image rectangle"
            );
            (
                bounding_rectangle(w, h),
                OutlineSource::BoundingBoxFallback { reason },
            )
        }
    };

    let polygon = match target_points {
        Some(n) if n != polygon.len() => resample_perimeter(&polygon, n),
        _ => polygon,
    };
    tracing::debug!(points = polygon.len(), ?source, "source outline");
    Outline { polygon, source }
}

fn trace_largest_border(
    mask: &GrayImage,
    config: &ContourConfig,
) -> Result<Polygon, FallbackReason> {
    if mask.width() == 0 || mask.height() == 0 {
        return Err(FallbackReason::EmptyImage);
    }

    // one background pixel all round, so a silhouette touching the image
    // edge still has an outer border
    let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
    imageops::replace(&mut padded, mask, 1, 1);
    let contours = find_contours::<u32>(&padded);
    let largest = contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            let pts: Vec<[f64; 2]> = c
                .points
                .iter()
                .map(|p| [p.x as f64, p.y as f64])
                .collect();
            (polygon::signed_area(&pts).abs(), c)
        })
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, c)| c)
        .ok_or(FallbackReason::EmptySilhouette)?;

    if largest.points.len() < config.min_vertices.max(3) {
        return Err(FallbackReason::TooFewVertices {
            got: largest.points.len(),
        });
    }
    let eps = (config.simplify_frac * arc_length(&largest.points, true))
        .max(config.min_simplify_px)
        .max(f64::EPSILON);
    let simplified = approximate_polygon_dp(&largest.points, eps, true);

    let mut points: Vec<[f64; 2]> = Vec::with_capacity(simplified.len());
    for p in &simplified {
        let q = [p.x as f64 - 1.0, p.y as f64 - 1.0];
        if points.last() != Some(&q) {
            points.push(q);
        }
    }
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    if points.len() < config.min_vertices {
        return Err(FallbackReason::TooFewVertices { got: points.len() });
    }
    Ok(Polygon::new(points))
}

/// Inclusive bounding box `[x0, y0, x1, y1]` of pixels with alpha above 5.
/// Falls back to the full image when nothing is opaque enough.
pub fn tight_alpha_bbox(image: &RgbaImage) -> [u32; 4] {
    let mut bbox: Option<[u32; 4]> = None;
    for (x, y, p) in image.enumerate_pixels() {
        if p[3] <= TIGHT_BBOX_ALPHA {
            continue;
        }
        bbox = Some(match bbox {
            None => [x, y, x, y],
            Some(b) => [b[0].min(x), b[1].min(y), b[2].max(x), b[3].max(y)],
        });
    }
    bbox.unwrap_or([
        0,
        0,
        image.width().saturating_sub(1),
        image.height().saturating_sub(1),
    ])
}
