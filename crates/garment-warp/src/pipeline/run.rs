//! Top-level orchestration: target → outline → correspondence → mesh → warp.

use image::RgbaImage;

use super::result::{DegenerateGeometry, WarpDiagnostics, WarpResult};
use crate::config::WarpConfig;
use crate::contour::extract_source_outline;
use crate::landmarks::LandmarkSet;
use crate::mesh::triangulate;
use crate::polygon::{align_start_point, resample_perimeter, Polygon};
use crate::target::{build_target_polygon, GarmentCategory, TargetError};
use crate::warp::warp_triangles;

/// Warp `garment` onto the body described by `landmarks`.
///
/// Returns a canvas of `canvas_size = [width, height]`. The only error is a
/// missing-landmark failure from destination construction; every later
/// problem degrades to a partial or fully transparent canvas reported in
/// [`WarpResult::diagnostics`].
pub fn warp_garment(
    garment: &RgbaImage,
    landmarks: &LandmarkSet,
    category: GarmentCategory,
    canvas_size: [u32; 2],
    config: &WarpConfig,
) -> Result<WarpResult, TargetError> {
    let destination = build_target_polygon(landmarks, category, &config.target)?;
    Ok(warp_to_polygon(garment, destination, canvas_size, config))
}

/// Warp `garment` onto an explicit destination outline.
pub fn warp_to_polygon(
    garment: &RgbaImage,
    destination: Polygon,
    canvas_size: [u32; 2],
    config: &WarpConfig,
) -> WarpResult {
    let n = destination.len();
    let outline = extract_source_outline(garment, Some(n), &config.contour);
    let mut diagnostics = WarpDiagnostics::new(outline.source, n);

    let mut source = outline.polygon;
    if source.len() != n {
        source = resample_perimeter(&source, n);
        diagnostics.source_resampled = true;
    }
    if config.correspondence.align_start_points {
        source = align_start_point(&source, &destination);
        diagnostics.start_aligned = true;
    }
    debug_assert_eq!(source.len(), destination.len());

    let degenerate = |reason: DegenerateGeometry,
                      source: Polygon,
                      destination: Polygon,
                      mut diagnostics: WarpDiagnostics| {
        tracing::warn!("garment mesh abandoned ({reason}); returning empty canvas");
        diagnostics.degenerate = Some(reason);
        WarpResult {
            canvas: RgbaImage::new(canvas_size[0], canvas_size[1]),
            source,
            destination,
            triangles: Vec::new(),
            diagnostics,
        }
    };

    if let Some(reason) = check_geometry(&destination).or_else(|| check_geometry(&source)) {
        return degenerate(reason, source, destination, diagnostics);
    }

    let triangles = triangulate(destination.points());
    if triangles.is_empty() {
        return degenerate(
            DegenerateGeometry::NoTriangles,
            source,
            destination,
            diagnostics,
        );
    }
    tracing::debug!("{} mesh triangles over {} points", triangles.len(), n);

    let (canvas, stats) = warp_triangles(
        &source,
        &destination,
        &triangles,
        garment,
        canvas_size,
        &config.composite,
    );
    diagnostics.record_stats(stats);
    tracing::info!(
        "garment warped: {}/{} triangles, outline {:?}",
        diagnostics.triangles_warped,
        diagnostics.triangles_total,
        diagnostics.outline_source,
    );

    WarpResult {
        canvas,
        source,
        destination,
        triangles,
        diagnostics,
    }
}

/// Whole-polygon checks that make a mesh meaningless.
pub(crate) fn check_geometry(poly: &Polygon) -> Option<DegenerateGeometry> {
    if poly.len() < 3 {
        return Some(DegenerateGeometry::TooFewPoints { got: poly.len() });
    }
    if !poly.is_finite() {
        return Some(DegenerateGeometry::NonFinitePoints);
    }
    if !(poly.perimeter() > 0.0) {
        return Some(DegenerateGeometry::ZeroPerimeter);
    }
    None
}
