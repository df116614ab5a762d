//! garment-warp: piecewise-affine garment warping onto body landmarks.
//!
//! Given a garment photo with a transparent background and the body
//! landmarks of a person photo, the engine deforms the garment onto the
//! body outline. The stages are:
//!
//! 1. **Target** – destination outline in photo pixels from the landmarks
//!    (shirt, pant or dress template).
//! 2. **Contour** – source outline of the garment silhouette, with a typed
//!    bounding-rectangle fallback.
//! 3. **Polygon** – arc-length resampling to equal cardinality and
//!    start-point alignment.
//! 4. **Mesh** – Delaunay triangulation of the destination outline.
//! 5. **Warp** – per-triangle affine resampling composited into a canvas
//!    the size of the photo.
//!
//! # Public API
//! - [`GarmentWarper`] as the primary entry point
//! - [`WarpConfig`] for tuning, loadable from partial JSON
//! - [`LandmarkSet`] / [`LandmarkSource`] for body input
//! - [`WarpResult`] with the canvas, the correspondence pair and diagnostics
//! - [`compose`] for placing the canvas over the photo
//!
//! The stage modules are public for callers that need a single step (for
//! example only the destination outline).

mod api;
pub mod compose;
mod config;
pub mod contour;
mod landmarks;
pub mod mesh;
mod pipeline;
pub mod polygon;
mod target;
pub mod warp;

#[cfg(test)]
mod test_utils;

pub use api::{GarmentWarper, WarpError};
pub use config::{CorrespondenceConfig, WarpConfig};
pub use contour::{
    extract_source_outline, ContourConfig, FallbackReason, Outline, OutlineSource,
};
pub use landmarks::{
    recommend_size, Joint, Landmark, LandmarkSet, LandmarkSource, LandmarkSourceError,
    SizeLabel, StaticLandmarks, LOW_CONFIDENCE,
};
pub use mesh::triangulate;
pub use pipeline::{
    warp_garment, warp_to_polygon, DegenerateGeometry, WarpDiagnostics, WarpResult,
};
pub use polygon::{align_start_point, resample_perimeter, Bounds, Polygon};
pub use target::{
    build_target_polygon, DressParams, GarmentCategory, PantParams, ShirtParams, TargetError,
    TargetParams,
};
pub use warp::{
    warp_triangles, BlendStrategy, CompositeConfig, Interpolation, SkippedTriangle,
    TriangleSkip, WarpStats,
};
