//! Garment warp pipeline.
//!
//! Glue layer that wires the stages together: destination outline from
//! landmarks, source outline from the garment image, equal-cardinality
//! correspondence, Delaunay mesh, per-triangle warp. Algorithmic primitives
//! live in `crate::target`, `crate::contour`, `crate::polygon`, `crate::mesh`
//! and `crate::warp`; this module only owns call order and degradation.

mod result;
mod run;

pub use result::{DegenerateGeometry, WarpDiagnostics, WarpResult};
pub use run::{warp_garment, warp_to_polygon};
