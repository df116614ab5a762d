//! High-level warp API.
//!
//! [`GarmentWarper`] is the primary entry point. It owns a [`WarpConfig`] and
//! no other state, so one instance can serve any number of concurrent
//! requests.

use std::path::Path;

use image::RgbaImage;

use crate::config::WarpConfig;
use crate::contour::{extract_source_outline, Outline};
use crate::landmarks::{LandmarkSet, LandmarkSource, LandmarkSourceError};
use crate::pipeline::{self, WarpResult};
use crate::polygon::Polygon;
use crate::target::{build_target_polygon, GarmentCategory, TargetError};

/// Failure of [`GarmentWarper::warp_with_source`].
#[derive(Debug, Clone, PartialEq)]
pub enum WarpError {
    /// The landmark service could not describe the photograph.
    Landmarks(LandmarkSourceError),
    /// The landmarks lack joints the category needs.
    Target(TargetError),
}

impl std::fmt::Display for WarpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Landmarks(e) => write!(f, "landmark detection failed: {e}"),
            Self::Target(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for WarpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Landmarks(e) => Some(e),
            Self::Target(e) => Some(e),
        }
    }
}

impl From<LandmarkSourceError> for WarpError {
    fn from(e: LandmarkSourceError) -> Self {
        Self::Landmarks(e)
    }
}

impl From<TargetError> for WarpError {
    fn from(e: TargetError) -> Self {
        Self::Target(e)
    }
}

/// Primary warp interface.
///
/// Create once, warp many garments.
///
/// # Examples
///
/// ```
/// use garment_warp::{GarmentCategory, GarmentWarper, Joint, LandmarkSet};
/// use image::{Rgba, RgbaImage};
///
/// let garment = RgbaImage::from_pixel(60, 80, Rgba([30, 60, 200, 255]));
/// let body = LandmarkSet::new([400, 600])
///     .with(Joint::LeftShoulder, [140.0, 200.0])
///     .with(Joint::RightShoulder, [260.0, 200.0])
///     .with(Joint::LeftHip, [160.0, 380.0])
///     .with(Joint::RightHip, [240.0, 380.0]);
///
/// let warper = GarmentWarper::new();
/// let result = warper
///     .warp(&garment, &body, GarmentCategory::Shirt, [400, 600])
///     .unwrap();
/// assert_eq!(result.canvas.dimensions(), (400, 600));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GarmentWarper {
    config: WarpConfig,
}

impl GarmentWarper {
    /// Create a warper with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with full config control.
    pub fn with_config(config: WarpConfig) -> Self {
        Self { config }
    }

    /// Load a (possibly partial) JSON config and create a warper in one step.
    pub fn from_config_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::with_config(WarpConfig::from_json_file(path)?))
    }

    pub fn config(&self) -> &WarpConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut WarpConfig {
        &mut self.config
    }

    /// Warp `garment` onto the body in a photograph of `photo_size`.
    ///
    /// `Err` means the mesh path is unavailable for these landmarks; callers
    /// typically fall back to [`crate::compose::basic_overlay`].
    pub fn warp(
        &self,
        garment: &RgbaImage,
        landmarks: &LandmarkSet,
        category: GarmentCategory,
        photo_size: [u32; 2],
    ) -> Result<WarpResult, TargetError> {
        pipeline::warp_garment(garment, landmarks, category, photo_size, &self.config)
    }

    /// Warp `garment` onto a caller-supplied destination outline.
    pub fn warp_to_polygon(
        &self,
        garment: &RgbaImage,
        destination: Polygon,
        photo_size: [u32; 2],
    ) -> WarpResult {
        pipeline::warp_to_polygon(garment, destination, photo_size, &self.config)
    }

    /// Detect landmarks on `photo` with `source`, then warp onto it.
    pub fn warp_with_source(
        &self,
        garment: &RgbaImage,
        source: &dyn LandmarkSource,
        photo: &RgbaImage,
        category: GarmentCategory,
    ) -> Result<WarpResult, WarpError> {
        let landmarks = source.landmarks(photo)?;
        Ok(self.warp(garment, &landmarks, category, [photo.width(), photo.height()])?)
    }

    /// Destination outline only.
    pub fn target_polygon(
        &self,
        landmarks: &LandmarkSet,
        category: GarmentCategory,
    ) -> Result<Polygon, TargetError> {
        build_target_polygon(landmarks, category, &self.config.target)
    }

    /// Source outline only, optionally resampled to `target_points`.
    pub fn source_outline(&self, garment: &RgbaImage, target_points: Option<usize>) -> Outline {
        extract_source_outline(garment, target_points, &self.config.contour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Joint, StaticLandmarks};
    use crate::test_utils::{opaque_square, upright_body};

    #[test]
    fn warper_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GarmentWarper>();
        assert_send_sync::<WarpResult>();
    }

    #[test]
    fn config_mut_is_visible() {
        let mut warper = GarmentWarper::new();
        warper.config_mut().composite.padding_px = 5;
        assert_eq!(warper.config().composite.padding_px, 5);
    }

    #[test]
    fn warp_with_source_uses_photo_size() {
        let warper = GarmentWarper::new();
        let garment = opaque_square(80, 80, [10, 10], 60, [200, 10, 10]);
        let photo = RgbaImage::new(400, 600);
        let source = StaticLandmarks::new(upright_body());
        let out = warper
            .warp_with_source(&garment, &source, &photo, GarmentCategory::Shirt)
            .unwrap();
        assert_eq!(out.canvas.dimensions(), (400, 600));
    }

    #[test]
    fn warp_with_source_reports_both_failures() {
        let warper = GarmentWarper::new();
        let garment = RgbaImage::new(10, 10);
        let photo = RgbaImage::new(400, 600);

        let nobody = StaticLandmarks::new(LandmarkSet::new([400, 600]));
        let err = warper
            .warp_with_source(&garment, &nobody, &photo, GarmentCategory::Shirt)
            .unwrap_err();
        assert_eq!(
            err,
            WarpError::Landmarks(LandmarkSourceError::NoPersonDetected)
        );

        let mut legs_only = upright_body();
        legs_only.remove(Joint::LeftShoulder);
        let err = warper
            .warp_with_source(
                &garment,
                &StaticLandmarks::new(legs_only),
                &photo,
                GarmentCategory::Shirt,
            )
            .unwrap_err();
        assert!(matches!(err, WarpError::Target(_)));
        assert!(err.to_string().contains("left_shoulder"));
    }

    #[test]
    fn target_and_outline_helpers() {
        let warper = GarmentWarper::new();
        let dst = warper
            .target_polygon(&upright_body(), GarmentCategory::Pant)
            .unwrap();
        assert_eq!(dst.len(), 12);
        let garment = opaque_square(50, 50, [5, 5], 30, [0, 0, 0]);
        let outline = warper.source_outline(&garment, Some(12));
        assert_eq!(outline.polygon.len(), 12);
    }
}
