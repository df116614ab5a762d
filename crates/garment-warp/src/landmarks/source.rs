//! Injectable landmark detection service.
//!
//! Pose models are expensive to initialize, so a detector is an explicitly
//! constructed object owned by the caller and passed in by reference. The
//! warp engine itself holds no model state.

use image::RgbaImage;

use super::LandmarkSet;

/// Errors reported by a [`LandmarkSource`].
#[derive(Debug, Clone, PartialEq)]
pub enum LandmarkSourceError {
    /// The detector ran but found no person in the photograph.
    NoPersonDetected,
    /// The detector backend failed.
    Backend(String),
}

impl std::fmt::Display for LandmarkSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPersonDetected => write!(f, "no person detected"),
            Self::Backend(msg) => write!(f, "landmark backend failed: {}", msg),
        }
    }
}

impl std::error::Error for LandmarkSourceError {}

/// Produces a [`LandmarkSet`] for a photograph.
///
/// # Example
///
/// ```
/// use garment_warp::{Joint, LandmarkSet, LandmarkSource, StaticLandmarks};
/// use image::RgbaImage;
///
/// let fixed = LandmarkSet::new([64, 64]).with(Joint::Nose, [32.0, 10.0]);
/// let source = StaticLandmarks::new(fixed);
/// let found = source.landmarks(&RgbaImage::new(64, 64)).unwrap();
/// assert!(found.contains(Joint::Nose));
/// ```
pub trait LandmarkSource {
    fn landmarks(&self, photo: &RgbaImage) -> Result<LandmarkSet, LandmarkSourceError>;
}

/// Source that always returns the same precomputed landmarks, e.g. loaded
/// from a JSON file produced by an offline detector.
#[derive(Debug, Clone)]
pub struct StaticLandmarks {
    set: LandmarkSet,
}

impl StaticLandmarks {
    pub fn new(set: LandmarkSet) -> Self {
        Self { set }
    }
}

impl LandmarkSource for StaticLandmarks {
    fn landmarks(&self, _photo: &RgbaImage) -> Result<LandmarkSet, LandmarkSourceError> {
        if self.set.is_empty() {
            return Err(LandmarkSourceError::NoPersonDetected);
        }
        Ok(self.set.clone())
    }
}
