use serde::{Deserialize, Serialize};

use super::{Joint, LandmarkSet};
use crate::polygon::distance;

/// Garment size bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeLabel {
    S,
    M,
    L,
    XL,
}

impl SizeLabel {
    /// Bucket a shoulder width measured in photograph pixels.
    pub fn from_shoulder_width_px(width: f64) -> Self {
        if width < 120.0 {
            Self::S
        } else if width < 180.0 {
            Self::M
        } else if width < 240.0 {
            Self::L
        } else {
            Self::XL
        }
    }
}

impl std::fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::XL => "XL",
        };
        f.write_str(s)
    }
}

/// Recommend a size from the detected shoulder width, `None` when either
/// shoulder is missing.
///
/// The thresholds are in photograph pixels, so the result is only meaningful
/// for photographs taken at a comparable scale.
pub fn recommend_size(landmarks: &LandmarkSet) -> Option<SizeLabel> {
    let ls = landmarks.point(Joint::LeftShoulder)?;
    let rs = landmarks.point(Joint::RightShoulder)?;
    Some(SizeLabel::from_shoulder_width_px(distance(ls, rs)))
}
