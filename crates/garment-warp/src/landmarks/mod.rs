//! Named body landmarks in photograph pixel space.
//!
//! A [`LandmarkSet`] is produced once per photograph by an external pose
//! detector (see [`LandmarkSource`]) and is immutable afterwards. Joints may be
//! missing because of occlusion; consumers either derive what they need
//! ([`LandmarkSet::with_derived_midpoints`]) or fail with a typed error.

mod size;
mod source;

pub use size::{recommend_size, SizeLabel};
pub use source::{LandmarkSource, LandmarkSourceError, StaticLandmarks};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Confidence below which a joint is reported as unreliable.
pub const LOW_CONFIDENCE: f32 = 0.5;

/// Closed vocabulary of body joints understood by the warp engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
    /// Mean of the two shoulders.
    MidShoulder,
    /// Mean of the two hips.
    MidHip,
}

impl Joint {
    pub const ALL: [Joint; 27] = [
        Joint::Nose,
        Joint::LeftEyeInner,
        Joint::LeftEye,
        Joint::LeftEyeOuter,
        Joint::RightEyeInner,
        Joint::RightEye,
        Joint::RightEyeOuter,
        Joint::LeftEar,
        Joint::RightEar,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
        Joint::LeftHeel,
        Joint::RightHeel,
        Joint::LeftFootIndex,
        Joint::RightFootIndex,
        Joint::MidShoulder,
        Joint::MidHip,
    ];

    /// Stable snake_case name, identical to the serialized form.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left_eye_inner",
            Self::LeftEye => "left_eye",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeInner => "right_eye_inner",
            Self::RightEye => "right_eye",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::LeftHeel => "left_heel",
            Self::RightHeel => "right_heel",
            Self::LeftFootIndex => "left_foot_index",
            Self::RightFootIndex => "right_foot_index",
            Self::MidShoulder => "mid_shoulder",
            Self::MidHip => "mid_hip",
        }
    }
}

impl std::fmt::Display for Joint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Joint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Joint::ALL
            .iter()
            .copied()
            .find(|j| j.name() == s)
            .ok_or_else(|| format!("unknown joint name: {s}"))
    }
}

/// One detected joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Pixel coordinate (x, y) in the photograph.
    pub xy: [f64; 2],
    /// Detector confidence in [0, 1].
    #[serde(default = "full_confidence")]
    pub confidence: f32,
}

fn full_confidence() -> f32 {
    1.0
}

/// Joint coordinates and confidences for one photograph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    /// Reference photograph size [width, height] in pixels.
    pub image_size: [u32; 2],
    #[serde(default)]
    joints: BTreeMap<Joint, Landmark>,
}

impl LandmarkSet {
    pub fn new(image_size: [u32; 2]) -> Self {
        Self {
            image_size,
            joints: BTreeMap::new(),
        }
    }

    /// Builder-style insert with full confidence.
    pub fn with(mut self, joint: Joint, xy: [f64; 2]) -> Self {
        self.insert(joint, xy, 1.0);
        self
    }

    pub fn insert(&mut self, joint: Joint, xy: [f64; 2], confidence: f32) {
        self.joints.insert(joint, Landmark { xy, confidence });
    }

    pub fn remove(&mut self, joint: Joint) -> Option<Landmark> {
        self.joints.remove(&joint)
    }

    pub fn get(&self, joint: Joint) -> Option<&Landmark> {
        self.joints.get(&joint)
    }

    /// Pixel coordinate of `joint`, ignoring non-finite entries.
    pub fn point(&self, joint: Joint) -> Option<[f64; 2]> {
        self.joints
            .get(&joint)
            .map(|l| l.xy)
            .filter(|p| p[0].is_finite() && p[1].is_finite())
    }

    pub fn contains(&self, joint: Joint) -> bool {
        self.point(joint).is_some()
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Joint, &Landmark)> {
        self.joints.iter().map(|(j, l)| (*j, l))
    }

    /// Copy with `mid_shoulder` / `mid_hip` filled in from the left/right pair
    /// when absent. Derived joints carry the lower of the two confidences.
    pub fn with_derived_midpoints(&self) -> Self {
        let mut out = self.clone();
        for (mid, left, right) in [
            (Joint::MidShoulder, Joint::LeftShoulder, Joint::RightShoulder),
            (Joint::MidHip, Joint::LeftHip, Joint::RightHip),
        ] {
            if out.contains(mid) {
                continue;
            }
            if let (Some(l), Some(r)) = (self.get(left), self.get(right)) {
                let xy = [0.5 * (l.xy[0] + r.xy[0]), 0.5 * (l.xy[1] + r.xy[1])];
                if xy[0].is_finite() && xy[1].is_finite() {
                    out.insert(mid, xy, l.confidence.min(r.confidence));
                }
            }
        }
        out
    }

    /// Joints whose confidence is below `threshold`, in vocabulary order.
    pub fn low_confidence(&self, threshold: f32) -> Vec<Joint> {
        self.iter()
            .filter(|(_, l)| l.confidence < threshold)
            .map(|(j, _)| j)
            .collect()
    }

    /// Copy without the joints whose confidence is below `min_confidence`.
    pub fn gated(&self, min_confidence: f32) -> Self {
        let mut out = self.clone();
        out.joints.retain(|_, l| l.confidence >= min_confidence);
        out
    }

    /// Load a landmark set from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a landmark set from a JSON file.
    pub fn from_json_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_names_round_trip_through_from_str() {
        for j in Joint::ALL {
            assert_eq!(j.name().parse::<Joint>().unwrap(), j);
        }
        assert!("left_toe".parse::<Joint>().is_err());
    }

    #[test]
    fn serialized_joint_matches_name() {
        let s = serde_json::to_string(&Joint::LeftFootIndex).unwrap();
        assert_eq!(s, "\"left_foot_index\"");
    }

    #[test]
    fn derives_midpoints_from_pairs() {
        let mut set = LandmarkSet::new([400, 600])
            .with(Joint::LeftShoulder, [100.0, 200.0])
            .with(Joint::RightShoulder, [300.0, 220.0]);
        set.insert(Joint::LeftHip, [120.0, 400.0], 0.9);
        set.insert(Joint::RightHip, [280.0, 400.0], 0.4);

        let derived = set.with_derived_midpoints();
        assert_eq!(derived.point(Joint::MidShoulder), Some([200.0, 210.0]));
        let mid_hip = derived.get(Joint::MidHip).unwrap();
        assert_eq!(mid_hip.xy, [200.0, 400.0]);
        assert!((mid_hip.confidence - 0.4).abs() < 1e-6);
    }

    #[test]
    fn existing_midpoint_is_not_overwritten() {
        let set = LandmarkSet::new([10, 10])
            .with(Joint::LeftShoulder, [0.0, 0.0])
            .with(Joint::RightShoulder, [4.0, 0.0])
            .with(Joint::MidShoulder, [1.0, 1.0]);
        let derived = set.with_derived_midpoints();
        assert_eq!(derived.point(Joint::MidShoulder), Some([1.0, 1.0]));
        assert!(!derived.contains(Joint::MidHip));
    }

    #[test]
    fn gating_drops_low_confidence_joints() {
        let mut set = LandmarkSet::new([10, 10]);
        set.insert(Joint::Nose, [1.0, 1.0], 0.2);
        set.insert(Joint::LeftShoulder, [2.0, 2.0], 0.8);
        assert_eq!(set.low_confidence(LOW_CONFIDENCE), vec![Joint::Nose]);
        let gated = set.gated(0.5);
        assert!(!gated.contains(Joint::Nose));
        assert!(gated.contains(Joint::LeftShoulder));
    }

    #[test]
    fn json_round_trip_uses_joint_names() {
        let json = r#"{
            "image_size": [640, 480],
            "joints": {
                "left_shoulder": {"xy": [100.0, 200.0], "confidence": 0.9},
                "right_shoulder": {"xy": [300.0, 200.0]}
            }
        }"#;
        let set = LandmarkSet::from_json_str(json).unwrap();
        assert_eq!(set.image_size, [640, 480]);
        assert_eq!(set.point(Joint::RightShoulder), Some([300.0, 200.0]));
        assert!((set.get(Joint::RightShoulder).unwrap().confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn non_finite_points_are_treated_as_missing() {
        let set = LandmarkSet::new([10, 10]).with(Joint::Nose, [f64::NAN, 1.0]);
        assert!(set.get(Joint::Nose).is_some());
        assert!(set.point(Joint::Nose).is_none());
    }
}
