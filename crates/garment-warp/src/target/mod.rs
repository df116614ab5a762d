//! Destination outlines derived from body landmarks.
//!
//! Each garment category has its own construction rule, but all share the
//! same pattern: pick a reference width from the landmarks (shoulder width
//! for tops and dresses, hip width for trousers), express every offset as a
//! fraction of it, and assemble the points into one consistently wound loop.
//! Lateral and downward directions come from the landmark geometry itself, so
//! the rules do not assume the person's left is on a particular image side.

mod dress;
mod pant;
mod shirt;

pub use dress::DressParams;
pub use pant::PantParams;
pub use shirt::ShirtParams;

use serde::{Deserialize, Serialize};

use crate::landmarks::{Joint, LandmarkSet, LOW_CONFIDENCE};
use crate::polygon::{Bounds, Polygon};

/// Garment category; selects the destination-polygon construction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GarmentCategory {
    Shirt,
    Pant,
    Dress,
}

impl GarmentCategory {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shirt => "shirt",
            Self::Pant => "pant",
            Self::Dress => "dress",
        }
    }

    /// Joints without which no outline can be built for this category.
    pub const fn required_joints(self) -> &'static [Joint] {
        match self {
            Self::Shirt => &[
                Joint::LeftShoulder,
                Joint::RightShoulder,
                Joint::MidShoulder,
                Joint::MidHip,
            ],
            Self::Pant => &[
                Joint::LeftHip,
                Joint::RightHip,
                Joint::LeftKnee,
                Joint::RightKnee,
                Joint::LeftAnkle,
                Joint::RightAnkle,
            ],
            Self::Dress => &[
                Joint::LeftShoulder,
                Joint::RightShoulder,
                Joint::MidShoulder,
                Joint::MidHip,
                Joint::LeftAnkle,
                Joint::RightAnkle,
            ],
        }
    }
}

impl std::fmt::Display for GarmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for GarmentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shirt" => Ok(Self::Shirt),
            "pant" | "pants" => Ok(Self::Pant),
            "dress" => Ok(Self::Dress),
            other => Err(format!(
                "unknown garment category '{other}' (expected shirt, pant or dress)"
            )),
        }
    }
}

/// Errors from destination-polygon construction.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetError {
    /// Joints required by the category are absent (after midpoint derivation
    /// and confidence gating).
    MissingLandmarks {
        category: GarmentCategory,
        missing: Vec<Joint>,
    },
}

impl std::fmt::Display for TargetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingLandmarks { category, missing } => {
                let names: Vec<&str> = missing.iter().map(|j| j.name()).collect();
                write!(
                    f,
                    "missing landmarks for {}: {}",
                    category,
                    names.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for TargetError {}

/// Destination-polygon construction parameters for all categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetParams {
    pub shirt: ShirtParams,
    pub pant: PantParams,
    pub dress: DressParams,
    /// Clamp every outline point into the bounding box of the landmarks it was
    /// built from, grown by this fraction of the category's reference width.
    /// Sleeves that overshoot are shortened along their direction, so a
    /// fallback sleeve keeps its angle but loses length. `None` disables the
    /// clamp.
    pub envelope_margin_frac: Option<f64>,
    /// Treat joints below this confidence as absent. `None` keeps every joint.
    pub min_confidence: Option<f32>,
}

impl Default for TargetParams {
    fn default() -> Self {
        Self {
            shirt: ShirtParams::default(),
            pant: PantParams::default(),
            dress: DressParams::default(),
            envelope_margin_frac: Some(0.2),
            min_confidence: None,
        }
    }
}

/// Build the destination outline for `category` on the body described by
/// `landmarks`.
///
/// Missing midpoints are derived from their left/right pairs first. Fails
/// only when joints essential to the category are absent; missing optional
/// joints (nose, elbows, individual hips for a dress) fall back to simpler
/// geometry.
pub fn build_target_polygon(
    landmarks: &LandmarkSet,
    category: GarmentCategory,
    params: &TargetParams,
) -> Result<Polygon, TargetError> {
    let low = landmarks.low_confidence(LOW_CONFIDENCE);
    if !low.is_empty() {
        tracing::warn!(
            "low-confidence landmarks: {}",
            low.iter().map(|j| j.name()).collect::<Vec<_>>().join(", ")
        );
    }

    let gated = match params.min_confidence {
        Some(t) => landmarks.gated(t),
        None => landmarks.clone(),
    };
    let lm = gated.with_derived_midpoints();

    let missing: Vec<Joint> = category
        .required_joints()
        .iter()
        .copied()
        .filter(|&j| !lm.contains(j))
        .collect();
    if !missing.is_empty() {
        return Err(TargetError::MissingLandmarks { category, missing });
    }

    let shape = match category {
        GarmentCategory::Shirt => shirt::build(&lm, &params.shirt),
        GarmentCategory::Pant => pant::build(&lm, &params.pant),
        GarmentCategory::Dress => dress::build(&lm, &params.dress),
    }?;

    let reference_width = shape.reference_width;
    let polygon = match params.envelope_margin_frac {
        Some(frac) => shape.clamped(frac),
        None => Polygon::new(shape.points),
    };
    tracing::debug!(
        "{} target polygon: {} points, reference width {:.1}px",
        category,
        polygon.len(),
        reference_width
    );
    Ok(polygon)
}

/// Raw outline plus the data needed for the envelope clamp.
struct TargetShape {
    points: Vec<[f64; 2]>,
    /// Landmarks the outline was derived from.
    anchors: Vec<[f64; 2]>,
    reference_width: f64,
    /// Outline points that extend away from a joint (sleeve ends).
    limbs: Vec<Limb>,
}

/// Outline points that shrink together toward `root` when clamped.
struct Limb {
    root: [f64; 2],
    ends: [usize; 2],
}

impl TargetShape {
    /// Clamp into the anchor envelope. Limbs are shortened along their own
    /// direction first; the remaining points are clamped per axis.
    fn clamped(self, margin_frac: f64) -> Polygon {
        let Some(envelope) = Bounds::from_points(&self.anchors) else {
            return Polygon::new(self.points);
        };
        let envelope = envelope.expanded(margin_frac.max(0.0) * self.reference_width);

        let mut points = self.points;
        for limb in &self.limbs {
            let Some(ends) = limb
                .ends
                .iter()
                .map(|&i| points.get(i).copied())
                .collect::<Option<Vec<_>>>()
            else {
                continue;
            };
            let t = ends
                .iter()
                .map(|&p| ray_fraction(&envelope, limb.root, p))
                .fold(1.0_f64, f64::min);
            for (&i, p) in limb.ends.iter().zip(ends) {
                points[i] = add(limb.root, scale(sub(p, limb.root), t));
            }
        }
        Polygon::new(points.iter().map(|&p| envelope.clamp(p)).collect())
    }
}

/// Largest `t` in `[0, 1]` with `root + t·(p − root)` inside `envelope`.
fn ray_fraction(envelope: &Bounds, root: [f64; 2], p: [f64; 2]) -> f64 {
    let mut t = 1.0_f64;
    for k in 0..2 {
        let d = p[k] - root[k];
        if p[k] > envelope.max[k] && d > 0.0 {
            t = t.min((envelope.max[k] - root[k]) / d);
        } else if p[k] < envelope.min[k] && d < 0.0 {
            t = t.min((envelope.min[k] - root[k]) / d);
        }
    }
    t.clamp(0.0, 1.0)
}

/// Fetch a joint that `build_target_polygon` already verified.
fn joint(lm: &LandmarkSet, j: Joint, category: GarmentCategory) -> Result<[f64; 2], TargetError> {
    lm.point(j).ok_or(TargetError::MissingLandmarks {
        category,
        missing: vec![j],
    })
}

// ── small vector helpers ───────────────────────────────────────────────────

fn add(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [a[0] + b[0], a[1] + b[1]]
}

fn sub(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

fn scale(a: [f64; 2], s: f64) -> [f64; 2] {
    [a[0] * s, a[1] * s]
}

fn norm(a: [f64; 2]) -> f64 {
    a[0].hypot(a[1])
}

fn midpoint(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [0.5 * (a[0] + b[0]), 0.5 * (a[1] + b[1])]
}

/// Unit vector along `a`, or `fallback` when `a` is (near) zero.
fn unit_or(a: [f64; 2], fallback: [f64; 2]) -> [f64; 2] {
    let n = norm(a);
    if n > 1e-9 && n.is_finite() {
        scale(a, 1.0 / n)
    } else {
        fallback
    }
}

/// Counter-clockwise perpendicular (in y-down image space this turns +x into -y).
fn perp(a: [f64; 2]) -> [f64; 2] {
    [a[1], -a[0]]
}

/// Orientation axes of a body, derived from a left/right pair and a
/// top-to-bottom pair of landmarks.
#[derive(Debug, Clone, Copy)]
struct BodyFrame {
    /// Unit vector pointing from the body centre toward the left side.
    out_left: [f64; 2],
    /// Unit vector pointing down the body.
    down: [f64; 2],
}

impl BodyFrame {
    fn new(left: [f64; 2], right: [f64; 2], top: [f64; 2], bottom: [f64; 2]) -> Self {
        let out_left = unit_or(sub(left, right), [-1.0, 0.0]);
        // perpendicular to the lateral axis, used when the vertical pair collapses
        let lateral_down = {
            let p = perp(out_left);
            if p[1] >= 0.0 {
                p
            } else {
                scale(p, -1.0)
            }
        };
        let down = unit_or(sub(bottom, top), lateral_down);
        Self { out_left, down }
    }

    fn out_right(&self) -> [f64; 2] {
        scale(self.out_left, -1.0)
    }

    fn up(&self) -> [f64; 2] {
        scale(self.down, -1.0)
    }
}
