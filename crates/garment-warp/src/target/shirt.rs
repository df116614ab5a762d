//! Shirt outline: shoulder line, sleeves, sides and a curved hem.

use serde::{Deserialize, Serialize};

use super::{
    add, joint, midpoint, norm, scale, sub, unit_or, BodyFrame, GarmentCategory, Limb,
    TargetError, TargetShape,
};
use crate::landmarks::{Joint, LandmarkSet};
use crate::polygon::lerp;

/// Shirt construction parameters. Lengths are fractions of shoulder width
/// unless stated otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShirtParams {
    /// Fraction of the nose→mid-shoulder drop at which the neck anchor sits.
    pub neck_nose_blend: f64,
    /// Neck anchor rise above mid-shoulder when no nose is detected.
    pub neck_rise_frac: f64,
    /// Outward shoulder expansion along the shoulder slope.
    pub shoulder_expand_frac: f64,
    /// Horizontal armpit offset from the shoulder.
    pub armpit_depth_frac: f64,
    /// Vertical armpit drop below the shoulder.
    pub armpit_drop_frac: f64,
    /// Sleeve length as a fraction of the shoulder→elbow length.
    pub sleeve_arm_frac: f64,
    /// Cap on the pose-driven sleeve length.
    pub sleeve_max_frac: f64,
    /// Sleeve half-thickness as a fraction of the shoulder→elbow length.
    pub arm_thickness_arm_frac: f64,
    /// Cap on the pose-driven sleeve half-thickness.
    pub arm_thickness_max_frac: f64,
    /// Downward sleeve angle (degrees) when no elbow is detected.
    pub fallback_sleeve_angle_deg: f64,
    /// Sleeve length when no elbow is detected.
    pub fallback_sleeve_length_frac: f64,
    /// Sleeve half-thickness when no elbow is detected.
    pub fallback_sleeve_width_frac: f64,
    /// Outward hem bulge at the hips.
    pub waist_curve_frac: f64,
    /// Hem corner spread, as a fraction of the shoulder→mid-shoulder vector.
    pub hem_spread: f64,
    /// Position of the armpit→shoulder transition point.
    pub transition_frac: f64,
}

impl Default for ShirtParams {
    fn default() -> Self {
        Self {
            neck_nose_blend: 0.3,
            neck_rise_frac: 0.25,
            shoulder_expand_frac: 0.03,
            armpit_depth_frac: 0.10,
            armpit_drop_frac: 0.15,
            sleeve_arm_frac: 0.35,
            sleeve_max_frac: 0.40,
            arm_thickness_arm_frac: 0.10,
            arm_thickness_max_frac: 0.08,
            fallback_sleeve_angle_deg: 25.0,
            fallback_sleeve_length_frac: 0.70,
            fallback_sleeve_width_frac: 0.12,
            waist_curve_frac: 0.08,
            hem_spread: 0.1,
            transition_frac: 0.3,
        }
    }
}

/// Sleeve end cross-section: the two points where the sleeve hem meets the
/// outline (`top` is on the shoulder side of the arm).
struct SleeveEnd {
    top: [f64; 2],
    bottom: [f64; 2],
}

pub(super) fn build(lm: &LandmarkSet, p: &ShirtParams) -> Result<TargetShape, TargetError> {
    let cat = GarmentCategory::Shirt;
    let ls = joint(lm, Joint::LeftShoulder, cat)?;
    let rs = joint(lm, Joint::RightShoulder, cat)?;
    let ms = joint(lm, Joint::MidShoulder, cat)?;
    let mh = joint(lm, Joint::MidHip, cat)?;

    let frame = BodyFrame::new(ls, rs, ms, mh);
    let sw = norm(sub(rs, ls));
    let mut anchors = vec![ls, rs, ms, mh];

    let neck = match lm.point(Joint::Nose) {
        Some(nose) => {
            anchors.push(nose);
            // neck sits on the torso axis, part way down from the nose
            let along = (ms[1] - nose[1]) * p.neck_nose_blend;
            [ms[0], nose[1] + along]
        }
        None => add(ms, scale(frame.up(), p.neck_rise_frac * sw)),
    };

    // move each shoulder away from the neck along the shoulder slope
    let expand = p.shoulder_expand_frac * sw;
    let left_slope = unit_or(sub(neck, ls), frame.out_right());
    let right_slope = unit_or(sub(neck, rs), frame.out_left);
    let left_shoulder = sub(ls, scale(left_slope, expand));
    let right_shoulder = sub(rs, scale(right_slope, expand));

    let left_armpit = add(
        add(ls, scale(frame.out_left, p.armpit_depth_frac * sw)),
        scale(frame.down, p.armpit_drop_frac * sw),
    );
    let right_armpit = add(
        add(rs, scale(frame.out_right(), p.armpit_depth_frac * sw)),
        scale(frame.down, p.armpit_drop_frac * sw),
    );

    let left_sleeve = match lm.point(Joint::LeftElbow) {
        Some(le) => {
            anchors.push(le);
            arm_sleeve(ls, le, sw, frame.out_left, &frame, p)
        }
        None => fallback_sleeve(ls, sw, frame.out_left, &frame, p),
    };
    let right_sleeve = match lm.point(Joint::RightElbow) {
        Some(re) => {
            anchors.push(re);
            arm_sleeve(rs, re, sw, frame.out_right(), &frame, p)
        }
        None => fallback_sleeve(rs, sw, frame.out_right(), &frame, p),
    };

    let waist_curve = p.waist_curve_frac * sw;
    let hem_left = add(
        add(mh, scale(sub(ls, ms), p.hem_spread)),
        scale(frame.out_left, waist_curve),
    );
    let hem_mid = add(mh, scale(frame.down, 0.5 * waist_curve));
    let hem_right = add(
        add(mh, scale(sub(rs, ms), p.hem_spread)),
        scale(frame.out_right(), waist_curve),
    );

    let left_shoulder_mid = midpoint(ls, left_shoulder);
    let right_shoulder_mid = midpoint(rs, right_shoulder);
    let left_transition = lerp(left_armpit, left_shoulder, p.transition_frac);
    let right_transition = lerp(right_armpit, right_shoulder, p.transition_frac);

    let points = vec![
        left_shoulder,
        left_shoulder_mid,
        ls,
        rs,
        right_shoulder_mid,
        right_shoulder,
        right_sleeve.top,
        right_sleeve.bottom,
        right_transition,
        right_armpit,
        hem_right,
        hem_mid,
        hem_left,
        left_armpit,
        left_transition,
        left_sleeve.bottom,
        left_sleeve.top,
    ];

    Ok(TargetShape {
        points,
        anchors,
        reference_width: sw,
        // sleeve ends sit at 6, 7 (right) and 15, 16 (left) in `points`
        limbs: vec![
            Limb {
                root: rs,
                ends: [6, 7],
            },
            Limb {
                root: ls,
                ends: [15, 16],
            },
        ],
    })
}

/// Sleeve following the detected shoulder→elbow direction.
fn arm_sleeve(
    shoulder: [f64; 2],
    elbow: [f64; 2],
    sw: f64,
    outward: [f64; 2],
    frame: &BodyFrame,
    p: &ShirtParams,
) -> SleeveEnd {
    let arm = sub(elbow, shoulder);
    let arm_len = norm(arm);
    if arm_len <= 1e-9 {
        return fallback_sleeve(shoulder, sw, outward, frame, p);
    }
    let dir = scale(arm, 1.0 / arm_len);
    let length = (arm_len * p.sleeve_arm_frac).min(sw * p.sleeve_max_frac);
    let thickness = (arm_len * p.arm_thickness_arm_frac).min(sw * p.arm_thickness_max_frac);
    let mid = add(shoulder, scale(dir, length));

    // "top" is the side of the arm facing up the body
    let mut across = [-dir[1], dir[0]];
    if across[0] * frame.down[0] + across[1] * frame.down[1] > 0.0 {
        across = scale(across, -1.0);
    }
    SleeveEnd {
        top: add(mid, scale(across, thickness)),
        bottom: sub(mid, scale(across, thickness)),
    }
}

/// Sleeve at a fixed downward angle when the elbow is not visible.
fn fallback_sleeve(
    shoulder: [f64; 2],
    sw: f64,
    outward: [f64; 2],
    frame: &BodyFrame,
    p: &ShirtParams,
) -> SleeveEnd {
    let angle = p.fallback_sleeve_angle_deg.to_radians();
    let dir = add(
        scale(outward, angle.cos()),
        scale(frame.down, angle.sin()),
    );
    let mid = add(shoulder, scale(dir, p.fallback_sleeve_length_frac * sw));
    let half = p.fallback_sleeve_width_frac * sw;
    SleeveEnd {
        top: add(mid, scale(frame.up(), half)),
        bottom: add(mid, scale(frame.down, half)),
    }
}
