//! Trouser outline: two leg loops, concatenated.

use serde::{Deserialize, Serialize};

use super::{
    add, joint, midpoint, norm, scale, sub, BodyFrame, GarmentCategory, TargetError, TargetShape,
};
use crate::landmarks::{Joint, LandmarkSet};
use crate::polygon::lerp;

/// Trouser construction parameters. Lengths are fractions of hip width.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PantParams {
    /// Outward waistband expansion beyond each hip.
    pub waist_expand_frac: f64,
    /// Crotch drop as a fraction of the mid-hip→mid-knee distance.
    pub crotch_drop: f64,
    /// Half gap between the legs at the crotch.
    pub crotch_gap_frac: f64,
    /// Leg half-width at the knee.
    pub knee_half_width_frac: f64,
    /// Leg half-width at the ankle.
    pub ankle_half_width_frac: f64,
}

impl Default for PantParams {
    fn default() -> Self {
        Self {
            waist_expand_frac: 0.05,
            crotch_drop: 0.15,
            crotch_gap_frac: 0.02,
            knee_half_width_frac: 0.22,
            ankle_half_width_frac: 0.16,
        }
    }
}

pub(super) fn build(lm: &LandmarkSet, p: &PantParams) -> Result<TargetShape, TargetError> {
    let cat = GarmentCategory::Pant;
    let lh = joint(lm, Joint::LeftHip, cat)?;
    let rh = joint(lm, Joint::RightHip, cat)?;
    let lk = joint(lm, Joint::LeftKnee, cat)?;
    let rk = joint(lm, Joint::RightKnee, cat)?;
    let la = joint(lm, Joint::LeftAnkle, cat)?;
    let ra = joint(lm, Joint::RightAnkle, cat)?;

    let hips_mid = midpoint(lh, rh);
    let knees_mid = midpoint(lk, rk);
    let frame = BodyFrame::new(lh, rh, hips_mid, knees_mid);
    let hw = norm(sub(rh, lh));
    let out_l = frame.out_left;
    let out_r = frame.out_right();

    let crotch = lerp(hips_mid, knees_mid, p.crotch_drop);
    let gap = p.crotch_gap_frac * hw;
    let knee_w = p.knee_half_width_frac * hw;
    let ankle_w = p.ankle_half_width_frac * hw;
    let waist = p.waist_expand_frac * hw;

    // each leg: waistband, crotch, inner seam down, hem, outer seam up
    let left_leg = [
        add(lh, scale(out_l, waist)),
        add(crotch, scale(out_l, gap)),
        add(lk, scale(out_r, knee_w)),
        add(la, scale(out_r, ankle_w)),
        add(la, scale(out_l, ankle_w)),
        add(lk, scale(out_l, knee_w)),
    ];
    let right_leg = [
        add(crotch, scale(out_r, gap)),
        add(rh, scale(out_r, waist)),
        add(rk, scale(out_r, knee_w)),
        add(ra, scale(out_r, ankle_w)),
        add(ra, scale(out_l, ankle_w)),
        add(rk, scale(out_l, knee_w)),
    ];

    Ok(TargetShape {
        points: left_leg.iter().chain(right_leg.iter()).copied().collect(),
        anchors: vec![lh, rh, lk, rk, la, ra],
        reference_width: hw,
        limbs: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::super::{build_target_polygon, TargetParams};
    use super::*;

    fn legs() -> LandmarkSet {
        LandmarkSet::new([400, 800])
            .with(Joint::LeftHip, [150.0, 400.0])
            .with(Joint::RightHip, [250.0, 400.0])
            .with(Joint::LeftKnee, [145.0, 550.0])
            .with(Joint::RightKnee, [255.0, 550.0])
            .with(Joint::LeftAnkle, [140.0, 700.0])
            .with(Joint::RightAnkle, [260.0, 700.0])
    }

    #[test]
    fn two_six_point_legs() {
        let poly =
            build_target_polygon(&legs(), GarmentCategory::Pant, &TargetParams::default()).unwrap();
        assert_eq!(poly.len(), 12);
        // left leg stays on the left of the crotch, right leg on the right
        for &p in &poly.points()[..6] {
            assert!(p[0] <= 200.0, "{p:?}");
        }
        for &p in &poly.points()[6..] {
            assert!(p[0] >= 200.0, "{p:?}");
        }
    }

    #[test]
    fn legs_share_winding() {
        let poly =
            build_target_polygon(&legs(), GarmentCategory::Pant, &TargetParams::default()).unwrap();
        let left = crate::polygon::Polygon::new(poly.points()[..6].to_vec());
        let right = crate::polygon::Polygon::new(poly.points()[6..].to_vec());
        assert!(left.signed_area() * right.signed_area() > 0.0);
    }

    #[test]
    fn crotch_sits_below_hips() {
        let poly =
            build_target_polygon(&legs(), GarmentCategory::Pant, &TargetParams::default()).unwrap();
        let crotch = poly.get(1).unwrap();
        // 15% of the 150 px hip→knee drop
        assert!((crotch[1] - 422.5).abs() < 1e-9);
    }

    #[test]
    fn any_missing_leg_joint_fails() {
        let mut lm = legs();
        lm.remove(Joint::RightAnkle);
        lm.remove(Joint::LeftKnee);
        let err = build_target_polygon(&lm, GarmentCategory::Pant, &TargetParams::default())
            .unwrap_err();
        let TargetError::MissingLandmarks { missing, .. } = err;
        assert_eq!(missing, vec![Joint::LeftKnee, Joint::RightAnkle]);
    }
}
