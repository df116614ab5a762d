//! Dress outline: shoulders, waist and a flared hem in one loop.

use serde::{Deserialize, Serialize};

use super::{
    add, joint, midpoint, norm, scale, sub, BodyFrame, GarmentCategory, TargetError, TargetShape,
};
use crate::landmarks::{Joint, LandmarkSet};

/// Dress construction parameters. Lengths are fractions of shoulder width.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DressParams {
    /// Outward expansion of each shoulder point.
    pub shoulder_expand_frac: f64,
    /// Waist offset beyond each hip, when both hips are detected.
    pub waist_hip_expand_frac: f64,
    /// Waist half-width around mid-hip, when hips are not detected.
    pub waist_mid_half_frac: f64,
    /// Hem flare beyond each ankle.
    pub hem_expand_frac: f64,
    /// Downward bulge of the hem centre.
    pub hem_drop_frac: f64,
}

impl Default for DressParams {
    fn default() -> Self {
        Self {
            shoulder_expand_frac: 0.06,
            waist_hip_expand_frac: 0.05,
            waist_mid_half_frac: 0.10,
            hem_expand_frac: 0.15,
            hem_drop_frac: 0.05,
        }
    }
}

pub(super) fn build(lm: &LandmarkSet, p: &DressParams) -> Result<TargetShape, TargetError> {
    let cat = GarmentCategory::Dress;
    let ls = joint(lm, Joint::LeftShoulder, cat)?;
    let rs = joint(lm, Joint::RightShoulder, cat)?;
    let ms = joint(lm, Joint::MidShoulder, cat)?;
    let mh = joint(lm, Joint::MidHip, cat)?;
    let la = joint(lm, Joint::LeftAnkle, cat)?;
    let ra = joint(lm, Joint::RightAnkle, cat)?;

    let frame = BodyFrame::new(ls, rs, ms, mh);
    let out_l = frame.out_left;
    let out_r = frame.out_right();
    let sw = norm(sub(rs, ls));
    let mut anchors = vec![ls, rs, ms, mh, la, ra];

    let left_shoulder = add(ls, scale(out_l, p.shoulder_expand_frac * sw));
    let right_shoulder = add(rs, scale(out_r, p.shoulder_expand_frac * sw));

    let (waist_left, waist_right) = match (lm.point(Joint::LeftHip), lm.point(Joint::RightHip)) {
        (Some(lh), Some(rh)) => {
            anchors.push(lh);
            anchors.push(rh);
            (
                add(lh, scale(out_l, p.waist_hip_expand_frac * sw)),
                add(rh, scale(out_r, p.waist_hip_expand_frac * sw)),
            )
        }
        _ => (
            add(mh, scale(out_l, p.waist_mid_half_frac * sw)),
            add(mh, scale(out_r, p.waist_mid_half_frac * sw)),
        ),
    };

    let hem_left = add(la, scale(out_l, p.hem_expand_frac * sw));
    let hem_right = add(ra, scale(out_r, p.hem_expand_frac * sw));
    let hem_center = add(
        midpoint(hem_left, hem_right),
        scale(frame.down, p.hem_drop_frac * sw),
    );

    Ok(TargetShape {
        points: vec![
            left_shoulder,
            right_shoulder,
            waist_right,
            hem_right,
            hem_center,
            hem_left,
            waist_left,
        ],
        anchors,
        reference_width: sw,
        limbs: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::super::tests::self_intersects;
    use super::super::{build_target_polygon, TargetParams};
    use super::*;

    fn body() -> LandmarkSet {
        LandmarkSet::new([400, 800])
            .with(Joint::LeftShoulder, [120.0, 200.0])
            .with(Joint::RightShoulder, [280.0, 200.0])
            .with(Joint::MidShoulder, [200.0, 200.0])
            .with(Joint::MidHip, [200.0, 420.0])
            .with(Joint::LeftAnkle, [170.0, 700.0])
            .with(Joint::RightAnkle, [230.0, 700.0])
    }

    #[test]
    fn single_simple_loop() {
        let params = TargetParams::default();
        let poly = build_target_polygon(&body(), GarmentCategory::Dress, &params).unwrap();
        assert_eq!(poly.len(), 7);
        assert!(poly.signed_area().abs() > 0.0);
        assert!(!self_intersects(&poly));
    }

    #[test]
    fn waist_prefers_detected_hips() {
        let with_hips = body()
            .with(Joint::LeftHip, [140.0, 420.0])
            .with(Joint::RightHip, [260.0, 420.0]);
        let poly =
            build_target_polygon(&with_hips, GarmentCategory::Dress, &TargetParams::default())
                .unwrap();
        // waist_right is point 2: right hip + 5% of 160 px outward
        assert_eq!(poly.get(2), Some([268.0, 420.0]));

        let params = TargetParams::default();
        let poly = build_target_polygon(&body(), GarmentCategory::Dress, &params).unwrap();
        assert_eq!(poly.get(2), Some([216.0, 420.0]));
    }

    #[test]
    fn missing_ankle_fails() {
        let mut lm = body();
        lm.remove(Joint::LeftAnkle);
        assert!(
            build_target_polygon(&lm, GarmentCategory::Dress, &TargetParams::default()).is_err()
        );
    }
}
