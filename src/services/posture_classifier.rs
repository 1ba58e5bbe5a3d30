/// Posture Classification Service
///
/// Matches the local-frame arm vectors against an ordered list of upper-body
/// shapes; the first matching shape wins. Every angle bound is widened by
/// `tolerance × 20°`. Also provides the clinical range-of-motion angles
/// (abduction, adduction, anteversion, retroversion) for arms and legs.

use tracing::debug;

use crate::config::{sanitize_tolerance, DEFAULT_POSTURE_TOLERANCE};
use crate::models::geometry::{angle_between, is_value_between, Axis, Vec3};
use crate::models::joint::{Joint, JointSet};
use crate::models::posture::{ClinicalAngles, PostureShape, UpperBody};

/// Reference angle scaled by the tolerance fraction
const POSTURE_REFERENCE_ANGLE_DEG: f32 = 20.0;

type ShapePredicate = fn(&PostureClassifier, &UpperBody) -> bool;

/// Evaluation order of the shape predicates
const SHAPE_PREDICATES: [(PostureShape, ShapePredicate); 9] = [
    (PostureShape::V, PostureClassifier::is_v_shape),
    (PostureShape::A, PostureClassifier::is_a_shape),
    (PostureShape::U, PostureClassifier::is_u_shape),
    (PostureShape::N, PostureClassifier::is_n_shape),
    (PostureShape::M, PostureClassifier::is_m_shape),
    (PostureShape::W, PostureClassifier::is_w_shape),
    (PostureShape::O, PostureClassifier::is_o_shape),
    (PostureShape::I, PostureClassifier::is_i_shape),
    (PostureShape::HandsForwardDown, PostureClassifier::is_hands_forward_down),
];

fn rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Stateless upper-body posture classifier
#[derive(Debug, Clone, PartialEq)]
pub struct PostureClassifier {
    tolerance: f32,
    tolerance_angle: f32,
}

impl PostureClassifier {
    pub fn new(tolerance: f32) -> Self {
        let tolerance = sanitize_tolerance(tolerance, DEFAULT_POSTURE_TOLERANCE, "posture");
        Self {
            tolerance,
            tolerance_angle: rad(POSTURE_REFERENCE_ANGLE_DEG) * tolerance,
        }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Set the tolerance; values outside [0, 1] reset it to 0.3
    pub fn set_tolerance(&mut self, tolerance: f32) {
        *self = Self::new(tolerance);
    }

    /// First matching shape in evaluation order, `NoPose` if none matches
    pub fn classify(&self, body: &UpperBody) -> PostureShape {
        let shape = SHAPE_PREDICATES
            .iter()
            .find(|(_, predicate)| predicate(self, body))
            .map(|(shape, _)| *shape)
            .unwrap_or_default();

        debug!("Classified upper body as {}", shape.as_str());
        shape
    }

    /// Test a single shape, ignoring evaluation order
    pub fn matches(&self, shape: PostureShape, body: &UpperBody) -> bool {
        SHAPE_PREDICATES
            .iter()
            .find(|(candidate, _)| *candidate == shape)
            .map(|(_, predicate)| predicate(self, body))
            .unwrap_or(false)
    }

    // Angle helpers. Bounds are in degrees, widened by the tolerance angle.

    fn near(&self, angle: f32, lower_deg: f32, upper_deg: f32) -> bool {
        is_value_between(
            angle,
            rad(lower_deg) - self.tolerance_angle,
            rad(upper_deg) + self.tolerance_angle,
        )
    }

    /// Within [0, upper + tolerance]
    fn below(&self, angle: f32, upper_deg: f32) -> bool {
        is_value_between(angle, 0.0, rad(upper_deg) + self.tolerance_angle)
    }

    /// Within [lower − tolerance, 180°]
    fn above(&self, angle: f32, lower_deg: f32) -> bool {
        is_value_between(angle, rad(lower_deg) - self.tolerance_angle, rad(180.0))
    }

    fn straight_arms(&self, body: &UpperBody) -> bool {
        self.below(angle_between(&body.left_upper_arm, &body.left_lower_arm), 10.0)
            && self.below(angle_between(&body.right_upper_arm, &body.right_lower_arm), 10.0)
    }

    fn right_angled_elbows(&self, body: &UpperBody) -> bool {
        self.near(angle_between(&body.left_upper_arm, &body.left_lower_arm), 85.0, 95.0)
            && self.near(angle_between(&body.right_upper_arm, &body.right_lower_arm), 85.0, 95.0)
    }

    fn upper_arm_divergence(body: &UpperBody) -> f32 {
        angle_between(&body.left_upper_arm, &body.right_upper_arm)
    }

    /// Angle of the combined upper arms against local +Y
    fn upper_arms_to_y(body: &UpperBody) -> f32 {
        angle_between(&(body.left_upper_arm + body.right_upper_arm), &Axis::Y.unit())
    }

    fn is_v_shape(&self, body: &UpperBody) -> bool {
        self.straight_arms(body)
            && self.near(Self::upper_arm_divergence(body), 85.0, 95.0)
            && self.below(Self::upper_arms_to_y(body), 15.0)
    }

    fn is_a_shape(&self, body: &UpperBody) -> bool {
        self.straight_arms(body)
            && self.near(Self::upper_arm_divergence(body), 85.0, 95.0)
            && self.above(Self::upper_arms_to_y(body), 165.0)
    }

    fn is_u_shape(&self, body: &UpperBody) -> bool {
        let y = Axis::Y.unit();
        self.right_angled_elbows(body)
            && self.above(Self::upper_arm_divergence(body), 170.0)
            && self.below(angle_between(&body.left_lower_arm, &y), 15.0)
            && self.below(angle_between(&body.right_lower_arm, &y), 15.0)
    }

    fn is_n_shape(&self, body: &UpperBody) -> bool {
        let y = Axis::Y.unit();
        self.right_angled_elbows(body)
            && self.above(Self::upper_arm_divergence(body), 170.0)
            && self.above(angle_between(&body.left_lower_arm, &y), 165.0)
            && self.above(angle_between(&body.right_lower_arm, &y), 165.0)
    }

    /// Upper arms raised as in V, forearms hanging down
    fn is_m_shape(&self, body: &UpperBody) -> bool {
        let y = Axis::Y.unit();
        self.near(Self::upper_arm_divergence(body), 85.0, 95.0)
            && self.below(Self::upper_arms_to_y(body), 15.0)
            && self.above(angle_between(&body.left_lower_arm, &y), 165.0)
            && self.above(angle_between(&body.right_lower_arm, &y), 165.0)
    }

    /// Upper arms lowered as in A, forearms pointing up
    fn is_w_shape(&self, body: &UpperBody) -> bool {
        let y = Axis::Y.unit();
        self.near(Self::upper_arm_divergence(body), 85.0, 95.0)
            && self.above(Self::upper_arms_to_y(body), 165.0)
            && self.below(angle_between(&body.left_lower_arm, &y), 15.0)
            && self.below(angle_between(&body.right_lower_arm, &y), 15.0)
    }

    fn is_o_shape(&self, body: &UpperBody) -> bool {
        let y = Axis::Y.unit();
        body.hands_distance() <= 100.0 + 100.0 * self.tolerance
            && self.near(angle_between(&body.left_upper_arm, &y), 40.0, 50.0)
            && self.near(angle_between(&body.right_upper_arm, &y), 40.0, 50.0)
            && self.near(angle_between(&body.left_lower_arm, &body.left_upper_arm), 95.0, 105.0)
            && self.near(angle_between(&body.right_lower_arm, &body.right_upper_arm), 95.0, 105.0)
            && self.below(Self::upper_arms_to_y(body), 15.0)
    }

    fn is_i_shape(&self, body: &UpperBody) -> bool {
        body.hands_distance() <= body.shoulder_distance() + 100.0 * (1.0 + self.tolerance)
            && self.straight_arms(body)
            && self.below(Self::upper_arm_divergence(body), 15.0)
            && self.below(angle_between(&body.left_upper_arm, &Axis::Y.unit()), 15.0)
    }

    fn is_hands_forward_down(&self, body: &UpperBody) -> bool {
        // Forward is local −Z, so any angle of at least 90° to +Z points forward
        self.straight_arms(body)
            && self.below(Self::upper_arm_divergence(body), 15.0)
            && self.near(angle_between(&body.left_upper_arm, &Axis::Y.unit()), 130.0, 140.0)
            && is_value_between(
                angle_between(&body.left_upper_arm, &Axis::Z.unit()),
                rad(90.0),
                rad(180.0),
            )
    }
}

impl Default for PostureClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_POSTURE_TOLERANCE)
    }
}

/// Limb pairs (end, origin) that have clinical angles
const CLINICAL_LIMBS: [(Joint, Joint); 4] = [
    (Joint::LeftElbow, Joint::LeftShoulder),
    (Joint::RightElbow, Joint::RightShoulder),
    (Joint::LeftKnee, Joint::LeftHip),
    (Joint::RightKnee, Joint::RightHip),
];

/// Neutral-zero clinical angles of the limb `origin → end`, from local positions.
///
/// Only elbow↔shoulder and knee↔hip are supported (in either argument order);
/// any other pair yields all zeros.
pub fn clinical_angles(joints: &JointSet, end: Joint, origin: Joint) -> ClinicalAngles {
    let (end, origin) = match CLINICAL_LIMBS
        .iter()
        .find(|(e, o)| (*e == end && *o == origin) || (*e == origin && *o == end))
    {
        Some(pair) => *pair,
        None => return ClinicalAngles::default(),
    };

    let end_local = joints.local(end);
    let origin_local = joints.local(origin);
    let limb = end_local - origin_local;
    let down = -Axis::Y.unit();

    let mut angles = ClinicalAngles::default();

    let frontal = angle_between(&Vec3::new(limb.x, limb.y, 0.0), &down);
    let lateral = if end.is_left() {
        end_local.x < origin_local.x
    } else {
        end_local.x > origin_local.x
    };
    if lateral {
        angles.abduction = frontal;
    } else {
        angles.adduction = frontal;
    }

    let sagittal = angle_between(&Vec3::new(0.0, limb.y, limb.z), &down);
    if end_local.z < origin_local.z {
        angles.anteversion = sagittal;
    } else {
        angles.retroversion = sagittal;
    }

    angles
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    const UPPER: f32 = 250.0;
    const LOWER: f32 = 230.0;

    /// Body with shoulders at x = ±150 and the given arm directions
    fn body(left_upper: Vec3, left_lower: Vec3, right_upper: Vec3, right_lower: Vec3) -> UpperBody {
        let left_shoulder = Vec3::new(-150.0, 0.0, 0.0);
        let right_shoulder = Vec3::new(150.0, 0.0, 0.0);
        let left_elbow = left_shoulder + left_upper.normalize() * UPPER;
        let right_elbow = right_shoulder + right_upper.normalize() * UPPER;
        UpperBody::new(
            left_shoulder,
            left_elbow,
            left_elbow + left_lower.normalize() * LOWER,
            right_shoulder,
            right_elbow,
            right_elbow + right_lower.normalize() * LOWER,
        )
    }

    /// Symmetric body: right arm is the left arm reflected in x
    fn symmetric(upper: Vec3, lower: Vec3) -> UpperBody {
        let flip = |v: Vec3| Vec3::new(-v.x, v.y, v.z);
        body(upper, lower, flip(upper), flip(lower))
    }

    /// Direction in the x/y plane, `degrees` measured from +X towards +Y
    fn planar(degrees: f32) -> Vec3 {
        let a = degrees.to_radians();
        Vec3::new(a.cos(), a.sin(), 0.0)
    }

    fn classify(body: &UpperBody) -> PostureShape {
        PostureClassifier::default().classify(body)
    }

    #[test]
    fn test_v_shape() {
        let up_left = Vec3::new(-1.0, 1.0, 0.0);
        assert_eq!(classify(&symmetric(up_left, up_left)), PostureShape::V);
    }

    #[test]
    fn test_a_shape() {
        let down_left = Vec3::new(-1.0, -1.0, 0.0);
        assert_eq!(classify(&symmetric(down_left, down_left)), PostureShape::A);
    }

    #[test]
    fn test_u_and_n_shapes() {
        let out = Vec3::new(-1.0, 0.0, 0.0);
        assert_eq!(classify(&symmetric(out, Vec3::y())), PostureShape::U);
        assert_eq!(classify(&symmetric(out, -Vec3::y())), PostureShape::N);
    }

    #[test]
    fn test_m_and_w_shapes() {
        assert_eq!(
            classify(&symmetric(Vec3::new(-1.0, 1.0, 0.0), -Vec3::y())),
            PostureShape::M
        );
        assert_eq!(
            classify(&symmetric(Vec3::new(-1.0, -1.0, 0.0), Vec3::y())),
            PostureShape::W
        );
    }

    #[test]
    fn test_o_shape() {
        // Upper arm 45° off +Y, forearm bent by 100° so the hands meet at x = 0
        let upper = planar(135.0);
        let lower = planar(35.0);
        let left_shoulder = Vec3::new(-150.0, 0.0, 0.0);
        let left_elbow = left_shoulder + upper * UPPER;
        let left_hand = left_elbow + lower * (-left_elbow.x / lower.x);
        let mirror = |v: Vec3| Vec3::new(-v.x, v.y, v.z);

        let body = UpperBody::new(
            left_shoulder,
            left_elbow,
            left_hand,
            mirror(left_shoulder),
            mirror(left_elbow),
            mirror(left_hand),
        );

        assert!(body.hands_distance() < 1e-3);
        assert_eq!(classify(&body), PostureShape::O);
    }

    #[test]
    fn test_i_shape() {
        assert_eq!(classify(&symmetric(Vec3::y(), Vec3::y())), PostureShape::I);
    }

    #[test]
    fn test_hands_forward_down() {
        let forward_down = Vec3::new(0.0, -1.0, -1.0);
        assert_eq!(
            classify(&symmetric(forward_down, forward_down)),
            PostureShape::HandsForwardDown
        );
    }

    #[test]
    fn test_hanging_arms_are_no_pose() {
        let down = -Vec3::y();
        assert_eq!(classify(&symmetric(down, down)), PostureShape::NoPose);
    }

    #[test]
    fn test_wide_v_is_not_v() {
        // Upper arms 170° apart
        let left = planar(175.0);
        let body = symmetric(left, left);
        assert_ne!(classify(&body), PostureShape::V);
        assert!(!PostureClassifier::default().matches(PostureShape::V, &body));
    }

    #[test]
    fn test_zero_tolerance_tightens_bounds() {
        // 100° divergence is inside 95° + 0.3 × 20° but outside 95° + 0
        let body = symmetric(planar(140.0), planar(140.0));
        assert!(PostureClassifier::new(0.3).matches(PostureShape::V, &body));
        assert!(!PostureClassifier::new(0.0).matches(PostureShape::V, &body));
    }

    #[test]
    fn test_invalid_tolerance_falls_back_to_default() {
        let mut classifier = PostureClassifier::new(0.8);
        assert_eq!(classifier.tolerance(), 0.8);
        classifier.set_tolerance(3.0);
        assert_eq!(classifier.tolerance(), 0.3);
        assert_eq!(PostureClassifier::new(f32::NAN).tolerance(), 0.3);
    }

    fn joints_with_arm(shoulder: Vec3, elbow: Vec3) -> JointSet {
        let mut joints = JointSet::new();
        joints.get_mut(Joint::LeftShoulder).local_position = shoulder;
        joints.get_mut(Joint::LeftElbow).local_position = elbow;
        joints
    }

    #[test]
    fn test_clinical_abduction() {
        let joints = joints_with_arm(Vec3::new(-150.0, 200.0, 0.0), Vec3::new(-400.0, 200.0, 0.0));
        let angles = clinical_angles(&joints, Joint::LeftElbow, Joint::LeftShoulder);

        assert!((angles.abduction - FRAC_PI_2).abs() < 1e-5);
        assert_eq!(angles.adduction, 0.0);
        assert_eq!(angles.anteversion, 0.0);
    }

    #[test]
    fn test_clinical_adduction_and_anteversion() {
        // Arm raised forward and slightly across the body
        let joints = joints_with_arm(Vec3::new(-150.0, 200.0, 0.0), Vec3::new(-100.0, 200.0, -250.0));
        let angles = clinical_angles(&joints, Joint::LeftShoulder, Joint::LeftElbow);

        assert_eq!(angles.abduction, 0.0);
        assert!((angles.adduction - FRAC_PI_2).abs() < 1e-5);
        assert!((angles.anteversion - FRAC_PI_2).abs() < 1e-5);
        assert_eq!(angles.retroversion, 0.0);
    }

    #[test]
    fn test_clinical_angles_of_unsupported_pair_are_zero() {
        let joints = joints_with_arm(Vec3::new(-150.0, 200.0, 0.0), Vec3::new(-400.0, 200.0, 0.0));
        assert_eq!(
            clinical_angles(&joints, Joint::LeftHand, Joint::LeftShoulder),
            ClinicalAngles::default()
        );
    }

    proptest! {
        #[test]
        fn prop_v_shape_is_stable_within_tolerance(
            opening in -4.0f32..4.0,
            tilt in -10.0f32..10.0,
            bend in -7.0f32..7.0,
        ) {
            // Exact V: left upper arm at 135°, right at 45°, forearms collinear
            let left_upper = planar(135.0 + opening + tilt);
            let right_upper = planar(45.0 - opening + tilt);
            let body = body(
                left_upper,
                planar(135.0 + opening + tilt + bend),
                right_upper,
                planar(45.0 - opening + tilt - bend),
            );

            prop_assert_eq!(classify(&body), PostureShape::V);
        }
    }
}
