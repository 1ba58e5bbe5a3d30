use therapeutic_skeleton::{
    AnalysisConfig, Axis, GestureKind, Joint, MirrorMode, PostureShape, SensorFrame, Skeleton,
    SkeletonError, Vec3,
};

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

mod common;
use common::{arms_frame, assert_vec_near, push_end_frame, push_start_frame, standing_frame};

fn mirror_config(mode: MirrorMode) -> AnalysisConfig {
    AnalysisConfig {
        mirror_mode: mode,
        ..AnalysisConfig::default()
    }
}

/// Torso on the shoulder line, shoulders 200 mm apart, left arm hanging down
fn minimal_frame(frame_index: u64) -> SensorFrame {
    SensorFrame::new(frame_index, 30.0)
        .with_joint(Joint::Torso, Vec3::zeros())
        .with_joint(Joint::LeftShoulder, Vec3::new(-100.0, 0.0, 0.0))
        .with_joint(Joint::RightShoulder, Vec3::new(100.0, 0.0, 0.0))
        .with_joint(Joint::LeftElbow, Vec3::new(-100.0, -250.0, 0.0))
        .with_joint(Joint::LeftHand, Vec3::new(-100.0, -480.0, 0.0))
}

#[test]
fn test_local_frame_of_minimal_skeleton() {
    let mut skeleton = Skeleton::new(1, AnalysisConfig::default());
    let analysis = skeleton.update(&minimal_frame(0)).unwrap();

    assert_vec_near(analysis.local_frame.origin, Vec3::zeros());
    assert_vec_near(analysis.local_frame.x_axis, Vec3::x());
    assert_vec_near(analysis.local_frame.y_axis, Vec3::y());
    assert_vec_near(analysis.local_frame.z_axis, Vec3::z());
    assert!(analysis.local_frame.orthonormality_error() < 1e-5);

    let sagittal = analysis.planes.sagittal;
    assert_vec_near(sagittal.n0, Vec3::x());
    assert!(sagittal.d.abs() < 1e-4);
}

#[test]
fn test_mirror_left_to_right_reflects_the_left_arm() {
    let mut skeleton = Skeleton::new(1, mirror_config(MirrorMode::MirrorLeftToRight));
    let analysis = skeleton.update(&minimal_frame(0)).unwrap();

    assert!(analysis.mirror_applied);
    assert_vec_near(analysis.joints.position(Joint::RightElbow), Vec3::new(100.0, -250.0, 0.0));
    assert_vec_near(analysis.joints.position(Joint::RightHand), Vec3::new(100.0, -480.0, 0.0));
    assert_vec_near(analysis.joints.local(Joint::RightHand), Vec3::new(100.0, -480.0, 0.0));

    // The measured right arm is still available
    assert_eq!(analysis.unmirrored.position(Joint::RightHand), Vec3::zeros());
    assert_eq!(
        skeleton.joint_unmirrored(Joint::LeftHand).position,
        Vec3::new(-100.0, -480.0, 0.0)
    );
}

#[test]
fn test_mirror_mode_can_be_switched_between_frames() {
    let mut skeleton = Skeleton::new(1, AnalysisConfig::default());
    skeleton.update(&minimal_frame(0)).unwrap();
    assert!(skeleton.mirror_plane().is_none());

    skeleton.set_mirror_mode(MirrorMode::MirrorLeftToRight);
    skeleton.update(&minimal_frame(1)).unwrap();

    assert_eq!(skeleton.mirror_mode(), MirrorMode::MirrorLeftToRight);
    assert!(skeleton.mirror_plane().is_some());
    assert_vec_near(skeleton.joint(Joint::RightElbow).position, Vec3::new(100.0, -250.0, 0.0));
}

#[test]
fn test_v_posture_through_the_pipeline() {
    let mut skeleton = Skeleton::new(7, AnalysisConfig::default());
    let raised = Vec3::new(-1.0, 1.0, 0.0).normalize();

    let analysis = skeleton
        .update(&arms_frame(0, raised * 250.0, raised * 480.0))
        .unwrap();

    assert_eq!(analysis.posture, PostureShape::V);
    assert_eq!(skeleton.current_posture(), PostureShape::V);
}

#[test]
fn test_hanging_arms_are_no_pose() {
    let mut skeleton = Skeleton::new(7, AnalysisConfig::default());
    skeleton.update(&standing_frame(0)).unwrap();
    assert_eq!(skeleton.current_posture(), PostureShape::NoPose);
}

#[test]
fn test_push_gesture_within_window() {
    let mut skeleton = Skeleton::new(3, AnalysisConfig::default());

    assert_eq!(skeleton.update(&push_start_frame(0)).unwrap().gesture, None);
    let analysis = skeleton.update(&push_end_frame(29)).unwrap();

    assert_eq!(analysis.gesture, Some(GestureKind::Push));
    assert_eq!(skeleton.last_gesture(10), GestureKind::Push);
}

#[test]
fn test_push_gesture_after_window_is_ignored() {
    let mut skeleton = Skeleton::new(3, AnalysisConfig::default());

    skeleton.update(&push_start_frame(0)).unwrap();
    let analysis = skeleton.update(&push_end_frame(31)).unwrap();

    assert_eq!(analysis.gesture, None);
    assert_eq!(skeleton.last_gesture(100), GestureKind::None);
}

#[test]
fn test_last_gesture_expires_after_lookback() {
    let mut skeleton = Skeleton::new(3, AnalysisConfig::default());
    skeleton.update(&push_start_frame(0)).unwrap();
    skeleton.update(&push_end_frame(10)).unwrap();
    skeleton.update(&standing_frame(40)).unwrap();

    assert_eq!(skeleton.last_gesture(30), GestureKind::Push);
    assert_eq!(skeleton.last_gesture(29), GestureKind::None);
}

#[test]
fn test_failed_frames_keep_previous_analysis() {
    let mut skeleton = Skeleton::new(1, AnalysisConfig::default());
    skeleton.update(&standing_frame(0)).unwrap();

    let shoulder = Vec3::new(0.0, 300.0, 2000.0);
    let degenerate = standing_frame(1)
        .with_joint(Joint::LeftShoulder, shoulder)
        .with_joint(Joint::RightShoulder, shoulder);
    assert_matches!(
        skeleton.update(&degenerate),
        Err(SkeletonError::DegenerateFrame { .. })
    );

    let non_finite = standing_frame(2).with_joint(Joint::Torso, Vec3::new(0.0, f32::INFINITY, 0.0));
    assert_matches!(
        skeleton.update(&non_finite),
        Err(SkeletonError::NonFiniteInput { joint: Joint::Torso })
    );

    assert_eq!(skeleton.analysis().map(|a| a.frame_index), Some(0));
    assert_vec_near(skeleton.local_frame().unwrap().origin, Vec3::new(0.0, 0.0, 2000.0));
}

#[test]
fn test_orientation_of_a_turned_person() {
    let mut skeleton = Skeleton::new(1, AnalysisConfig::default());
    // Shoulder line rotated by 30° about the vertical axis
    let half_width = Vec3::new(30f32.to_radians().cos(), 0.0, 30f32.to_radians().sin()) * 150.0;
    let neck = Vec3::new(0.0, 300.0, 2000.0);
    let frame = standing_frame(0)
        .with_joint(Joint::LeftShoulder, neck - half_width)
        .with_joint(Joint::RightShoulder, neck + half_width);

    skeleton.update(&frame).unwrap();

    assert!((skeleton.orientation_alpha() - 30f32.to_radians()).abs() < 1e-4);
    assert!(skeleton.orientation_beta().abs() < 1e-3);
    assert!((skeleton.orientation_gamma() - 30f32.to_radians()).abs() < 1e-4);
    assert!(
        (skeleton.angle_to_global_axis(Axis::X, Joint::RightShoulder, Joint::LeftShoulder)
            - 30f32.to_radians())
        .abs()
            < 1e-4
    );
    assert!(skeleton.angle_to_local_axis(Axis::X, Joint::RightShoulder, Joint::LeftShoulder) < 1e-3);
}

#[test]
fn test_clinical_abduction_of_raised_arm() {
    let mut skeleton = Skeleton::new(1, AnalysisConfig::default());
    // Left upper arm lifted sideways to horizontal
    skeleton
        .update(&arms_frame(0, Vec3::new(-250.0, 0.0, 0.0), Vec3::new(-480.0, 0.0, 0.0)))
        .unwrap();

    let abduction = skeleton.abduction(Joint::LeftElbow, Joint::LeftShoulder);
    assert!((abduction - 90f32.to_radians()).abs() < 1e-3);
    assert!(skeleton.anteversion(Joint::LeftElbow, Joint::LeftShoulder).abs() < 1e-3);
}
